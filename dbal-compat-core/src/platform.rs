//! Database dialects.
//!
//! A [`Platform`] knows how a particular database spells the handful of things
//! the builders cannot render generically: case folding, TRUNCATE, string and
//! identifier quoting, driver placeholders and the catalogue queries used for
//! schema reflection.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

use crate::{Error, Result};

/// SQL dialect of the connected database
pub trait Platform: Debug + Send + Sync {
    /// Short dialect name
    fn name(&self) -> &'static str;

    /// Expression folding `value` to lower case
    fn lower_expression(&self, value: &str) -> String {
        format!("LOWER({value})")
    }

    /// Expression folding `value` to upper case
    fn upper_expression(&self, value: &str) -> String {
        format!("UPPER({value})")
    }

    /// Statement removing all rows of `table`
    fn truncate_table_sql(&self, table: &str) -> String {
        format!("TRUNCATE {table}")
    }

    /// String literal for `value`, including the surrounding quotes
    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Whether a backslash escapes the next character inside string literals
    fn backslash_escapes(&self) -> bool {
        false
    }

    /// Quoted identifier
    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Driver-native placeholder for the parameter at 1-based `position`
    fn placeholder(&self, _position: usize) -> String {
        "?".to_string()
    }

    /// Query returning one row per table, table name in the first column
    fn list_tables_sql(&self) -> String;

    /// Query returning `(name, type, nullable YES/NO, default)` per column.
    /// Takes the table name as its only `?` parameter.
    fn list_columns_sql(&self) -> String;

    /// Query returning `(index name, column name, non_unique 0/1)` per indexed column.
    /// Takes the table name as its only `?` parameter.
    fn list_indexes_sql(&self) -> String;
}

/// MySQL / MariaDB
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlPlatform;

impl Platform for MySqlPlatform {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_string(&self, value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for ch in value.chars() {
            match ch {
                '\0' => quoted.push_str("\\0"),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\x1a' => quoted.push_str("\\Z"),
                '\'' | '"' | '\\' => {
                    quoted.push('\\');
                    quoted.push(ch);
                }
                _ => quoted.push(ch),
            }
        }
        quoted.push('\'');
        quoted
    }

    fn backslash_escapes(&self) -> bool {
        true
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn list_tables_sql(&self) -> String {
        "SELECT TABLE_NAME FROM information_schema.TABLES \
         WHERE TABLE_SCHEMA = DATABASE() ORDER BY TABLE_NAME"
            .to_string()
    }

    fn list_columns_sql(&self) -> String {
        "SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_DEFAULT \
         FROM information_schema.COLUMNS \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? ORDER BY ORDINAL_POSITION"
            .to_string()
    }

    fn list_indexes_sql(&self) -> String {
        "SELECT INDEX_NAME, COLUMN_NAME, NON_UNIQUE FROM information_schema.STATISTICS \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? ORDER BY INDEX_NAME, SEQ_IN_INDEX"
            .to_string()
    }
}

/// SQLite
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePlatform;

impl Platform for SqlitePlatform {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    // SQLite has no TRUNCATE
    fn truncate_table_sql(&self, table: &str) -> String {
        format!("DELETE FROM {table}")
    }

    fn list_tables_sql(&self) -> String {
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            .to_string()
    }

    fn list_columns_sql(&self) -> String {
        "SELECT name, type, CASE WHEN \"notnull\" = 0 THEN 'YES' ELSE 'NO' END, dflt_value \
         FROM pragma_table_info(?) ORDER BY cid"
            .to_string()
    }

    fn list_indexes_sql(&self) -> String {
        "SELECT il.name, ii.name, CASE WHEN il.\"unique\" = 1 THEN 0 ELSE 1 END \
         FROM pragma_index_list(?) AS il, pragma_index_info(il.name) AS ii \
         ORDER BY il.name, ii.seqno"
            .to_string()
    }
}

/// PostgreSQL
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresPlatform;

impl Platform for PostgresPlatform {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, position: usize) -> String {
        format!("${position}")
    }

    fn list_tables_sql(&self) -> String {
        "SELECT tablename FROM pg_catalog.pg_tables \
         WHERE schemaname = current_schema() ORDER BY tablename"
            .to_string()
    }

    fn list_columns_sql(&self) -> String {
        "SELECT column_name, data_type, is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = ? ORDER BY ordinal_position"
            .to_string()
    }

    fn list_indexes_sql(&self) -> String {
        "SELECT i.relname, a.attname, CASE WHEN ix.indisunique THEN 0 ELSE 1 END \
         FROM pg_class t \
         JOIN pg_index ix ON t.oid = ix.indrelid \
         JOIN pg_class i ON i.oid = ix.indexrelid \
         JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey) \
         WHERE t.relname = ? ORDER BY i.relname, a.attnum"
            .to_string()
    }
}

/// Supported database families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    #[default]
    Mysql,
    Sqlite,
    Postgres,
}

impl PlatformKind {
    /// Detect the platform from a connection URL scheme
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(PlatformKind::Mysql),
            "sqlite" => Ok(PlatformKind::Sqlite),
            "postgres" | "postgresql" => Ok(PlatformKind::Postgres),
            _ => Err(Error::config(format!(
                "Unsupported database URL scheme '{scheme}'"
            ))),
        }
    }

    /// URL scheme used by sqlx for this platform
    pub fn scheme(&self) -> &'static str {
        match self {
            PlatformKind::Mysql => "mysql",
            PlatformKind::Sqlite => "sqlite",
            PlatformKind::Postgres => "postgres",
        }
    }

    /// Instantiate the dialect
    pub fn platform(&self) -> Arc<dyn Platform> {
        match self {
            PlatformKind::Mysql => Arc::new(MySqlPlatform),
            PlatformKind::Sqlite => Arc::new(SqlitePlatform),
            PlatformKind::Postgres => Arc::new(PostgresPlatform),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding() {
        let platform = MySqlPlatform;
        assert_eq!(platform.lower_expression("title"), "LOWER(title)");
        assert_eq!(platform.upper_expression("title"), "UPPER(title)");
    }

    #[test]
    fn test_truncate_sql() {
        assert_eq!(MySqlPlatform.truncate_table_sql("pages"), "TRUNCATE pages");
        assert_eq!(PostgresPlatform.truncate_table_sql("pages"), "TRUNCATE pages");
        assert_eq!(SqlitePlatform.truncate_table_sql("pages"), "DELETE FROM pages");
    }

    #[test]
    fn test_mysql_quoting() {
        let platform = MySqlPlatform;
        assert_eq!(platform.quote_string("Foo"), "'Foo'");
        assert_eq!(platform.quote_string("it's"), "'it\\'s'");
        assert_eq!(platform.quote_string("a\\b"), "'a\\\\b'");
        assert_eq!(platform.quote_string("line\nbreak"), "'line\\nbreak'");
        assert_eq!(platform.quote_identifier("uid"), "`uid`");
    }

    #[test]
    fn test_ansi_quoting() {
        assert_eq!(SqlitePlatform.quote_string("it's"), "'it''s'");
        assert_eq!(PostgresPlatform.quote_identifier("uid"), "\"uid\"");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(MySqlPlatform.placeholder(3), "?");
        assert_eq!(SqlitePlatform.placeholder(1), "?");
        assert_eq!(PostgresPlatform.placeholder(3), "$3");
    }

    #[test]
    fn test_kind_from_url() {
        assert_eq!(
            PlatformKind::from_url("mysql://root@localhost/typo3").unwrap(),
            PlatformKind::Mysql
        );
        assert_eq!(
            PlatformKind::from_url("sqlite::memory:").unwrap(),
            PlatformKind::Sqlite
        );
        assert_eq!(
            PlatformKind::from_url("postgresql://localhost/typo3").unwrap(),
            PlatformKind::Postgres
        );
        assert!(PlatformKind::from_url("oracle://localhost").is_err());
    }

    #[test]
    fn test_kind_instantiates_platform() {
        assert_eq!(PlatformKind::Sqlite.platform().name(), "sqlite");
        assert_eq!(PlatformKind::Postgres.scheme(), "postgres");
    }
}
