//! Schema reflection through the platform's catalogue queries

use serde::{Deserialize, Serialize};

use crate::executor::Driver;
use crate::statement::{FetchMode, FetchedRow};
use crate::value::{ParamType, Value};
use crate::{Connection, Result};

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

/// One index of a table, columns in index order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl<D: Driver> Connection<D> {
    /// Names of all tables in the current database
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = self.catalogue(&self.platform().list_tables_sql(), None).await?;
        Ok(rows.into_iter().filter_map(|row| text(&row, 0)).collect())
    }

    /// Columns of `table` in ordinal order
    pub async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows = self
            .catalogue(&self.platform().list_columns_sql(), Some(table))
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ColumnInfo {
                name: text(&row, 0).unwrap_or_default(),
                data_type: text(&row, 1).unwrap_or_default(),
                nullable: text(&row, 2).is_some_and(|n| n.eq_ignore_ascii_case("YES")),
                default: text(&row, 3),
            })
            .collect())
    }

    /// Indexes of `table`, grouped from one row per indexed column
    pub async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        let rows = self
            .catalogue(&self.platform().list_indexes_sql(), Some(table))
            .await?;

        let mut indexes: Vec<IndexInfo> = Vec::new();
        for row in rows {
            let name = text(&row, 0).unwrap_or_default();
            let column = text(&row, 1).unwrap_or_default();
            let unique = row.get_index(2).is_some_and(|v| flag(v) == Some(false));
            match indexes.last_mut() {
                Some(index) if index.name == name => index.columns.push(column),
                _ => indexes.push(IndexInfo {
                    name,
                    columns: vec![column],
                    unique,
                }),
            }
        }
        Ok(indexes)
    }

    async fn catalogue(&self, sql: &str, table: Option<&str>) -> Result<Vec<FetchedRow>> {
        let mut statement = self.prepare(sql)?;
        if let Some(table) = table {
            statement.bind_value(1usize, table, ParamType::Str)?;
        }
        statement.execute().await?;
        let rows = statement.fetch_all_with(FetchMode::Numeric);
        statement.free();
        Ok(rows)
    }
}

fn text(row: &FetchedRow, index: usize) -> Option<String> {
    row.get_index(index).and_then(Value::as_text)
}

/// Truthiness of a 0/1 style catalogue flag
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Null => None,
        other => match other.as_i64() {
            Some(i) => Some(i != 0),
            None => other.as_text().and_then(|t| t.trim().parse::<i64>().ok()).map(|i| i != 0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{row, MockDriver};
    use crate::value::{BoundParameter, ParamKey};
    use crate::ConnectionConfig;

    #[tokio::test]
    async fn test_list_tables() {
        let driver = MockDriver::sqlite();
        driver.set_rows(vec![row(vec![("name", "pages")]), row(vec![("name", "tt_content")])]);
        let conn = Connection::new(driver.clone(), ConnectionConfig::default());

        assert_eq!(conn.list_tables().await.unwrap(), vec!["pages", "tt_content"]);
        assert!(driver.executed()[0].sql.contains("sqlite_master"));
    }

    #[tokio::test]
    async fn test_list_columns() {
        let driver = MockDriver::mysql();
        driver.set_rows(vec![
            row(vec![
                ("COLUMN_NAME", Value::from("uid")),
                ("COLUMN_TYPE", Value::from("int(11)")),
                ("IS_NULLABLE", Value::from("NO")),
                ("COLUMN_DEFAULT", Value::Null),
            ]),
            row(vec![
                ("COLUMN_NAME", Value::from("title")),
                ("COLUMN_TYPE", Value::from("varchar(255)")),
                ("IS_NULLABLE", Value::from("YES")),
                ("COLUMN_DEFAULT", Value::from("")),
            ]),
        ]);
        let conn = Connection::new(driver.clone(), ConnectionConfig::default());

        let columns = conn.list_columns("pages").await.unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnInfo {
                    name: "uid".to_string(),
                    data_type: "int(11)".to_string(),
                    nullable: false,
                    default: None,
                },
                ColumnInfo {
                    name: "title".to_string(),
                    data_type: "varchar(255)".to_string(),
                    nullable: true,
                    default: Some(String::new()),
                },
            ]
        );
        assert_eq!(
            driver.executed()[0].params,
            vec![BoundParameter {
                key: ParamKey::Positional(1),
                value: Value::from("pages"),
                param_type: ParamType::Str,
            }]
        );
    }

    #[tokio::test]
    async fn test_list_indexes_groups_columns() {
        let driver = MockDriver::mysql();
        driver.set_rows(vec![
            row(vec![
                ("INDEX_NAME", Value::from("PRIMARY")),
                ("COLUMN_NAME", Value::from("uid")),
                ("NON_UNIQUE", Value::I64(0)),
            ]),
            row(vec![
                ("INDEX_NAME", Value::from("parent")),
                ("COLUMN_NAME", Value::from("pid")),
                ("NON_UNIQUE", Value::from("1")),
            ]),
            row(vec![
                ("INDEX_NAME", Value::from("parent")),
                ("COLUMN_NAME", Value::from("deleted")),
                ("NON_UNIQUE", Value::from("1")),
            ]),
        ]);
        let conn = Connection::new(driver, ConnectionConfig::default());

        let indexes = conn.list_indexes("pages").await.unwrap();
        assert_eq!(
            indexes,
            vec![
                IndexInfo {
                    name: "PRIMARY".to_string(),
                    columns: vec!["uid".to_string()],
                    unique: true,
                },
                IndexInfo {
                    name: "parent".to_string(),
                    columns: vec!["pid".to_string(), "deleted".to_string()],
                    unique: false,
                },
            ]
        );
    }
}
