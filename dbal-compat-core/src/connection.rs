//! Connection context.
//!
//! A [`Connection`] is the explicit handle every builder and statement is
//! created from. It is cheap to clone; clones share the driver.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::executor::any::SqlxDriver;
use crate::executor::Driver;
use crate::platform::Platform;
use crate::statement::PreparedStatement;
use crate::value::BoundParameter;
use crate::{
    ConnectionConfig, DeleteQuery, Expression, InsertQuery, Result, TruncateQuery, UpdateQuery,
};

pub struct Connection<D: Driver> {
    driver: Arc<D>,
    platform: Arc<dyn Platform>,
    config: Arc<ConnectionConfig>,
    last_statement: Arc<Mutex<Option<String>>>,
    last_insert_id: Arc<Mutex<Option<i64>>>,
}

impl<D: Driver> Clone for Connection<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            platform: Arc::clone(&self.platform),
            config: Arc::clone(&self.config),
            last_statement: Arc::clone(&self.last_statement),
            last_insert_id: Arc::clone(&self.last_insert_id),
        }
    }
}

impl<D: Driver> fmt::Debug for Connection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("platform", &self.platform.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Connection<SqlxDriver> {
    /// Open a pooled sqlx connection
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let driver = SqlxDriver::connect(&config).await?;
        tracing::info!(
            target: "dbal_compat",
            platform = driver.platform().name(),
            "connected"
        );
        Ok(Self::new(driver, config))
    }
}

impl<D: Driver> Connection<D> {
    pub fn new(driver: D, config: ConnectionConfig) -> Self {
        let platform = driver.platform();
        Self {
            driver: Arc::new(driver),
            platform,
            config: Arc::new(config),
            last_statement: Arc::default(),
            last_insert_id: Arc::default(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Expression builder for this connection's dialect
    pub fn expr(&self) -> Expression {
        Expression::new(Arc::clone(&self.platform))
    }

    pub fn insert_query(&self) -> InsertQuery {
        InsertQuery::new(self.expr())
    }

    pub fn update_query(&self) -> UpdateQuery {
        UpdateQuery::new(self.expr())
    }

    pub fn delete_query(&self) -> DeleteQuery {
        DeleteQuery::new(self.expr())
    }

    pub fn truncate_query(&self) -> TruncateQuery {
        TruncateQuery::new(self.expr())
    }

    /// Prepare a statement that may contain `?` or `:name` placeholders
    pub fn prepare(&self, sql: &str) -> Result<PreparedStatement<D>> {
        let handle = self.driver.prepare(sql)?;
        Ok(PreparedStatement::new(self.clone(), sql, handle))
    }

    /// Quote a string literal
    pub fn quote(&self, value: &str) -> String {
        self.platform.quote_string(value)
    }

    pub fn quote_identifier(&self, identifier: &str) -> String {
        self.platform.quote_identifier(identifier)
    }

    /// Quote a possibly table-qualified column name; `*` stays bare
    pub fn quote_column(&self, column: &str) -> String {
        column
            .split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    self.quote_identifier(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Execute a statement and return the affected row count
    pub async fn execute_update(&self, sql: &str, params: &[BoundParameter]) -> Result<u64> {
        self.log_statement(sql, params.len());
        match self.driver.execute_update(sql, params).await {
            Ok(result) => {
                if let Some(id) = result.last_insert_id.filter(|id| *id != 0) {
                    *self
                        .last_insert_id
                        .lock()
                        .unwrap_or_else(|e| e.into_inner()) = Some(id);
                }
                Ok(result.rows_affected)
            }
            Err(err) => {
                tracing::error!(target: "dbal_compat", sql, error = %err, "statement failed");
                Err(err)
            }
        }
    }

    /// Execute raw SQL without parameters
    pub async fn admin_query(&self, sql: &str) -> Result<u64> {
        self.execute_update(sql, &[]).await
    }

    /// Text of the last statement sent, when the configuration keeps it
    pub fn last_statement(&self) -> Option<String> {
        self.last_statement
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Id generated by the most recent INSERT on this connection.
    ///
    /// Backends that report no id (Postgres through sqlx) leave it unset.
    pub fn last_insert_id(&self) -> Option<i64> {
        *self
            .last_insert_id
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Remember a statement without executing it
    pub fn remember_statement(&self, sql: &str) {
        if self.config.keeps_last_statement() {
            *self
                .last_statement
                .lock()
                .unwrap_or_else(|e| e.into_inner()) = Some(sql.to_string());
        }
    }

    pub(crate) fn log_statement(&self, sql: &str, params: usize) {
        if self.config.debug {
            tracing::info!(target: "dbal_compat", sql, params, "executing statement");
        } else {
            tracing::debug!(target: "dbal_compat", sql, params, "executing statement");
        }
        self.remember_statement(sql);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDriver;
    use crate::{ExecutableModification, QueryBuilder};

    #[test]
    fn test_factories_use_platform() {
        let conn = Connection::new(MockDriver::sqlite(), ConnectionConfig::default());
        let query = conn.truncate_query().truncate("cache_pages").unwrap();
        assert_eq!(query.to_sql().unwrap(), "DELETE FROM cache_pages");
        assert_eq!(conn.expr().lower("title"), "LOWER(title)");
    }

    #[test]
    fn test_quoting() {
        let conn = Connection::new(MockDriver::mysql(), ConnectionConfig::default());
        assert_eq!(conn.quote("Foo"), "'Foo'");
        assert_eq!(conn.quote_identifier("pages"), "`pages`");
        assert_eq!(conn.quote_column("pages.uid"), "`pages`.`uid`");
        assert_eq!(conn.quote_column("pages.*"), "`pages`.*");
    }

    #[tokio::test]
    async fn test_last_statement_only_when_enabled() {
        let driver = MockDriver::mysql();
        let conn = Connection::new(driver.clone(), ConnectionConfig::default());
        conn.admin_query("OPTIMIZE TABLE pages").await.unwrap();
        assert_eq!(conn.last_statement(), None);

        let conn = Connection::new(
            driver,
            ConnectionConfig::default().store_last_built_query(true),
        );
        let mut query = conn.delete_query().delete("pages").unwrap();
        query.execute(&conn).await.unwrap();
        assert_eq!(conn.last_statement().as_deref(), Some("DELETE FROM pages"));
    }

    #[tokio::test]
    async fn test_clones_share_driver() {
        let driver = MockDriver::mysql();
        let conn = Connection::new(driver.clone(), ConnectionConfig::default().debug(true));
        let other = conn.clone();
        other.admin_query("TRUNCATE cache").await.unwrap();
        assert_eq!(driver.executed().len(), 1);
        assert_eq!(conn.last_statement().as_deref(), Some("TRUNCATE cache"));
    }

    #[tokio::test]
    async fn test_last_insert_id_survives_statements_without_one() {
        let driver = MockDriver::mysql();
        let conn = Connection::new(driver.clone(), ConnectionConfig::default());
        assert_eq!(conn.last_insert_id(), None);

        driver.set_last_insert_id(Some(17));
        conn.admin_query("INSERT INTO pages (title) VALUES ('a')").await.unwrap();
        assert_eq!(conn.last_insert_id(), Some(17));

        driver.set_last_insert_id(Some(0));
        conn.admin_query("UPDATE pages SET title = 'b'").await.unwrap();
        assert_eq!(conn.clone().last_insert_id(), Some(17));
    }
}
