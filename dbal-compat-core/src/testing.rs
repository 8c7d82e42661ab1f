//! Scripted in-memory driver for tests

use std::sync::{Arc, Mutex, MutexGuard};

use crate::executor::{Driver, DriverStatement, Row, UpdateResult};
use crate::platform::{MySqlPlatform, Platform, SqlitePlatform};
use crate::value::{BoundParameter, ParamKey, ParamType, Value};
use crate::{Error, Result};

/// A statement the driver received
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub params: Vec<BoundParameter>,
}

#[derive(Debug, Default)]
struct MockState {
    executed: Vec<Executed>,
    affected: u64,
    last_insert_id: Option<i64>,
    rows: Vec<Row>,
    fail_next: Option<String>,
    close_cursor_fails: bool,
    prepared: usize,
}

#[derive(Debug, Clone)]
pub struct MockDriver {
    platform: Arc<dyn Platform>,
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            state: Arc::default(),
        }
    }

    pub fn mysql() -> Self {
        Self::new(Arc::new(MySqlPlatform))
    }

    pub fn sqlite() -> Self {
        Self::new(Arc::new(SqlitePlatform))
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_affected_rows(&self, affected: u64) {
        self.state().affected = affected;
    }

    /// Id reported by every following `execute_update`
    pub fn set_last_insert_id(&self, id: Option<i64>) {
        self.state().last_insert_id = id;
    }

    /// Rows every prepared statement returns on execute
    pub fn set_rows(&self, rows: Vec<Row>) {
        self.state().rows = rows;
    }

    /// Make the next execution fail with a driver error
    pub fn fail_next(&self, message: &str) {
        self.state().fail_next = Some(message.to_string());
    }

    pub fn fail_close_cursor(&self, fails: bool) {
        self.state().close_cursor_fails = fails;
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.state().executed.clone()
    }

    /// Number of statements prepared so far
    pub fn prepare_count(&self) -> usize {
        self.state().prepared
    }

    fn record(&self, sql: &str, params: Vec<BoundParameter>) -> Result<u64> {
        let mut state = self.state();
        if let Some(message) = state.fail_next.take() {
            return Err(Error::Database(sqlx::Error::Protocol(message)));
        }
        state.executed.push(Executed {
            sql: sql.to_string(),
            params,
        });
        Ok(state.affected)
    }
}

impl Driver for MockDriver {
    type Statement = MockStatement;

    fn platform(&self) -> Arc<dyn Platform> {
        self.platform.clone()
    }

    async fn execute_update(&self, sql: &str, params: &[BoundParameter]) -> Result<UpdateResult> {
        let rows_affected = self.record(sql, params.to_vec())?;
        let last_insert_id = self.state().last_insert_id;
        Ok(UpdateResult {
            rows_affected,
            last_insert_id,
        })
    }

    fn prepare(&self, sql: &str) -> Result<MockStatement> {
        self.state().prepared += 1;
        Ok(MockStatement {
            driver: self.clone(),
            sql: sql.to_string(),
            bindings: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
            affected: 0,
            last_error: None,
        })
    }
}

#[derive(Debug)]
pub struct MockStatement {
    driver: MockDriver,
    sql: String,
    bindings: Vec<BoundParameter>,
    rows: Vec<Row>,
    cursor: usize,
    affected: u64,
    last_error: Option<String>,
}

impl DriverStatement for MockStatement {
    fn bind_value(&mut self, key: ParamKey, value: Value, param_type: ParamType) -> Result<()> {
        self.bindings.retain(|p| p.key != key);
        self.bindings.push(BoundParameter {
            key,
            value,
            param_type,
        });
        Ok(())
    }

    async fn execute(&mut self) -> Result<()> {
        let bindings = std::mem::take(&mut self.bindings);
        match self.driver.record(&self.sql, bindings) {
            Ok(affected) => {
                self.rows = self.driver.state().rows.clone();
                self.cursor = 0;
                self.affected = affected;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn fetch(&mut self) -> Option<Row> {
        let row = self.rows.get(self.cursor).cloned();
        if row.is_some() {
            self.cursor += 1;
        }
        row
    }

    fn seek(&mut self, row: usize) -> bool {
        if row < self.rows.len() {
            self.cursor = row;
            true
        } else {
            false
        }
    }

    fn close_cursor(&mut self) -> bool {
        if self.driver.state().close_cursor_fails {
            return false;
        }
        self.rows.clear();
        self.cursor = 0;
        true
    }

    fn row_count(&self) -> u64 {
        if self.rows.is_empty() {
            self.affected
        } else {
            self.rows.len() as u64
        }
    }

    fn error_code(&self) -> Option<String> {
        self.last_error.as_ref().map(|_| "HY000".to_string())
    }

    fn error_info(&self) -> Option<String> {
        self.last_error.clone()
    }
}

/// Build a result row from `(column, value)` pairs
pub fn row<V: Into<Value>>(columns: Vec<(&str, V)>) -> Row {
    columns
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.into()))
        .collect()
}
