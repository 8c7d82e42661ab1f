//! Statement execution and the driver interface

pub mod any;

use std::future::Future;
use std::sync::Arc;

use crate::platform::Platform;
use crate::value::{BoundParameter, ParamKey, ParamType, Value};
use crate::{Connection, QueryBuilder, Result};

/// One result row: column names and values in select order
pub type Row = Vec<(String, Value)>;

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateResult {
    pub rows_affected: u64,
    /// Id generated by an INSERT, when the backend reports one
    pub last_insert_id: Option<i64>,
}

/// Trait for database drivers
pub trait Driver: Send + Sync + 'static {
    /// Prepared statement handle of this driver
    type Statement: DriverStatement;

    /// Dialect of the connected database
    fn platform(&self) -> Arc<dyn Platform>;

    /// Execute a statement that returns no rows
    fn execute_update(
        &self,
        sql: &str,
        params: &[BoundParameter],
    ) -> impl Future<Output = Result<UpdateResult>> + Send;

    /// Prepare a statement for repeated execution
    fn prepare(&self, sql: &str) -> Result<Self::Statement>;
}

/// Driver-level prepared statement with a forward cursor
pub trait DriverStatement: Send {
    /// Bind a value for the next execution
    fn bind_value(&mut self, key: ParamKey, value: Value, param_type: ParamType) -> Result<()>;

    /// Execute with the bound values. Bindings are consumed.
    fn execute(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Next row, or `None` when the cursor is exhausted
    fn fetch(&mut self) -> Option<Row>;

    /// Move the cursor to a 0-based row; false when out of range
    fn seek(&mut self, row: usize) -> bool;

    /// Release the cursor so the statement can run again
    fn close_cursor(&mut self) -> bool;

    /// Rows affected by the last execution, or rows in its result set
    fn row_count(&self) -> u64;

    /// Error code of the last failed execution
    fn error_code(&self) -> Option<String>;

    /// Error message of the last failed execution
    fn error_info(&self) -> Option<String>;
}

/// Extension trait for modification statements (INSERT, UPDATE, DELETE, TRUNCATE)
pub trait ExecutableModification: QueryBuilder {
    /// Execute with the bound parameters and return the number of affected rows.
    ///
    /// The bindings are cleared after success.
    fn execute<D>(&mut self, connection: &Connection<D>) -> impl Future<Output = Result<u64>> + Send
    where
        D: Driver;

    /// Execute with the given `placeholder => value` pairs instead of the bound
    /// parameters. Types are derived from the values the same way binding does.
    fn execute_with_parameters<D, I, K, V>(
        &mut self,
        connection: &Connection<D>,
        parameters: I,
    ) -> impl Future<Output = Result<u64>> + Send
    where
        D: Driver,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>;
}

impl<Q> ExecutableModification for Q
where
    Q: QueryBuilder + Send,
{
    async fn execute<D>(&mut self, connection: &Connection<D>) -> Result<u64>
    where
        D: Driver,
    {
        let sql = self.to_sql()?;
        let params = self.parameters()?;
        let affected = connection.execute_update(&sql, &params).await?;
        self.binder_mut().clear();
        Ok(affected)
    }

    fn execute_with_parameters<D, I, K, V>(
        &mut self,
        connection: &Connection<D>,
        parameters: I,
    ) -> impl Future<Output = Result<u64>> + Send
    where
        D: Driver,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let params = named_parameters(parameters);
        async move {
            let params = params?;
            let sql = self.to_sql()?;
            let affected = connection.execute_update(&sql, &params).await?;
            self.binder_mut().clear();
            Ok(affected)
        }
    }
}

/// Turn `name => value` pairs into bound parameters, adding the leading colon
/// where it is missing
fn named_parameters<I, K, V>(parameters: I) -> Result<Vec<BoundParameter>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    parameters
        .into_iter()
        .map(|(name, value)| {
            let key = ParamKey::named(name);
            crate::binder::validate_placeholder_name(&key.to_string())?;
            Ok(BoundParameter::auto(key, value.into()))
        })
        .collect()
}
