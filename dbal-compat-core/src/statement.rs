//! Prepared statements.
//!
//! [`PreparedStatement`] wraps a driver statement handle with explicit
//! parameter typing and two row shapes:
//!
//! * [`FetchMode::Assoc`] yields `(column, value)` pairs
//! * [`FetchMode::Numeric`] yields values in column order
//!
//! Bound parameters are used by exactly one execution and then cleared.
//! Dropping the statement releases its cursor.

use std::fmt;

use crate::executor::{Driver, DriverStatement, Row};
use crate::value::{BoundParameter, ParamKey, ParamType, Value};
use crate::{Connection, Error, Result};

/// Shape of fetched rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Column name to value
    #[default]
    Assoc = 2,
    /// Values by position
    Numeric = 3,
}

impl FetchMode {
    pub const FETCH_ASSOC: i32 = 2;
    pub const FETCH_NUM: i32 = 3;
}

impl TryFrom<i32> for FetchMode {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            Self::FETCH_ASSOC => Ok(FetchMode::Assoc),
            Self::FETCH_NUM => Ok(FetchMode::Numeric),
            _ => Err(Error::invalid_argument(format!(
                "Fetch mode {code} is not supported, use FETCH_ASSOC or FETCH_NUM"
            ))),
        }
    }
}

impl From<FetchMode> for i32 {
    fn from(mode: FetchMode) -> Self {
        mode as i32
    }
}

/// A fetched row in one of the two fetch shapes
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedRow {
    Assoc(Vec<(String, Value)>),
    Numeric(Vec<Value>),
}

impl FetchedRow {
    fn from_row(row: Row, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Assoc => FetchedRow::Assoc(row),
            FetchMode::Numeric => FetchedRow::Numeric(row.into_iter().map(|(_, v)| v).collect()),
        }
    }

    /// Value of a column by name; numeric rows have no names
    pub fn get(&self, column: &str) -> Option<&Value> {
        match self {
            FetchedRow::Assoc(pairs) => pairs.iter().find(|(c, _)| c == column).map(|(_, v)| v),
            FetchedRow::Numeric(_) => None,
        }
    }

    /// Value at a 0-based column position
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            FetchedRow::Assoc(pairs) => pairs.get(index).map(|(_, v)| v),
            FetchedRow::Numeric(values) => values.get(index),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FetchedRow::Assoc(pairs) => pairs.len(),
            FetchedRow::Numeric(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The row's values in column order
    pub fn into_values(self) -> Vec<Value> {
        match self {
            FetchedRow::Assoc(pairs) => pairs.into_iter().map(|(_, v)| v).collect(),
            FetchedRow::Numeric(values) => values,
        }
    }
}

/// A prepared statement bound to a connection
pub struct PreparedStatement<D: Driver> {
    connection: Connection<D>,
    sql: String,
    handle: D::Statement,
    parameters: Vec<BoundParameter>,
    default_fetch_mode: FetchMode,
    executed: bool,
}

impl<D: Driver> fmt::Debug for PreparedStatement<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.sql)
            .field("parameters", &self.parameters)
            .field("default_fetch_mode", &self.default_fetch_mode)
            .field("executed", &self.executed)
            .finish()
    }
}

impl<D: Driver> PreparedStatement<D> {
    pub(crate) fn new(connection: Connection<D>, sql: &str, handle: D::Statement) -> Self {
        Self {
            connection,
            sql: sql.to_string(),
            handle,
            parameters: Vec::new(),
            default_fetch_mode: FetchMode::default(),
            executed: false,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind every entry with an automatic type. Positional keys are 0-based
    /// here and bound as key + 1; names get their leading colon added when it
    /// is missing.
    pub fn bind_values<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ParamKey>,
        V: Into<Value>,
    {
        for parameter in collect_zero_based(values)? {
            self.store(parameter);
        }
        Ok(())
    }

    /// Bind one value. Positional keys are 1-based, names look like `:name`.
    pub fn bind_value(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<Value>,
        param_type: ParamType,
    ) -> Result<()> {
        let key = validate_key(key.into())?;
        let value = value.into();
        let param_type = param_type.resolve(&key.to_string(), &value)?;
        self.store(BoundParameter {
            key,
            value,
            param_type,
        });
        Ok(())
    }

    /// Execute with the bound parameters
    pub async fn execute(&mut self) -> Result<()> {
        let parameters = std::mem::take(&mut self.parameters);
        self.run(parameters).await
    }

    /// Execute with `input` instead of the bound parameters when it is not
    /// empty. Positional keys are 0-based as in [`PreparedStatement::bind_values`].
    pub async fn execute_with<I, K, V>(&mut self, input: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ParamKey>,
        V: Into<Value>,
    {
        let input = collect_zero_based(input)?;
        let bound = std::mem::take(&mut self.parameters);
        let parameters = if input.is_empty() { bound } else { input };
        self.run(parameters).await
    }

    async fn run(&mut self, parameters: Vec<BoundParameter>) -> Result<()> {
        if self.executed && !self.handle.close_cursor() {
            tracing::warn!(
                target: "dbal_compat",
                sql = %self.sql,
                "closing cursor failed, preparing statement again"
            );
            self.handle = self.connection.driver().prepare(&self.sql)?;
        }

        for parameter in parameters.iter().cloned() {
            self.handle
                .bind_value(parameter.key, parameter.value, parameter.param_type)?;
        }

        self.connection.log_statement(&self.sql, parameters.len());
        if let Err(err) = self.handle.execute().await {
            tracing::error!(target: "dbal_compat", sql = %self.sql, error = %err, "statement failed");
            return Err(err);
        }
        self.executed = true;
        Ok(())
    }

    /// Next row in the default fetch mode
    pub fn fetch(&mut self) -> Option<FetchedRow> {
        self.fetch_with(self.default_fetch_mode)
    }

    /// Next row in the given fetch mode
    pub fn fetch_with(&mut self, mode: FetchMode) -> Option<FetchedRow> {
        self.handle
            .fetch()
            .map(|row| FetchedRow::from_row(row, mode))
    }

    /// All remaining rows in the default fetch mode
    pub fn fetch_all(&mut self) -> Vec<FetchedRow> {
        self.fetch_all_with(self.default_fetch_mode)
    }

    /// All remaining rows in the given fetch mode
    pub fn fetch_all_with(&mut self, mode: FetchMode) -> Vec<FetchedRow> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_with(mode) {
            rows.push(row);
        }
        rows
    }

    /// Move the cursor to a 0-based row
    pub fn seek(&mut self, row: usize) -> bool {
        self.handle.seek(row)
    }

    /// Release the cursor
    pub fn free(&mut self) -> bool {
        self.handle.close_cursor()
    }

    pub fn row_count(&self) -> u64 {
        self.handle.row_count()
    }

    pub fn error_code(&self) -> Option<String> {
        self.handle.error_code()
    }

    pub fn error_info(&self) -> Option<String> {
        self.handle.error_info()
    }

    /// Set the default fetch mode; only `FETCH_ASSOC` and `FETCH_NUM` are accepted
    pub fn set_fetch_mode(&mut self, mode: impl Into<i32>) -> Result<()> {
        self.default_fetch_mode = FetchMode::try_from(mode.into())?;
        Ok(())
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.default_fetch_mode
    }

    fn store(&mut self, parameter: BoundParameter) {
        match self.parameters.iter_mut().find(|p| p.key == parameter.key) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }
}

impl<D: Driver> Drop for PreparedStatement<D> {
    fn drop(&mut self) {
        self.handle.close_cursor();
    }
}

fn validate_key(key: ParamKey) -> Result<ParamKey> {
    match &key {
        ParamKey::Positional(0) => Err(Error::invalid_argument(
            "Positional parameters are 1-based",
        )),
        ParamKey::Positional(_) => Ok(key),
        ParamKey::Named(name) => {
            crate::binder::validate_placeholder_name(name)?;
            Ok(key)
        }
    }
}

fn collect_zero_based<I, K, V>(values: I) -> Result<Vec<BoundParameter>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<ParamKey>,
    V: Into<Value>,
{
    values
        .into_iter()
        .map(|(key, value)| {
            let key = match key.into() {
                ParamKey::Positional(index) => ParamKey::Positional(index + 1),
                ParamKey::Named(name) => validate_key(ParamKey::named(name))?,
            };
            Ok(BoundParameter::auto(key, value.into()))
        })
        .collect()
}
