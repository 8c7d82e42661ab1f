//! INSERT statement builder

use std::fmt::Display;

use super::common::{
    require_table, validate_table, zip_columns, IntoAssignments, QueryBuilder, QueryKind,
};
use crate::binder::ParameterBinder;
use crate::{Error, Expression, Result};

/// INSERT statement builder
///
/// Values are SQL expressions and are rendered as given: quote literals with
/// [`Connection::quote`](crate::Connection::quote) or bind them.
///
/// # Examples
/// ```
/// use dbal_compat_core::{Expression, InsertQuery, QueryBuilder, SqlitePlatform};
/// use std::sync::Arc;
///
/// let mut query = InsertQuery::new(Expression::new(Arc::new(SqlitePlatform)))
///     .insert_into("pages")
///     .unwrap();
/// let title = query.bind_value("Home");
/// let query = query.set("pid", 0).set("title", title);
///
/// assert_eq!(
///     query.to_sql().unwrap(),
///     "INSERT INTO pages (pid, title) VALUES(0, :placeholder1)"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct InsertQuery {
    pub expr: Expression,
    table: Option<String>,
    values: Vec<(String, String)>,
    binder: ParameterBinder,
}

impl InsertQuery {
    pub fn new(expr: Expression) -> Self {
        Self {
            expr,
            table: None,
            values: Vec::new(),
            binder: ParameterBinder::new(),
        }
    }

    /// Set the target table; fails on a blank or numeric name
    pub fn insert_into(mut self, table: &str) -> Result<Self> {
        self.table = Some(validate_table(QueryKind::Insert, table)?);
        Ok(self)
    }

    /// Replace all column/value pairs
    pub fn values<T>(mut self, data: T) -> Self
    where
        T: IntoAssignments,
    {
        self.values.clear();
        for (column, value) in data.into_assignments() {
            self.assign(column, value);
        }
        self
    }

    /// Set a single column. Setting a column again overwrites the value but
    /// keeps its position.
    pub fn set(mut self, column: &str, value: impl Display) -> Self {
        self.assign(column.to_string(), value.to_string());
        self
    }

    /// Set columns from two parallel lists of equal length
    pub fn set_columns<C, V>(
        mut self,
        columns: impl IntoIterator<Item = C>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        C: Into<String>,
        V: Display,
    {
        for (column, value) in zip_columns(QueryKind::Insert, columns, values)? {
            self.assign(column, value);
        }
        Ok(self)
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    fn assign(&mut self, column: String, value: String) {
        match self.values.iter_mut().find(|(c, _)| *c == column) {
            Some(existing) => existing.1 = value,
            None => self.values.push((column, value)),
        }
    }
}

impl QueryBuilder for InsertQuery {
    fn kind(&self) -> QueryKind {
        QueryKind::Insert
    }

    fn to_sql(&self) -> Result<String> {
        let table = require_table(QueryKind::Insert, &self.table)?;
        if self.values.is_empty() {
            return Err(Error::missing_values(QueryKind::Insert.as_str()));
        }

        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        let values: Vec<&str> = self.values.iter().map(|(_, v)| v.as_str()).collect();

        Ok(format!(
            "INSERT INTO {} ({}) VALUES({})",
            table,
            columns.join(", "),
            values.join(", ")
        ))
    }

    fn binder(&self) -> &ParameterBinder {
        &self.binder
    }

    fn binder_mut(&mut self) -> &mut ParameterBinder {
        &mut self.binder
    }
}
