//! Common types and traits shared across all statement builders

use std::fmt::{self, Display};

use crate::binder::{ParamRef, ParameterBinder};
use crate::expression::composite;
use crate::value::{BoundParameter, ParamType, Value};
use crate::{Error, Result};

/// Kind of statement a builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Insert,
    Update,
    Delete,
    Truncate,
}

impl QueryKind {
    /// Statement keyword, as used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Insert => "INSERT",
            QueryKind::Update => "UPDATE",
            QueryKind::Delete => "DELETE",
            QueryKind::Truncate => "TRUNCATE",
        }
    }
}

impl Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait for all statement builders
pub trait QueryBuilder {
    /// Which statement this builder renders
    fn kind(&self) -> QueryKind;

    /// Render the statement. Pure: repeated calls return the same text.
    fn to_sql(&self) -> Result<String>;

    fn binder(&self) -> &ParameterBinder;

    fn binder_mut(&mut self) -> &mut ParameterBinder;

    /// Current parameter list, ready for the driver
    fn parameters(&self) -> Result<Vec<BoundParameter>> {
        self.binder().resolve()
    }

    /// Bind a value and return the generated placeholder
    fn bind_value(&mut self, value: impl Into<Value>) -> String
    where
        Self: Sized,
    {
        self.binder_mut().bind_value(value)
    }

    fn bind_value_as(
        &mut self,
        value: impl Into<Value>,
        placeholder: Option<&str>,
        param_type: ParamType,
    ) -> Result<String>
    where
        Self: Sized,
    {
        self.binder_mut().bind_value_as(value, placeholder, param_type)
    }

    /// Bind a reference whose value is read at execution
    fn bind_param(&mut self, param: &ParamRef) -> String
    where
        Self: Sized,
    {
        self.binder_mut().bind_param(param)
    }

    fn bind_param_as(
        &mut self,
        param: &ParamRef,
        placeholder: Option<&str>,
        param_type: ParamType,
    ) -> Result<String>
    where
        Self: Sized,
    {
        self.binder_mut().bind_param_as(param, placeholder, param_type)
    }
}

/// Trait for types that can be converted to column/value pairs
pub trait IntoAssignments {
    fn into_assignments(self) -> Vec<(String, String)>;
}

impl<K, V> IntoAssignments for Vec<(K, V)>
where
    K: Into<String>,
    V: Display,
{
    fn into_assignments(self) -> Vec<(String, String)> {
        self.into_iter()
            .map(|(column, value)| (column.into(), value.to_string()))
            .collect()
    }
}

impl<K, V, const N: usize> IntoAssignments for [(K, V); N]
where
    K: Into<String>,
    V: Display,
{
    fn into_assignments(self) -> Vec<(String, String)> {
        self.into_iter()
            .map(|(column, value)| (column.into(), value.to_string()))
            .collect()
    }
}

/// Validate a table name: it must be neither blank nor numeric
pub(crate) fn validate_table(kind: QueryKind, table: &str) -> Result<String> {
    if table.trim().is_empty() || is_numeric(table) {
        return Err(Error::missing_table(kind.as_str()));
    }
    Ok(table.to_string())
}

fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    value.parse::<f64>().is_ok() && value.bytes().any(|b| b.is_ascii_digit())
}

/// The table of a builder whose setter was never called
pub(crate) fn require_table(kind: QueryKind, table: &Option<String>) -> Result<&str> {
    table
        .as_deref()
        .ok_or_else(|| Error::missing_table(kind.as_str()))
}

/// Zip parallel column and value lists
pub(crate) fn zip_columns<C, V>(
    kind: QueryKind,
    columns: impl IntoIterator<Item = C>,
    values: impl IntoIterator<Item = V>,
) -> Result<Vec<(String, String)>>
where
    C: Into<String>,
    V: Display,
{
    let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
    let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    if columns.len() != values.len() {
        return Err(Error::arity_mismatch(kind.as_str(), columns.len(), values.len()));
    }
    if columns.is_empty() {
        return Err(Error::missing_values(kind.as_str()));
    }
    Ok(columns.into_iter().zip(values).collect())
}

/// WHERE constraints of an UPDATE or DELETE
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WhereClause {
    constraints: Vec<String>,
}

impl WhereClause {
    /// Append constraints, dropping empty ones. At least one constraint must be given.
    pub(crate) fn push(&mut self, constraints: Vec<String>) -> Result<()> {
        if constraints.is_empty() {
            return Err(Error::invalid_argument("No constraints given!"));
        }
        self.constraints
            .extend(constraints.into_iter().filter(|c| !c.is_empty()));
        Ok(())
    }

    /// Append the ` WHERE ...` suffix, if any constraint survived
    pub(crate) fn render_into(&self, sql: &mut String) {
        let rendered = composite("AND", self.constraints.clone());
        if !rendered.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&rendered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryErrorKind;

    #[test]
    fn test_validate_table() {
        assert_eq!(validate_table(QueryKind::Insert, "pages").unwrap(), "pages");
        for bad in ["", "   ", "1", "42", " 3.5", "1e3"] {
            let err = validate_table(QueryKind::Insert, bad).unwrap_err();
            assert_eq!(err.query_kind(), Some(QueryErrorKind::MissingTable), "{bad:?}");
        }
        // not numeric, even though they contain digits
        assert!(validate_table(QueryKind::Delete, "tt_content2").is_ok());
        assert!(validate_table(QueryKind::Delete, "inf").is_ok());
    }

    #[test]
    fn test_zip_columns() {
        let pairs = zip_columns(QueryKind::Update, ["a", "b"], [1, 2]).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );

        let err = zip_columns(QueryKind::Update, ["a"], [1, 2]).unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::ArityMismatch));

        let err = zip_columns(QueryKind::Update, Vec::<&str>::new(), Vec::<i32>::new())
            .unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::MissingValues));
    }

    #[test]
    fn test_where_clause_rendering() {
        let mut clause = WhereClause::default();
        let mut sql = String::from("DELETE FROM t");
        clause.render_into(&mut sql);
        assert_eq!(sql, "DELETE FROM t");

        clause.push(vec!["a = 1".to_string(), String::new()]).unwrap();
        let mut sql = String::new();
        clause.render_into(&mut sql);
        assert_eq!(sql, " WHERE a = 1");

        clause.push(vec!["b = 2".to_string()]).unwrap();
        let mut sql = String::new();
        clause.render_into(&mut sql);
        assert_eq!(sql, " WHERE (a = 1) AND (b = 2)");
    }

    #[test]
    fn test_where_clause_requires_constraints() {
        let mut clause = WhereClause::default();
        let err = clause.push(Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: No constraints given!");
    }
}
