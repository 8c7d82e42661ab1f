//! UPDATE statement builder

use std::fmt::Display;

use super::common::{
    require_table, validate_table, zip_columns, IntoAssignments, QueryBuilder, QueryKind,
    WhereClause,
};
use crate::binder::ParameterBinder;
use crate::expression::IntoConstraints;
use crate::{Error, Expression, Result};

/// UPDATE statement builder
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub expr: Expression,
    table: Option<String>,
    set_clauses: Vec<(String, String)>,
    where_clause: WhereClause,
    binder: ParameterBinder,
}

impl UpdateQuery {
    pub fn new(expr: Expression) -> Self {
        Self {
            expr,
            table: None,
            set_clauses: Vec::new(),
            where_clause: WhereClause::default(),
            binder: ParameterBinder::new(),
        }
    }

    /// Set the target table; fails on a blank or numeric name
    pub fn update(mut self, table: &str) -> Result<Self> {
        self.table = Some(validate_table(QueryKind::Update, table)?);
        Ok(self)
    }

    /// Append `column = value`
    pub fn set(mut self, column: &str, value: impl Display) -> Self {
        self.set_clauses.push((column.to_string(), value.to_string()));
        self
    }

    /// Append assignments from two parallel lists of equal length
    ///
    /// # Examples
    /// ```
    /// use dbal_compat_core::{Expression, QueryBuilder, UpdateQuery, MySqlPlatform};
    /// use std::sync::Arc;
    ///
    /// let query = UpdateQuery::new(Expression::new(Arc::new(MySqlPlatform)))
    ///     .update("t")
    ///     .unwrap()
    ///     .set_columns(["a", "b"], [1, 2])
    ///     .unwrap();
    /// assert_eq!(query.to_sql().unwrap(), "UPDATE t SET a = 1, b = 2");
    /// ```
    pub fn set_columns<C, V>(
        mut self,
        columns: impl IntoIterator<Item = C>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self>
    where
        C: Into<String>,
        V: Display,
    {
        let pairs = zip_columns(QueryKind::Update, columns, values)?;
        self.set_clauses.extend(pairs);
        Ok(self)
    }

    /// Append every pair in order
    pub fn set_all<T>(mut self, data: T) -> Self
    where
        T: IntoAssignments,
    {
        self.set_clauses.extend(data.into_assignments());
        self
    }

    /// Add WHERE constraints, AND-combined with the existing ones.
    ///
    /// Takes one fragment or a sequence of fragments. Empty fragments are
    /// ignored; an empty sequence is rejected.
    pub fn where_(mut self, constraints: impl IntoConstraints) -> Result<Self> {
        self.where_clause.push(constraints.into_constraints())?;
        Ok(self)
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl QueryBuilder for UpdateQuery {
    fn kind(&self) -> QueryKind {
        QueryKind::Update
    }

    fn to_sql(&self) -> Result<String> {
        let table = require_table(QueryKind::Update, &self.table)?;
        if self.set_clauses.is_empty() {
            return Err(Error::missing_values(QueryKind::Update.as_str()));
        }

        let mut sql = String::new();
        sql.push_str("UPDATE ");
        sql.push_str(table);

        sql.push_str(" SET ");
        let set_parts: Vec<String> = self
            .set_clauses
            .iter()
            .map(|(column, value)| format!("{} = {}", column, value))
            .collect();
        sql.push_str(&set_parts.join(", "));

        self.where_clause.render_into(&mut sql);

        Ok(sql)
    }

    fn binder(&self) -> &ParameterBinder {
        &self.binder
    }

    fn binder_mut(&mut self) -> &mut ParameterBinder {
        &mut self.binder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MySqlPlatform;
    use crate::QueryErrorKind;
    use std::sync::Arc;

    fn query() -> UpdateQuery {
        UpdateQuery::new(Expression::new(Arc::new(MySqlPlatform)))
    }

    #[test]
    fn test_update_without_where() {
        let q = query()
            .update("aTable")
            .unwrap()
            .set("aField", "Test")
            .set("anotherField", 3);
        assert_eq!(
            q.to_sql().unwrap(),
            "UPDATE aTable SET aField = Test, anotherField = 3"
        );
    }

    #[test]
    fn test_single_where_is_bare() {
        let q = query().update("t").unwrap().set("a", 1);
        let constraint = q.expr.eq("uid", 5);
        let q = q.where_(constraint).unwrap();
        assert_eq!(q.to_sql().unwrap(), "UPDATE t SET a = 1 WHERE uid = 5");
    }

    #[test]
    fn test_multiple_where_are_and_joined() {
        let q = query().update("t").unwrap().set("a", 1);
        let constraints = vec![q.expr.eq("uid", 5), q.expr.gt("pid", 0)];
        let q = q.where_(constraints).unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "UPDATE t SET a = 1 WHERE (uid = 5) AND (pid > 0)"
        );

        let q = q.where_("deleted = 0").unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "UPDATE t SET a = 1 WHERE (uid = 5) AND (pid > 0) AND (deleted = 0)"
        );
    }

    #[test]
    fn test_empty_where_is_dropped() {
        let q = query().update("t").unwrap().set("a", 1).where_("").unwrap();
        assert_eq!(q.to_sql().unwrap(), "UPDATE t SET a = 1");

        let with_empty = query()
            .update("t")
            .unwrap()
            .set("a", 1)
            .where_(["a = 1", "", "b = 2"])
            .unwrap();
        let without_empty = query()
            .update("t")
            .unwrap()
            .set("a", 1)
            .where_(["a = 1", "b = 2"])
            .unwrap();
        assert_eq!(with_empty.to_sql().unwrap(), without_empty.to_sql().unwrap());
    }

    #[test]
    fn test_where_without_constraints_fails() {
        let err = query()
            .update("t")
            .unwrap()
            .where_(Vec::<String>::new())
            .unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::InvalidArgument));
    }

    #[test]
    fn test_set_columns_equals_chained_set() {
        let zipped = query()
            .update("t")
            .unwrap()
            .set_columns(["a", "b"], [1, 2])
            .unwrap();
        let chained = query().update("t").unwrap().set("a", 1).set("b", 2);
        assert_eq!(zipped.to_sql().unwrap(), chained.to_sql().unwrap());
    }

    #[test]
    fn test_set_columns_arity_mismatch() {
        let err = query()
            .update("t")
            .unwrap()
            .set_columns(["a"], [1, 2])
            .unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::ArityMismatch));
    }

    #[test]
    fn test_set_all_keeps_duplicates() {
        let q = query()
            .update("t")
            .unwrap()
            .set_all(vec![("a", 1), ("a", 2)]);
        assert_eq!(q.to_sql().unwrap(), "UPDATE t SET a = 1, a = 2");
    }

    #[test]
    fn test_missing_values_and_table() {
        let err = query().update("t").unwrap().to_sql().unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::MissingValues));

        let err = query().update("  ").unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::MissingTable));
    }

    #[test]
    fn test_bound_where() {
        let mut q = query().update("pages").unwrap();
        let title = q.bind_value("Home");
        let uid = q.bind_value(12);
        let constraint = q.expr.eq("uid", &uid);
        let q = q.set("title", title).where_(constraint).unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "UPDATE pages SET title = :placeholder1 WHERE uid = :placeholder2"
        );
    }
}
