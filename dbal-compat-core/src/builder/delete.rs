//! DELETE statement builder

use super::common::{require_table, validate_table, QueryBuilder, QueryKind, WhereClause};
use crate::binder::ParameterBinder;
use crate::expression::IntoConstraints;
use crate::{Expression, Result};

/// DELETE statement builder. Without constraints every row is deleted.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pub expr: Expression,
    table: Option<String>,
    where_clause: WhereClause,
    binder: ParameterBinder,
}

impl DeleteQuery {
    pub fn new(expr: Expression) -> Self {
        Self {
            expr,
            table: None,
            where_clause: WhereClause::default(),
            binder: ParameterBinder::new(),
        }
    }

    /// Set the target table; fails on a blank or numeric name
    pub fn delete(mut self, table: &str) -> Result<Self> {
        self.table = Some(validate_table(QueryKind::Delete, table)?);
        Ok(self)
    }

    /// Add WHERE constraints, AND-combined with the existing ones
    pub fn where_(mut self, constraints: impl IntoConstraints) -> Result<Self> {
        self.where_clause.push(constraints.into_constraints())?;
        Ok(self)
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl QueryBuilder for DeleteQuery {
    fn kind(&self) -> QueryKind {
        QueryKind::Delete
    }

    fn to_sql(&self) -> Result<String> {
        let table = require_table(QueryKind::Delete, &self.table)?;

        let mut sql = String::new();
        sql.push_str("DELETE FROM ");
        sql.push_str(table);
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
