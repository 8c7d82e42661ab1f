//! TRUNCATE statement builder

use super::common::{require_table, validate_table, QueryBuilder, QueryKind};
use crate::binder::ParameterBinder;
use crate::{Expression, Result};

/// TRUNCATE statement builder, rendered in the connection's dialect
#[derive(Debug, Clone)]
pub struct TruncateQuery {
    pub expr: Expression,
    table: Option<String>,
    binder: ParameterBinder,
}

impl TruncateQuery {
    pub fn new(expr: Expression) -> Self {
        Self {
            expr,
            table: None,
            binder: ParameterBinder::new(),
        }
    }

    /// Set the target table; fails on a blank or numeric name
    pub fn truncate(mut self, table: &str) -> Result<Self> {
        self.table = Some(validate_table(QueryKind::Truncate, table)?);
        Ok(self)
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl QueryBuilder for TruncateQuery {
    fn kind(&self) -> QueryKind {
        QueryKind::Truncate
    }

    fn to_sql(&self) -> Result<String> {
        let table = require_table(QueryKind::Truncate, &self.table)?;
        Ok(self.expr.platform().truncate_table_sql(table))
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
    use crate::platform::{MySqlPlatform, SqlitePlatform};
    use crate::QueryErrorKind;
    use std::sync::Arc;

    #[test]
    fn test_truncate_mysql() {
        let q = TruncateQuery::new(Expression::new(Arc::new(MySqlPlatform)))
            .truncate("aTable")
            .unwrap();
        assert_eq!(q.to_sql().unwrap(), "TRUNCATE aTable");
        assert_eq!(q.kind(), QueryKind::Truncate);
    }

    #[test]
    fn test_truncate_sqlite() {
        let q = TruncateQuery::new(Expression::new(Arc::new(SqlitePlatform)))
            .truncate("aTable")
            .unwrap();
        assert_eq!(q.to_sql().unwrap(), "DELETE FROM aTable");
    }

    #[test]
    fn test_invalid_table() {
        let err = TruncateQuery::new(Expression::new(Arc::new(MySqlPlatform)))
            .truncate("")
            .unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::MissingTable));
    }
}
