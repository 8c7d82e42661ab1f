//! Any of the statement builders behind one type

use super::common::{QueryBuilder, QueryKind};
use super::{DeleteQuery, InsertQuery, TruncateQuery, UpdateQuery};
use crate::binder::ParameterBinder;
use crate::Result;

/// A statement builder of any kind
#[derive(Debug, Clone)]
pub enum Query {
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
    Truncate(TruncateQuery),
}

impl QueryBuilder for Query {
    fn kind(&self) -> QueryKind {
        match self {
            Query::Insert(q) => q.kind(),
            Query::Update(q) => q.kind(),
            Query::Delete(q) => q.kind(),
            Query::Truncate(q) => q.kind(),
        }
    }

    fn to_sql(&self) -> Result<String> {
        match self {
            Query::Insert(q) => q.to_sql(),
            Query::Update(q) => q.to_sql(),
            Query::Delete(q) => q.to_sql(),
            Query::Truncate(q) => q.to_sql(),
        }
    }

    fn binder(&self) -> &ParameterBinder {
        match self {
            Query::Insert(q) => q.binder(),
            Query::Update(q) => q.binder(),
            Query::Delete(q) => q.binder(),
            Query::Truncate(q) => q.binder(),
        }
    }

    fn binder_mut(&mut self) -> &mut ParameterBinder {
        match self {
            Query::Insert(q) => q.binder_mut(),
            Query::Update(q) => q.binder_mut(),
            Query::Delete(q) => q.binder_mut(),
            Query::Truncate(q) => q.binder_mut(),
        }
    }
}

impl From<InsertQuery> for Query {
    fn from(query: InsertQuery) -> Self {
        Query::Insert(query)
    }
}

impl From<UpdateQuery> for Query {
    fn from(query: UpdateQuery) -> Self {
        Query::Update(query)
    }
}

impl From<DeleteQuery> for Query {
    fn from(query: DeleteQuery) -> Self {
        Query::Delete(query)
    }
}

impl From<TruncateQuery> for Query {
    fn from(query: TruncateQuery) -> Self {
        Query::Truncate(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MySqlPlatform;
    use crate::Expression;
    use std::sync::Arc;

    fn expr() -> Expression {
        Expression::new(Arc::new(MySqlPlatform))
    }

    #[test]
    fn test_dispatch_by_kind() {
        let queries: Vec<Query> = vec![
            InsertQuery::new(expr()).insert_into("t").unwrap().set("a", 1).into(),
            UpdateQuery::new(expr()).update("t").unwrap().set("a", 1).into(),
            DeleteQuery::new(expr()).delete("t").unwrap().into(),
            TruncateQuery::new(expr()).truncate("t").unwrap().into(),
        ];
        let rendered: Vec<(QueryKind, String)> = queries
            .iter()
            .map(|q| (q.kind(), q.to_sql().unwrap()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (QueryKind::Insert, "INSERT INTO t (a) VALUES(1)".to_string()),
                (QueryKind::Update, "UPDATE t SET a = 1".to_string()),
                (QueryKind::Delete, "DELETE FROM t".to_string()),
                (QueryKind::Truncate, "TRUNCATE t".to_string()),
            ]
        );
    }

    #[test]
    fn test_binding_through_enum() {
        let mut query: Query = DeleteQuery::new(expr()).delete("t").unwrap().into();
        assert_eq!(query.bind_value(3), ":placeholder1");
        assert_eq!(query.parameters().unwrap().len(), 1);
    }
}
