//! Statement builder module

pub mod common;
pub mod delete;
pub mod insert;
pub mod query;
pub mod truncate;
pub mod update;

// Re-export types from submodules
pub use common::{IntoAssignments, QueryBuilder, QueryKind};
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use query::Query;
pub use truncate::TruncateQuery;
pub use update::UpdateQuery;
