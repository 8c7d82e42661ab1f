//! dbal-compat core - statement builders, WHERE-clause expressions, parameter
//! binding and prepared statements on top of sqlx.
//!
//! Builders render plain SQL text; values are either written into the text
//! already quoted or bound and referenced by placeholder.

pub mod binder;
pub mod builder;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod expression;
pub mod operator;
pub mod placeholder;
pub mod platform;
pub mod schema;
pub mod statement;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod value;

// Re-export main types
pub use binder::{ParamRef, ParameterBinder};
pub use builder::{
    DeleteQuery, InsertQuery, IntoAssignments, Query, QueryBuilder, QueryKind, TruncateQuery,
    UpdateQuery,
};
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use error::{Error, QueryError, QueryErrorKind, Result};
pub use executor::any::SqlxDriver;
pub use executor::{Driver, DriverStatement, ExecutableModification, Row, UpdateResult};
pub use expression::{Expression, IntoConstraints};
pub use operator::Operator;
pub use platform::{MySqlPlatform, Platform, PlatformKind, PostgresPlatform, SqlitePlatform};
pub use schema::{ColumnInfo, IndexInfo};
pub use statement::{FetchMode, FetchedRow, PreparedStatement};
pub use value::{BoundParameter, ParamKey, ParamType, Value};
