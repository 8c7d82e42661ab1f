//! dbal-compat - TYPO3-style database access on top of sqlx
//!
//! Re-exports the statement builders, expression builder and prepared
//! statements of `dbal-compat-core` and adds the legacy string-based API in
//! [`legacy`].
//!
//! ```no_run
//! use dbal_compat::{ConnectionConfig, ExecutableModification, QueryBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> dbal_compat::Result<()> {
//! let conn = dbal_compat::connect(ConnectionConfig::default().url("sqlite::memory:")).await?;
//!
//! let mut query = conn.update_query().update("pages")?;
//! let title = query.bind_value("Home");
//! let uid = query.bind_value(1);
//! let mut query = query.set("title", title).where_(conn.expr().eq("uid", &uid))?;
//! query.execute(&conn).await?;
//!
//! let db = dbal_compat::legacy(conn);
//! let rows = db
//!     .exec_select_get_rows(dbal_compat::legacy::SelectParts::new("*", "pages"))
//!     .await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

pub mod legacy;

pub use dbal_compat_core::*;

use legacy::LegacyDatabase;

/// Open a pooled connection for the given configuration
pub async fn connect(config: ConnectionConfig) -> Result<Connection<SqlxDriver>> {
    Connection::connect(config).await
}

/// Wrap a connection in the legacy API
pub fn legacy<D: Driver>(connection: Connection<D>) -> LegacyDatabase<D> {
    LegacyDatabase::new(connection)
}
