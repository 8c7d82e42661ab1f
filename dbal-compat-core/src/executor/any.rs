//! sqlx-backed driver over `AnyPool`

use std::sync::Arc;

use futures::TryStreamExt;
use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Either, Row as _, ValueRef};

use super::{Driver, DriverStatement, Row, UpdateResult};
use crate::placeholder::CompiledSql;
use crate::platform::{Platform, PlatformKind};
use crate::value::{BoundParameter, ParamKey, ParamType, Value};
use crate::{ConnectionConfig, Error, Result};

/// Driver executing through an sqlx `AnyPool`
#[derive(Debug, Clone)]
pub struct SqlxDriver {
    pool: AnyPool,
    platform: Arc<dyn Platform>,
}

impl SqlxDriver {
    /// Open a pool for the configured database
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let url = config.connection_url();
        let kind = PlatformKind::from_url(&url)?;
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await?;
        Ok(Self::from_pool(pool, kind))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: AnyPool, kind: PlatformKind) -> Self {
        Self {
            pool,
            platform: kind.platform(),
        }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

impl Driver for SqlxDriver {
    type Statement = SqlxStatement;

    fn platform(&self) -> Arc<dyn Platform> {
        self.platform.clone()
    }

    async fn execute_update(&self, sql: &str, params: &[BoundParameter]) -> Result<UpdateResult> {
        let compiled = CompiledSql::parse(sql, self.platform.as_ref());
        let values = compiled.arrange(params)?;
        let native = compiled.render(self.platform.as_ref());
        let result = bind_values(sqlx::query(&native), values)
            .execute(&self.pool)
            .await?;
        Ok(UpdateResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    fn prepare(&self, sql: &str) -> Result<SqlxStatement> {
        let compiled = CompiledSql::parse(sql, self.platform.as_ref());
        Ok(SqlxStatement {
            pool: self.pool.clone(),
            native: compiled.render(self.platform.as_ref()),
            compiled,
            bindings: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
            affected: 0,
            last_error: None,
        })
    }
}

/// Prepared statement of [`SqlxDriver`]. The result set is buffered on execute.
#[derive(Debug)]
pub struct SqlxStatement {
    pool: AnyPool,
    compiled: CompiledSql,
    native: String,
    bindings: Vec<BoundParameter>,
    rows: Vec<Row>,
    cursor: usize,
    affected: u64,
    last_error: Option<(Option<String>, String)>,
}

impl DriverStatement for SqlxStatement {
    fn bind_value(&mut self, key: ParamKey, value: Value, param_type: ParamType) -> Result<()> {
        self.bindings.retain(|p| p.key != key);
        self.bindings.push(BoundParameter {
            key,
            value,
            param_type,
        });
        Ok(())
    }

    async fn execute(&mut self) -> Result<()> {
        let bindings = std::mem::take(&mut self.bindings);
        let values = self.compiled.arrange(&bindings)?;
        self.rows.clear();
        self.cursor = 0;
        self.affected = 0;

        match run(&self.pool, &self.native, values).await {
            Ok((affected, rows)) => {
                self.affected = affected;
                self.rows = rows;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                let code = match &err {
                    sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
                    _ => None,
                };
                self.last_error = Some((code, err.to_string()));
                Err(Error::Database(err))
            }
        }
    }

    fn fetch(&mut self) -> Option<Row> {
        let row = self.rows.get(self.cursor).cloned();
        if row.is_some() {
            self.cursor += 1;
        }
        row
    }

    fn seek(&mut self, row: usize) -> bool {
        if row < self.rows.len() {
            self.cursor = row;
            true
        } else {
            false
        }
    }

    fn close_cursor(&mut self) -> bool {
        self.rows.clear();
        self.cursor = 0;
        true
    }

    fn row_count(&self) -> u64 {
        if self.rows.is_empty() {
            self.affected
        } else {
            self.rows.len() as u64
        }
    }

    fn error_code(&self) -> Option<String> {
        self.last_error.as_ref().and_then(|(code, _)| code.clone())
    }

    fn error_info(&self) -> Option<String> {
        self.last_error.as_ref().map(|(_, message)| message.clone())
    }
}

/// Run one statement and collect the affected count and every returned row
async fn run(
    pool: &AnyPool,
    sql: &str,
    values: Vec<Value>,
) -> std::result::Result<(u64, Vec<Row>), sqlx::Error> {
    let mut stream = bind_values(sqlx::query(sql), values).fetch_many(pool);
    let mut affected = 0;
    let mut rows = Vec::new();
    while let Some(item) = stream.try_next().await? {
        match item {
            Either::Left(result) => affected += result.rows_affected(),
            Either::Right(row) => rows.push(decode_row(&row)?),
        }
    }
    Ok((affected, rows))
}

/// Bind values to a sqlx query
fn bind_values<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    values: Vec<Value>,
) -> Query<'q, Any, AnyArguments<'q>> {
    for value in values {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(b),
            Value::I32(i) => query.bind(i),
            Value::I64(i) => query.bind(i),
            Value::F64(f) => query.bind(f),
            Value::String(s) => query.bind(s),
            Value::Bytes(b) => query.bind(b),
        };
    }
    query
}

/// Convert a row into values, trying the narrowest matching type per column
fn decode_row(row: &AnyRow) -> std::result::Result<Row, sqlx::Error> {
    let mut decoded = Vec::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let value = if row.try_get_raw(i)?.is_null() {
            Value::Null
        } else if let Ok(v) = row.try_get::<i64, _>(i) {
            Value::I64(v)
        } else if let Ok(v) = row.try_get::<f64, _>(i) {
            Value::F64(v)
        } else if let Ok(v) = row.try_get::<bool, _>(i) {
            Value::Bool(v)
        } else if let Ok(v) = row.try_get::<String, _>(i) {
            Value::String(v)
        } else {
            Value::Bytes(row.try_get::<Vec<u8>, _>(i)?)
        };
        decoded.push((column.name().to_string(), value));
    }
    Ok(decoded)
}
