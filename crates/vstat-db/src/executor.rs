//! Single-scalar SQL executor backed by a PostgreSQL pool

use async_trait::async_trait;
use bigdecimal::ToPrimitive;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use vstat_core::{Error, Result, SqlExecutor};

/// PostgreSQL executor for generated single-value aggregate queries
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    /// Connect to the database
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}

/// Coerce the first column of a result row to an integer. Floating sums
/// are truncated toward the integer value; anything non-numeric is an
/// error, not a panic.
fn scalar_from_row(row: &PgRow) -> Result<i64> {
    if let Ok(value) = row.try_get::<i64, _>(0) {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<i32, _>(0) {
        return Ok(value as i64);
    }
    if let Ok(value) = row.try_get::<f64, _>(0) {
        return Ok(value as i64);
    }
    // SUM over bigint columns comes back as NUMERIC
    if let Ok(value) = row.try_get::<sqlx::types::BigDecimal, _>(0) {
        return value
            .to_i64()
            .or_else(|| value.to_f64().map(|f| f as i64))
            .ok_or_else(|| Error::NonNumericResult(value.to_string()));
    }
    Err(Error::NonNumericResult(
        "first column is not a numeric type".to_string(),
    ))
}

#[async_trait]
impl SqlExecutor for PgExecutor {
    async fn fetch_scalar(&self, sql: &str) -> Result<i64> {
        let row = sqlx::query(sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?
            .ok_or(Error::EmptyResult)?;
        scalar_from_row(&row)
    }
}
