//! SQL executor trait

use async_trait::async_trait;

use super::Result;

/// Trait for running a generated single-value aggregate query.
///
/// Every SQL string produced by this crate yields exactly one row with one
/// column when executed. Implementations read that first cell, truncate
/// floating sums toward an integer, and report empty or non-numeric results
/// as errors rather than panicking.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute the query and return the single scalar it produces
    async fn fetch_scalar(&self, sql: &str) -> Result<i64>;
}
