//! PostgreSQL boundary for the video statistics bot
//!
//! The bot only ever reads from the two statistics tables at runtime; the
//! importer and migration runner are one-shot setup tools.

mod executor;
mod import;

pub use executor::PgExecutor;
pub use import::{Dataset, ImportSummary, import_dataset, load_dataset};

// Re-export core types
pub use vstat_core::{Error, Result, SqlExecutor};
