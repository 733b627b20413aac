//! Core traits and types for the video statistics question answering engine.
//!
//! This crate holds everything needed to turn a Russian free-text analytics
//! question into a single-value SQL statement: the lexical date/time parsers,
//! the entity extractors, the ordered rule table, and the orchestrator that
//! chains them with an injected LLM provider and SQL executor.

pub mod error;
pub mod executor;
pub mod extract;
pub mod llm;
pub mod parse;
pub mod processor;
pub mod prompt;
pub mod query;
pub mod rules;

pub use error::{Error, Result};
pub use executor::SqlExecutor;
pub use llm::{CompletionConfig, LlmProvider};
pub use processor::QueryProcessor;
pub use query::{Metric, MonthYear, ParsedQuery, TimeRange};
pub use rules::{RuleSet, Stage};
