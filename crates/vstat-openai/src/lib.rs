//! OpenAI integration for the video statistics bot

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;

// Re-export core types
pub use vstat_core::{Error, LlmProvider, Result};
