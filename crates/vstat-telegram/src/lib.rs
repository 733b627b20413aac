//! Telegram transport for the video statistics bot

mod api;
mod bot;

pub use api::{Chat, Message, Update};
pub use bot::TelegramBot;

// Re-export core types
pub use vstat_core::{Error, Result};
