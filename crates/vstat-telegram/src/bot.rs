//! Long-polling bot loop

use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info, warn};

use vstat_core::{Error, LlmProvider, QueryProcessor, Result, SqlExecutor};

use crate::api::{ApiResponse, Update};

const WELCOME_TEXT: &str = "Привет! Я бот для аналитики видео. \
Задайте вопрос на русском языке о статистике видео, и я отвечу числом.\n\n\
Примеры вопросов:\n\
• Сколько всего видео есть в системе?\n\
• Сколько видео у креатора с id abc123 вышло с 1 ноября 2025 по 5 ноября 2025?\n\
• Сколько видео набрало больше 100 000 просмотров?\n\
• На сколько просмотров в сумме выросли все видео 28 ноября 2025?\n\
• Сколько разных видео получали новые просмотры 27 ноября 2025?";

const HELP_TEXT: &str = "Я понимаю вопросы на русском языке о статистике видео. \
Все ответы - это числа.\n\n\
Примеры:\n\
• Сколько всего видео?\n\
• Сколько видео вышло в ноябре 2025?\n\
• На сколько выросли просмотры вчера?";

const EMPTY_QUERY_TEXT: &str = "Пожалуйста, введите вопрос.";

const REPHRASE_TEXT: &str = "Извините, не удалось обработать ваш запрос. \
Пожалуйста, уточните вопрос или попробуйте другой формат.";

const INTERNAL_ERROR_TEXT: &str = "Произошла ошибка при обработке запроса. Попробуйте позже.";

/// Seconds the getUpdates call blocks server-side waiting for messages
const POLL_TIMEOUT_SECS: u64 = 30;

/// Telegram bot that forwards every non-command message to the query
/// processor and replies with a single number or a polite failure message
pub struct TelegramBot<L: LlmProvider, E: SqlExecutor> {
    token: String,
    client: Client,
    processor: QueryProcessor<L, E>,
}

impl<L: LlmProvider, E: SqlExecutor> TelegramBot<L, E> {
    pub fn new(token: String, processor: QueryProcessor<L, E>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self {
            token,
            client,
            processor,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.token)
    }

    /// Run the long-polling loop until the process is stopped
    pub async fn run(&self) -> Result<()> {
        info!("starting bot polling");
        let mut offset: i64 = 0;

        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "getUpdates failed, retrying");
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(message) = update.message else {
                    continue;
                };
                let Some(text) = message.text.clone() else {
                    continue;
                };
                if let Err(e) = self.handle_text(message.chat.id, &text).await {
                    error!(error = %e, "failed to handle message");
                    // Best effort: the user still gets a reply
                    let _ = self.send_message(message.chat.id, INTERNAL_ERROR_TEXT).await;
                }
            }
        }
    }

    async fn handle_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let query = text.trim();

        if query.is_empty() {
            return self.send_message(chat_id, EMPTY_QUERY_TEXT).await;
        }
        if query == "/start" {
            return self.send_message(chat_id, WELCOME_TEXT).await;
        }
        if query == "/help" {
            return self.send_message(chat_id, HELP_TEXT).await;
        }

        self.send_typing(chat_id).await?;

        match self.processor.process_query(query).await {
            Ok(answer) => self.send_message(chat_id, &answer.to_string()).await,
            Err(e) => {
                warn!(error = %e, query = %query, "failed to process query");
                self.send_message(chat_id, REPHRASE_TEXT).await
            }
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let response = self
            .client
            .get(self.api_url("getUpdates"))
            .query(&[("timeout", POLL_TIMEOUT_SECS as i64), ("offset", offset)])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let data: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if !data.ok {
            return Err(Error::Network(format!(
                "getUpdates rejected: {}",
                data.description.unwrap_or_default()
            )));
        }
        Ok(data.result.unwrap_or_default())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.call_method("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.call_method(
            "sendChatAction",
            json!({ "chat_id": chat_id, "action": "typing" }),
        )
        .await
    }

    async fn call_method(&self, method: &str, body: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "{method} failed with status {status}: {text}"
            )));
        }
        Ok(())
    }
}
