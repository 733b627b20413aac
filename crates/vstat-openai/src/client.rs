//! OpenAI chat-completions client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use vstat_core::{CompletionConfig, Error, LlmProvider, Result};

use crate::config::OpenAiConfig;

/// OpenAI chat-completions client
pub struct OpenAiClient {
    config: OpenAiConfig,
    completion: CompletionConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let completion = CompletionConfig {
            model: config.model.clone(),
            ..Default::default()
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            completion,
            client,
        })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    async fn perform_completion(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.completion.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: self.completion.temperature,
            max_tokens: self.completion.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::LlmProvider(format!(
                "OpenAI API request failed with status {status}: {error_text}"
            )));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(Error::LlmProvider(
                "Empty response from OpenAI API".to_string(),
            ));
        }

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let completion_future = self.perform_completion(system_prompt, user_message);

        match timeout(self.completion.timeout, completion_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("OpenAI request timed out".to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.completion.model
    }
}
