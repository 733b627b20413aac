use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vstat_core::{LlmProvider, QueryProcessor};
use vstat_db::PgExecutor;
use vstat_openai::OpenAiClient;
use vstat_telegram::TelegramBot;

mod settings;

use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env()?;

    let executor = PgExecutor::connect(&settings.database_url).await?;
    let llm = OpenAiClient::from_env()?;
    info!(model = llm.model_id(), "LLM client ready");

    let processor = QueryProcessor::with_llm(llm, executor);
    let bot = TelegramBot::new(settings.telegram_bot_token, processor)?;

    bot.run().await?;
    Ok(())
}
