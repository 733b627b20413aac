//! Tests for the OpenAI client and configuration

use crate::{LlmProvider, OpenAiClient, OpenAiConfig};
use insta::assert_yaml_snapshot;

#[test]
fn config_defaults_snapshot() {
    let config = OpenAiConfig::new("test_api_key_redacted".to_string());

    assert_yaml_snapshot!(config, @r###"
    ---
    api_key: test_api_key_redacted
    api_url: "https://api.openai.com/v1"
    model: gpt-4o-mini
    "###);
}

#[test]
fn client_reports_configured_model() {
    let mut config = OpenAiConfig::new("test_key".to_string());
    config.model = "gpt-4o".to_string();
    let client = OpenAiClient::new(config).unwrap();
    assert_eq!(client.model_id(), "gpt-4o");
}
