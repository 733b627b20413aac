//! Query generation orchestrator
//!
//! One request flows through the stages in strict order:
//! exact lookup -> primary rules -> LLM call -> fallback rules. Each stage
//! either returns a final SQL string or falls through; only when every
//! stage misses does the request fail with [`Error::NoSqlProduced`].

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::executor::SqlExecutor;
use crate::llm::LlmProvider;
use crate::prompt;
use crate::rules::{RuleSet, Stage};

/// Strict-JSON contract expected from the LLM
#[derive(Debug, Deserialize)]
struct LlmSqlResponse {
    sql: String,
    #[allow(dead_code)]
    explanation: String,
}

/// Orchestrates NL-to-SQL generation and execution for one question at a
/// time. The LLM is an injected optional dependency; `None` skips that
/// stage entirely. Holds no mutable state, so one processor serves all
/// requests.
pub struct QueryProcessor<L: LlmProvider, E: SqlExecutor> {
    rules: RuleSet,
    llm: Option<L>,
    executor: E,
}

impl<L: LlmProvider, E: SqlExecutor> QueryProcessor<L, E> {
    /// Create a processor without an LLM stage (rules only)
    pub fn new(executor: E) -> Self {
        Self {
            rules: RuleSet::new(),
            llm: None,
            executor,
        }
    }

    /// Create a processor with an LLM stage between the rule passes
    pub fn with_llm(llm: L, executor: E) -> Self {
        Self {
            rules: RuleSet::new(),
            llm: Some(llm),
            executor,
        }
    }

    /// Translate a Russian question into a single-value SQL statement
    pub async fn generate_sql(&self, text: &str) -> Result<String> {
        if let Some(sql) = self.rules.known_query(text) {
            debug!(sql = %sql, "known question matched");
            return Ok(sql);
        }

        let parsed = self.rules.parse(text);

        if let Some(sql) = self.rules.apply(Stage::Primary, &parsed) {
            return Ok(sql);
        }

        if let Some(llm) = &self.llm {
            match self.generate_via_llm(llm, text).await {
                Ok(sql) => return Ok(sql),
                // Contract violations and transport errors are soft
                // failures at this stage
                Err(e) => warn!(error = %e, "LLM stage failed, trying fallback rules"),
            }
        }

        if let Some(sql) = self.rules.apply(Stage::Fallback, &parsed) {
            return Ok(sql);
        }

        Err(Error::NoSqlProduced)
    }

    /// Generate SQL, execute it, and return the single numeric answer
    pub async fn process_query(&self, text: &str) -> Result<i64> {
        let sql = self.generate_sql(text).await?;
        debug!(sql = %sql, "executing generated SQL");
        self.executor.fetch_scalar(&sql).await
    }

    async fn generate_via_llm(&self, llm: &L, text: &str) -> Result<String> {
        let system = prompt::system_prompt();
        let user = format!("Вопрос: {text}");
        let content = llm.complete(&system, &user).await?;

        let response: LlmSqlResponse = serde_json::from_str(content.trim())
            .map_err(|e| Error::Serialization(format!("LLM response is not valid JSON: {e}")))?;

        let sql = response.sql.trim();
        let starts_with_select = sql
            .get(..6)
            .map(|head| head.eq_ignore_ascii_case("SELECT"))
            .unwrap_or(false);
        if !starts_with_select {
            return Err(Error::LlmProvider(format!(
                "LLM produced invalid SQL: {sql:?}"
            )));
        }
        Ok(sql.to_string())
    }
}
