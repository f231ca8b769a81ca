//! Natural-language summaries of extracted tables.
//!
//! A [`Summarizer`] turns the plain-text rendering of one table into a short
//! summary. Each table is summarized independently: a failure is recorded on
//! that table's [`TableSummary`] and the remaining tables are still sent.

use crate::error::{Error, Result};
use crate::model::Table;
use crate::render::to_text;

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

/// Default model name.
pub const DEFAULT_MODEL: &str = "mistral-large-latest";

/// Default instruction placed before the table text.
pub const DEFAULT_PROMPT: &str = "Summarize the following table in a few sentences. \
Mention what the table is about, its main figures and any notable trends.";

/// Produces a summary for the text rendering of a table.
pub trait Summarizer {
    fn summarize(&self, text: &str) -> Result<String>;
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> Result<String>,
{
    fn summarize(&self, text: &str) -> Result<String> {
        self(text)
    }
}

/// Summary outcome for one table.
#[derive(Debug)]
pub struct TableSummary {
    /// Position of the table in the extraction (0-based)
    pub index: usize,
    pub outcome: Result<String>,
}

impl TableSummary {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Summary text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }
}

/// Summarize one piece of table text, rejecting blank input.
pub fn summarize_text(summarizer: &dyn Summarizer, text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(Error::Summarize("table text is empty".to_string()));
    }
    let summary = summarizer.summarize(text)?;
    Ok(summary.trim().to_string())
}

/// Summarize every table, one call per table, in order.
pub fn summarize_tables(summarizer: &dyn Summarizer, tables: &[Table]) -> Vec<TableSummary> {
    tables
        .iter()
        .enumerate()
        .map(|(index, table)| {
            let outcome = summarize_text(summarizer, &to_text(table));
            if let Err(e) = &outcome {
                log::warn!("Summary of table {} failed: {}", index + 1, e);
            }
            TableSummary { index, outcome }
        })
        .collect()
}

/// Settings for the HTTP summarizer.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Chat-completions URL
    pub endpoint: String,
    /// Model name sent with each request
    pub model: String,
    /// Bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Instruction placed before the table text
    pub prompt: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 60,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl SummarizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The API key, or a configuration error when it is missing or blank.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::Config("missing API key for the summarizer".to_string())),
        }
    }

    /// Message sent for one table.
    pub fn user_message(&self, text: &str) -> String {
        format!("{}\n\n{}", self.prompt, text)
    }
}

#[cfg(feature = "http")]
pub use http::ChatSummarizer;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::{Summarizer, SummarizerConfig};
    use crate::error::{Error, Result};

    #[derive(Debug, Serialize)]
    pub(super) struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub(super) struct ChatMessage {
        pub role: String,
        pub content: String,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ChatResponse {
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Choice {
        pub message: ChatMessage,
    }

    /// Summarizer backed by an OpenAI-compatible chat-completions API.
    pub struct ChatSummarizer {
        config: SummarizerConfig,
        api_key: String,
        client: reqwest::blocking::Client,
    }

    impl ChatSummarizer {
        /// Build a client; fails when no API key is configured.
        pub fn new(config: SummarizerConfig) -> Result<Self> {
            let api_key = config.require_api_key()?.to_string();
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

            Ok(Self {
                config,
                api_key,
                client,
            })
        }

        pub fn config(&self) -> &SummarizerConfig {
            &self.config
        }

        pub(super) fn request<'a>(&'a self, text: &str) -> ChatRequest<'a> {
            ChatRequest {
                model: &self.config.model,
                messages: vec![ChatMessage {
                    role: "user".to_string(),
                    content: self.config.user_message(text),
                }],
            }
        }
    }

    impl Summarizer for ChatSummarizer {
        fn summarize(&self, text: &str) -> Result<String> {
            log::debug!(
                "Requesting summary from {} ({})",
                self.config.endpoint,
                self.config.model
            );

            let response = self
                .client
                .post(&self.config.endpoint)
                .bearer_auth(&self.api_key)
                .json(&self.request(text))
                .send()
                .map_err(|e| Error::Summarize(format!("request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(Error::Summarize(format!(
                    "API returned {}: {}",
                    status,
                    body.trim()
                )));
            }

            let body: ChatResponse = response
                .json()
                .map_err(|e| Error::Summarize(format!("failed to parse response: {}", e)))?;

            body.choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or_else(|| Error::Summarize("response contained no summary".to_string()))
        }
    }
}
