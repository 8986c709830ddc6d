//! LLM summarization.
//!
//! The summarizer is an async seam: [`Reader`](crate::Reader) only depends on
//! the [`Summarizer`] trait, and [`LlmSummarizer`] is the production
//! implementation backed by the Gemini or OpenAI REST APIs. Credentials are
//! always passed in through [`SummaryConfig`]; nothing here reads the
//! environment.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 60;
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Errors from a single summarization attempt
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("missing API key for provider: {provider}")]
    MissingApiKey { provider: Provider },

    #[error("summary request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("summary request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("summary request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    #[error("no summary generated")]
    EmptyResponse,

    #[error("{0}")]
    Unavailable(String),
}

/// Produces a plain text summary of an article.
pub trait Summarizer {
    fn summarize(&self, article: &str, source_url: &str) -> impl Future<Output = Result<String, SummarizeError>> + Send;
}

/// Supported LLM backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Provider::Gemini => GEMINI_BASE_URL,
            Provider::OpenAi => OPENAI_BASE_URL,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Summarizer settings, the `[summary]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub provider: Provider,
    /// Model identifier; the provider default when unset
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Override of the API origin, used for proxies and tests
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { provider: Provider::default(), model: None, api_key: None, base_url: None, timeout: DEFAULT_SUMMARY_TIMEOUT_SECS }
    }
}

impl SummaryConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or_else(|| self.provider.default_base_url()).trim_end_matches('/')
    }
}

/// Build the summarization prompt for an article
pub fn build_prompt(article: &str, source_url: &str) -> String {
    format!(
        "Please provide a concise summary of the following article from {}.\n\
         Focus on the main points and key takeaways. Format the summary in a clear, readable manner.\n\n\
         Article content:\n{}",
        source_url, article
    )
}

/// Summarizer backed by a hosted LLM
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    client: Client,
    config: SummaryConfig,
}

impl LlmSummarizer {
    /// A missing API key is reported by [`Summarizer::summarize`], not here.
    pub fn new(config: SummaryConfig) -> Result<Self, SummarizeError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout)).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, SummarizeError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SummarizeError::MissingApiKey { provider: self.config.provider })
    }

    async fn post(&self, request: reqwest::RequestBuilder, body: &Value) -> Result<Value, SummarizeError> {
        let response = request.json(body).send().await.map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status { status: status.as_u16(), body: error_detail(&body) });
        }

        response.json::<Value>().await.map_err(|e| self.request_error(e))
    }

    fn request_error(&self, error: reqwest::Error) -> SummarizeError {
        if error.is_timeout() {
            SummarizeError::Timeout { timeout: self.config.timeout }
        } else {
            SummarizeError::Request(error)
        }
    }

    async fn gemini(&self, prompt: String) -> Result<String, SummarizeError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.config.base_url(), self.config.model());
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self.post(self.client.post(url).header("x-goog-api-key", self.api_key()?), &body).await?;
        Ok(gemini_text(&response))
    }

    async fn openai(&self, prompt: String) -> Result<String, SummarizeError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let body = json!({
            "model": self.config.model(),
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self.post(self.client.post(url).bearer_auth(self.api_key()?), &body).await?;
        Ok(openai_text(&response))
    }
}

impl Summarizer for LlmSummarizer {
    async fn summarize(&self, article: &str, source_url: &str) -> Result<String, SummarizeError> {
        let prompt = build_prompt(article, source_url);

        let text = match self.config.provider {
            Provider::Gemini => self.gemini(prompt).await?,
            Provider::OpenAi => self.openai(prompt).await?,
        };

        if text.trim().is_empty() { Err(SummarizeError::EmptyResponse) } else { Ok(text) }
    }
}

/// One-line excerpt of an error body, preferring the API's `error.message`
fn error_detail(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string));
    let text = message.unwrap_or_else(|| body.to_string());
    let line = text.lines().map(str::trim).find(|line| !line.is_empty()).unwrap_or_default();

    if line.chars().count() > MAX_ERROR_DETAIL_CHARS {
        let mut excerpt: String = line.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
        excerpt.push('…');
        excerpt
    } else {
        line.to_string()
    }
}

/// Concatenate every text part of the first candidate
fn gemini_text(response: &Value) -> String {
    response["candidates"][0]["content"]["parts"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|part| part["text"].as_str())
        .collect()
}

fn openai_text(response: &Value) -> String {
    response["choices"][0]["message"]["content"].as_str().unwrap_or_default().to_string()
}

/// Summarizer returning a fixed result, for tests and offline use
#[derive(Debug, Clone)]
pub struct StaticSummarizer {
    result: Result<String, String>,
}

impl StaticSummarizer {
    pub fn success(summary: impl Into<String>) -> Self {
        Self { result: Ok(summary.into()) }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self { result: Err(reason.into()) }
    }
}

impl Summarizer for StaticSummarizer {
    async fn summarize(&self, _article: &str, _source_url: &str) -> Result<String, SummarizeError> {
        match &self.result {
            Ok(summary) => Ok(summary.clone()),
            Err(reason) => Err(SummarizeError::Unavailable(reason.clone())),
        }
    }
}
