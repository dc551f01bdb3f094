//! LLM Client: the single point of entry for text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion endpoint directly.
//!
//! One attempt per call, no retries and no streaming. Callers that render text for a
//! person go through `generate_or_fallback`, which never fails.

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// The model used for all narrative generation.
pub const MODEL: &str = "openai/gpt-oss-20b:free";
const MAX_TOKENS: u32 = 700;
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const APP_REFERER: &str = "http://localhost:8501";
const APP_TITLE: &str = "Talent Match Intelligence";

pub const MISSING_KEY_MESSAGE: &str = "AI generator unavailable: missing API key.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Short cause suitable for showing to the user; the full error goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::Http(e) if e.is_timeout() => "the AI service timed out".to_string(),
            LlmError::Http(_) => "the AI service could not be reached".to_string(),
            LlmError::Api { status, .. } => format!("the AI service returned status {status}"),
            LlmError::EmptyContent => "the AI service returned no text".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the OpenRouter chat-completions API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .context("Failed to build HTTP client")?,
            api_key,
            endpoint: chat_endpoint(OPENROUTER_BASE_URL),
        })
    }

    /// Points the client at another OpenRouter-compatible server.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.endpoint = chat_endpoint(base_url);
        self
    }

    /// Sends one chat completion and returns the reply text verbatim.
    pub async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request_body = ChatRequest {
            model: MODEL,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text().map(str::to_string).ok_or(LlmError::EmptyContent)
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Text shown to the user in place of a narrative panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    /// False when `text` is a fallback message rather than model output.
    pub generated: bool,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Narrative {
    pub fn fallback(text: String) -> Self {
        Self {
            text,
            generated: false,
            model: None,
            created_at: Utc::now(),
        }
    }
}

/// Generates text, degrading to a readable message when the client is disabled or the
/// call fails.
pub async fn generate_or_fallback(
    llm: Option<&LlmClient>,
    prompt: &str,
    system: Option<&str>,
) -> Narrative {
    let Some(llm) = llm else {
        return Narrative::fallback(MISSING_KEY_MESSAGE.to_string());
    };

    match llm.complete(prompt, system).await {
        Ok(text) => Narrative {
            text,
            generated: true,
            model: Some(MODEL.to_string()),
            created_at: Utc::now(),
        },
        Err(e) => {
            warn!("AI request failed: {e}");
            Narrative::fallback(format!("AI request failed: {}", e.user_message()))
        }
    }
}
