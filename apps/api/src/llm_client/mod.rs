//! Anthropic Messages API access for Folio.
//!
//! The remote section extractor and snippet suggestions both go through
//! [`LlmClient`]; nothing else in the service opens a connection to the API.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 1000;
const TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Turn<'a>; 1],
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ReplyBlock>,
    pub usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
pub struct ReplyBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Text of the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .find_map(|block| block.text.as_deref())
    }
}

/// Error payload shape for 4xx replies.
#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Outcome of one HTTP round trip.
enum Attempt {
    Done(LlmResponse),
    Transient(LlmError),
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1))
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Messages API client with retry and JSON helpers. Cheap to clone.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        let http = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single-turn call. 429 and 5xx replies and transport failures are retried
    /// with a doubling delay; other error statuses fail immediately.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Turn {
                role: "user",
                content: prompt,
            }],
        };

        let mut last = None;
        for attempt in 0..ATTEMPTS {
            if attempt > 0 {
                let delay = backoff(attempt);
                warn!(
                    model = %self.model,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying LLM request"
                );
                tokio::time::sleep(delay).await;
            }

            match self.send_once(&request).await? {
                Attempt::Done(reply) => return Ok(reply),
                Attempt::Transient(err) => last = Some(err),
            }
        }

        Err(last.unwrap_or(LlmError::RateLimited { retries: ATTEMPTS }))
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> Result<Attempt, LlmError> {
        let sent = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(err) => return Ok(Attempt::Transient(LlmError::Http(err))),
        };

        let status = response.status();
        if status.is_success() {
            let reply: LlmResponse = response.json().await?;
            debug!(
                input_tokens = reply.usage.input_tokens,
                output_tokens = reply.usage.output_tokens,
                "LLM request completed"
            );
            return Ok(Attempt::Done(reply));
        }

        let body = body_text(response).await;
        if is_transient(status) {
            warn!(status = status.as_u16(), "LLM API transient failure: {}", body);
            return Ok(Attempt::Transient(LlmError::Api {
                status: status.as_u16(),
                message: body,
            }));
        }

        let message = serde_json::from_str::<ErrorReply>(&body)
            .map(|reply| reply.error.message)
            .unwrap_or(body);
        Err(LlmError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Calls the model and deserializes its text reply as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let reply = self.call(prompt, system).await?;
        let text = reply.text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(extract_json(text))?)
    }
}

async fn body_text(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

/// Narrows model output to its JSON payload: strips ```json fences and any prose
/// before the first `[`/`{` or after the matching last `]`/`}`.
fn extract_json(text: &str) -> &str {
    let text = text.trim();
    let unfenced = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .map(|inner| {
            let inner = inner.trim_start();
            inner.strip_suffix("```").unwrap_or(inner).trim()
        })
        .unwrap_or(text);

    let start = unfenced.find(['[', '{']);
    let end = unfenced.rfind([']', '}']);
    match (start, end) {
        (Some(s), Some(e)) if s < e => &unfenced[s..=e],
        _ => unfenced,
    }
}
