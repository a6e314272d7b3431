use std::time::Instant;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// Request body for `POST /v1/chat/completions`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIResponseMessage>,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    error: Option<OpenAIErrorBody>,
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
}

impl OpenAIClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(&self, prompt: &str) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Serialized request body exactly as it goes on the wire.
    pub fn payload(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        serde_json::to_vec(&self.build_request(prompt))
            .map_err(|e| GenerationError::Parse(e.to_string()))
    }

    /// One POST, one attempt. Returns the first completion's text verbatim.
    pub async fn query(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = self.payload(prompt)?;
        let started = Instant::now();

        let response = self.client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = text.len(),
            "chat completion returned"
        );

        parse_response(status, &text)
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            warn!(error = %err, "chat completion transport failure");
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Turn a status and raw body into completion text or a typed failure.
pub fn parse_response(status: StatusCode, body: &str) -> Result<String, GenerationError> {
    if !status.is_success() {
        let message = serde_json::from_str::<OpenAIResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| body_excerpt(body));
        return Err(GenerationError::Status { status, message });
    }

    let response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(GenerationError::Api(
            error.message.unwrap_or_else(|| "Unknown API error".to_string()),
        ));
    }

    response.choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or(GenerationError::EmptyResponse)
}

fn body_excerpt(body: &str) -> String {
    const MAX_CHARS: usize = 200;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    if trimmed.chars().count() <= MAX_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
