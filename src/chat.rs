//! AI chat collaborator
//!
//! Two ways to reach a model:
//! - a chat endpoint speaking `{messages, model}` in and `{reply}` (or one of
//!   a few looser shapes) out, set with `INVESTED_CHAT_URL`
//! - the Gemini REST API directly, using the first API key found in the
//!   environment
//!
//! Failures come back as [`InvestedError`] values; [`friendly_message`]
//! turns them into text that can be shown in place of a reply.

use crate::error::{InvestedError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Checked in order; the first one set wins
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY"];

const DEFAULT_PROMPT: &str = "Hello!";
const NO_RESPONSE: &str = "No response";
const TIMEOUT_MESSAGE: &str = "The request timed out. Try again.";
const CONNECTION_HINT: &str =
    "I'm having trouble connecting right now. If you're using Gemini, make sure GEMINI_API_KEY is set and try again.";
const MISSING_HANDLER_HINT: &str = "The chat endpoint does not accept POST requests. Check INVESTED_CHAT_URL.";
const SERVER_ERROR_HINT: &str = "Server error. If you're using Gemini, confirm GEMINI_API_KEY is set on the server.";
const MODEL_HINT: &str =
    "Pick a REST model like gemini-2.5-flash or gemini-2.5-pro (not a Live or native-audio variant).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages, model: None }
    }

    /// Text sent upstream: the last message, or a greeting when there is none
    pub fn prompt(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_PROMPT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub ok: bool,
    pub model_default: String,
    pub has_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Chat endpoint; `None` talks to Gemini directly
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl ChatSettings {
    pub fn health(&self) -> HealthCheck {
        HealthCheck {
            ok: true,
            model_default: DEFAULT_MODEL.to_string(),
            has_key: self.api_key.is_some(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// First non-empty API key among [`API_KEY_VARS`]
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|key| !key.trim().is_empty())
}

/// Pull the reply text out of a loosely shaped response body
pub fn normalize_reply(body: &Value) -> Option<&str> {
    if let Some(s) = body.get("reply").and_then(Value::as_str) {
        return Some(s);
    }
    if let Some(s) = body.get("text").and_then(Value::as_str) {
        return Some(s);
    }
    if let Some(s) = body
        .get("output")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(Value::as_str)
    {
        return Some(s);
    }
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("answer").and_then(Value::as_str))
}

/// Error text carried in a response body, if any
fn body_error(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        Some(Value::Object(obj)) => {
            if let Some(s) = obj.get("message").and_then(Value::as_str) {
                return Some(s.to_string());
            }
        }
        _ => {}
    }
    body.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// User-facing text for a non-success HTTP status
pub fn status_message(status: u16, body: Option<&Value>) -> String {
    if let Some(message) = body.and_then(body_error) {
        return message;
    }
    match status {
        405 => MISSING_HANDLER_HINT.to_string(),
        500 => SERVER_ERROR_HINT.to_string(),
        _ => format!("Request failed (HTTP {status})."),
    }
}

/// Hint for upstream errors caused by picking a model that cannot serve REST calls
pub fn model_error_hint(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    if lower.contains("not found") || lower.contains("unsupported") {
        Some(MODEL_HINT)
    } else {
        None
    }
}

fn with_model_hint(message: String) -> String {
    match model_error_hint(&message) {
        Some(hint) => format!("{message} ({hint})"),
        None => message,
    }
}

/// Text to show in place of a reply when a request failed
pub fn friendly_message(err: &InvestedError) -> String {
    match err {
        InvestedError::ChatTimeout(_) => TIMEOUT_MESSAGE.to_string(),
        InvestedError::ChatStatus { message, .. } => message.clone(),
        InvestedError::MissingApiKey => err.to_string(),
        _ => CONNECTION_HINT.to_string(),
    }
}

/// Concatenated text parts of the first Gemini candidate
fn gemini_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub struct ChatClient {
    http: reqwest::Client,
    settings: ChatSettings,
}

impl ChatClient {
    pub fn new(settings: ChatSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| InvestedError::ChatTransport(e.to_string()))?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Send the conversation and return the model's reply
    pub async fn send(&self, request: &ChatRequest) -> Result<String> {
        match &self.settings.endpoint {
            Some(url) => self.send_to_endpoint(url, request).await,
            None => self.send_to_gemini(request).await,
        }
    }

    /// Like [`send`](Self::send), but failures become the reply text
    pub async fn reply(&self, request: &ChatRequest) -> String {
        match self.send(request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                friendly_message(&e)
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> InvestedError {
        if e.is_timeout() {
            InvestedError::ChatTimeout(self.settings.timeout_ms)
        } else {
            InvestedError::ChatTransport(e.to_string())
        }
    }

    async fn send_to_endpoint(&self, url: &str, request: &ChatRequest) -> Result<String> {
        debug!("POST {} ({} messages)", url, request.messages.len());
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        // Bodies that are not JSON are treated as empty
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            return Err(InvestedError::ChatStatus {
                status: status.as_u16(),
                message: status_message(status.as_u16(), body.as_ref()),
            });
        }

        Ok(body
            .as_ref()
            .and_then(normalize_reply)
            .unwrap_or(NO_RESPONSE)
            .to_string())
    }

    async fn send_to_gemini(&self, request: &ChatRequest) -> Result<String> {
        let api_key = self.settings.api_key.as_deref().ok_or(InvestedError::MissingApiKey)?;
        let model = request.model.as_deref().unwrap_or(&self.settings.model);
        let url = format!("{GEMINI_BASE_URL}/models/{model}:generateContent");
        debug!("POST {}", url);

        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt() }] }]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = status_message(status.as_u16(), body.as_ref());
            return Err(InvestedError::ChatStatus {
                status: status.as_u16(),
                message: with_model_hint(message),
            });
        }

        Ok(body
            .as_ref()
            .and_then(gemini_text)
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
