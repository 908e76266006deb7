//! Chat completion abstraction used by the enrichment handler.
//!
//! The handler only needs "send these messages, give me the reply text". Keeping that
//! behind [`CompletionClient`] lets tests and demo mode swap the upstream API out.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to completion API failed: {0}")]
    RequestFailed(String),

    #[error("completion API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("completion API returned no choices: {0}")]
    EmptyChoices(String),

    #[error("could not read completion API response: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn user_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the text content of the first completion choice.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;

    fn name(&self) -> &str;
}

/// Offline stand-in used when no API key is configured.
#[derive(Debug, Default)]
pub struct DemoClient;

#[async_trait]
impl CompletionClient for DemoClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        info!("Using demo mode - generating canned enrichment");
        let user = request.user_text();
        let field = |label: &str| {
            user.lines()
                .find_map(|l| l.strip_prefix(label))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let title = field("Product:");
        let description = field("Description:");
        let company = field("Company:");

        let enhanced = if company.is_empty() {
            format!("{title}: {description}. Designed with care and built to last.")
        } else {
            format!("{title} by {company}: {description}. Designed with care and built to last.")
        };
        Ok(json!({
            "enhanced_description": enhanced,
            "category": demo_category(&format!("{title} {description}")),
        })
        .to_string())
    }

    fn name(&self) -> &str {
        "demo"
    }
}

fn demo_category(text: &str) -> &'static str {
    let text = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    if has(&["speaker", "headphone", "earbud", "audio", "sound"]) { "Audio Electronics" }
    else if has(&["phone", "laptop", "tablet", "camera", "charger"]) { "Electronics" }
    else if has(&["shirt", "shoe", "jacket", "dress", "apparel"]) { "Apparel" }
    else if has(&["lamp", "chair", "table", "sofa", "kitchen"]) { "Home & Living" }
    else { "General" }
}
