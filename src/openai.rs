use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{error, info};

use crate::completion::{ChatMessage, ChatRequest, CompletionClient, LlmError};
use crate::config::{mask_secret, Config};

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;
        info!("🔑 Completion API key {} at {}", mask_secret(&api_key), config.api_base);
        Ok(Self {
            client,
            api_key,
            base_url: config.api_base.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        info!("🔗 Making request to: {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&response_text)
                .map(|env| env.error.message)
                .unwrap_or(response_text);
            return Err(LlmError::ApiError { status: status.as_u16(), message });
        }

        let parsed: CompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| LlmError::ParseError(format!("{e}: {}", truncate(&response_text, 500))))?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(LlmError::EmptyChoices(truncate(&response_text, 500)));
        };
        choice
            .message
            .content
            .ok_or_else(|| LlmError::ParseError("first choice has no message content".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// --- Wire types ---

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_string() } else { format!("{}…", s.chars().take(max).collect::<String>()) }
}
