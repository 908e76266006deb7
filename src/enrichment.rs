//! Turns a [`ProductInput`] into a [`ProductResult`] with one completion call.
//!
//! Only the shape of a successful model reply is allowed to degrade: if the reply
//! text is not the JSON object we asked for, the caller's own description and the
//! `"General"` category are used instead. Anything that stops us from getting a reply
//! at all fails the request.

use std::sync::Arc;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    completion::{ChatMessage, ChatRequest, CompletionClient},
    error::AppError,
    models::{Pricing, ProductInfo, ProductInput, ProductResult},
};

pub const DEFAULT_CATEGORY: &str = "General";

pub const SYSTEM_PROMPT: &str = r#"You are a product categorization and description enhancement AI. Given product information, you should:
1. Enhance the description to be more compelling and detailed
2. Suggest an appropriate product category
3. Return the response in this exact JSON format:
{
  "enhanced_description": "enhanced description text",
  "category": "suggested category"
}"#;

/// Outcome of reading the model's reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    /// The reply was a JSON object. Either field may still be missing or blank.
    Suggested {
        enhanced_description: Option<String>,
        category: Option<String>,
    },
    Unavailable { reason: String },
}

impl Enrichment {
    pub fn parse(reply: &str) -> Self {
        let body = strip_code_fence(reply);
        let value: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => return Enrichment::Unavailable { reason: format!("reply is not JSON: {e}") },
        };
        let Value::Object(map) = value else {
            return Enrichment::Unavailable { reason: "reply is not a JSON object".into() };
        };
        let text_field = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Enrichment::Suggested {
            enhanced_description: text_field("enhanced_description"),
            category: text_field("category"),
        }
    }

    pub fn description_or(&self, original: &str) -> String {
        match self {
            Enrichment::Suggested { enhanced_description: Some(d), .. } => d.clone(),
            _ => original.to_string(),
        }
    }

    pub fn category(&self) -> String {
        match self {
            Enrichment::Suggested { category: Some(c), .. } => c.clone(),
            _ => DEFAULT_CATEGORY.to_string(),
        }
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else { return trimmed };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Checks required fields and returns the parsed price.
pub fn validate(input: &ProductInput) -> Result<f64, AppError> {
    let required = [
        ("title", &input.title),
        ("description", &input.description),
        ("company_name", &input.company_name),
        ("manufacturing_country", &input.manufacturing_country),
    ];
    if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(AppError::InvalidInput(format!("{name} must not be empty")));
    }

    let price = input.price.as_text();
    let amount: f64 = price
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("price {price:?} is not a number")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::InvalidInput(format!("price {price:?} must be a non-negative number")));
    }
    // "-0" parses to negative zero
    Ok(if amount == 0.0 { 0.0 } else { amount })
}

pub fn build_user_prompt(input: &ProductInput) -> String {
    format!(
        "Product: {}\nDescription: {}\nPrice: {} {}\nCompany: {}\nManufacturing Country: {}",
        input.title,
        input.description,
        input.price.as_text(),
        input.currency,
        input.company_name,
        input.manufacturing_country,
    )
}

pub struct Enricher {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
    max_tokens: u32,
}

impl Enricher {
    pub fn new(client: Arc<dyn CompletionClient>, temperature: f32, max_tokens: u32) -> Self {
        Self { client, temperature, max_tokens }
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub async fn enrich(&self, input: ProductInput) -> Result<ProductResult, AppError> {
        let amount = validate(&input)?;

        info!("🚀 Enriching product: {}", input.title);

        let request = ChatRequest {
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(build_user_prompt(&input))],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };
        let reply = self.client.complete(request).await?;

        let enrichment = Enrichment::parse(&reply);
        match &enrichment {
            Enrichment::Suggested { .. } => info!("✅ Model suggested category '{}'", enrichment.category()),
            Enrichment::Unavailable { reason } => {
                warn!("⚠️ Enrichment unavailable, keeping original description: {}", reason)
            }
        }

        Ok(ProductResult {
            product_info: ProductInfo {
                description: enrichment.description_or(&input.description),
                category: enrichment.category(),
                title: input.title,
                pricing: Pricing { amount, currency: input.currency },
                company_name: input.company_name,
                manufacturing_country: input.manufacturing_country,
            },
            keyword_timestamps: Vec::new(),
            keywords: input.keywords.unwrap_or_default(),
        })
    }
}
