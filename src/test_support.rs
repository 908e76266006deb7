use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    completion::{ChatRequest, CompletionClient, LlmError},
    models::{Currency, ProductInput, RawPrice},
};

/// Replies with a fixed outcome and records every request it sees.
pub struct ScriptedClient {
    reply: Result<String, fn() -> LlmError>,
    pub seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Self {
        Self { reply: Ok(text.to_string()), seen: Mutex::new(Vec::new()) }
    }

    pub fn failing(make: fn() -> LlmError) -> Self {
        Self { reply: Err(make), seen: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.seen.lock().push(request);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn speaker() -> ProductInput {
    ProductInput {
        title: "SmartSpeaker 5".into(),
        description: "Portable Bluetooth speaker".into(),
        price: RawPrice::Text("99.99".into()),
        currency: Currency::Usd,
        company_name: "SoundWave Inc.".into(),
        manufacturing_country: "India".into(),
        keywords: Some(vec!["bluetooth".into(), "speaker".into()]),
    }
}
