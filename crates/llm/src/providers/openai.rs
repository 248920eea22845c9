use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{chat_messages, ensure_success, http_client, reply_text};
use crate::provider::{LlmError, LlmProvider, Message};

/// Chat completions against OpenAI or any compatible endpoint.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    default_model: String,
    endpoint: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, default_model: String, base_url: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            default_model,
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    fn request_body(
        &self,
        messages: &[Message],
        model: Option<&str>,
        temperature: f32,
        max_tokens: u32,
    ) -> Value {
        json!({
            "model": model.unwrap_or(&self.default_model),
            "messages": chat_messages(messages),
            "temperature": temperature,
            "max_tokens": max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        model: Option<&str>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let body = self.request_body(&messages, model, temperature, max_tokens);
        debug!(
            endpoint = %self.endpoint,
            model = model.unwrap_or(&self.default_model),
            max_tokens,
            "openai completion"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let reply: Value = ensure_success(response).await?.json().await?;
        reply_text(&reply, "/choices/0/message/content")
    }

    fn name(&self) -> &str {
        "openai"
    }
}
