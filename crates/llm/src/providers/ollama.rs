use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{chat_messages, ensure_success, http_client, reply_text};
use crate::provider::{LlmError, LlmProvider, Message};

/// Local models through Ollama's `/api/chat`.
pub struct OllamaProvider {
    client: reqwest::Client,
    endpoint: String,
    default_model: String,
}

impl OllamaProvider {
    pub fn new(url: String, default_model: String) -> Self {
        Self {
            client: http_client(),
            endpoint: format!("{}/api/chat", url.trim_end_matches('/')),
            default_model,
        }
    }

    fn request_body(
        &self,
        messages: &[Message],
        model: Option<&str>,
        temperature: f32,
        max_tokens: u32,
    ) -> Value {
        // Ollama calls the output cap `num_predict` and wants it under `options`.
        json!({
            "model": model.unwrap_or(&self.default_model),
            "messages": chat_messages(messages),
            "stream": false,
            "options": { "temperature": temperature, "num_predict": max_tokens },
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
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
            "ollama completion"
        );

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let reply: Value = ensure_success(response).await?.json().await?;
        reply_text(&reply, "/message/content")
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
