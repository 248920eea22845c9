use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{ensure_success, http_client, reply_text};
use crate::provider::{LlmError, LlmProvider, Message, Role};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API.
pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            model,
        }
    }
}

/// Split out the system prompt; the Messages API takes it as a top-level field.
fn split_system(messages: &[Message]) -> (Option<String>, Vec<serde_json::Value>) {
    let system = messages
        .iter()
        .find(|m| matches!(m.role, Role::System))
        .map(|m| m.content.clone());

    let rest = messages
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => return None,
            };
            Some(json!({ "role": role, "content": m.content }))
        })
        .collect();

    (system, rest)
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        model: Option<&str>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let model = model.unwrap_or(&self.model);
        let (system, turns) = split_system(&messages);

        let mut body = json!({
            "model": model,
            "messages": turns,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }

        debug!(%model, max_tokens, "anthropic completion");

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let reply: serde_json::Value = ensure_success(response).await?.json().await?;
        reply_text(&reply, "/content/0/text")
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_moves_to_top_level() {
        let (system, rest) = split_system(&[Message::system("be human"), Message::user("hi")]);
        assert_eq!(system.as_deref(), Some("be human"));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0]["role"], "user");
    }
}
