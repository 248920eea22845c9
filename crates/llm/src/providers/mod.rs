pub mod claude;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use poltertext_core::config::{LlmConfig, OllamaConfig};

use crate::provider::{LlmError, LlmProvider, Message, Role};

/// Generation calls for long chunks can take a while; keep the ceiling generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// OpenAI/Ollama-style `[{role, content}]` message list.
pub(crate) fn chat_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": m.content,
            })
        })
        .collect()
}

/// Pass successful responses through; turn anything else into `ApiError`
/// carrying the response body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::ApiError {
        status: status.as_u16(),
        body,
    })
}

/// The reply text at JSON `pointer`, e.g. `/choices/0/message/content`.
pub(crate) fn reply_text(response: &serde_json::Value, pointer: &str) -> Result<String, LlmError> {
    response
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| LlmError::ParseError(format!("missing {pointer}")))
}

/// Create the appropriate LLM provider based on config.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        "anthropic" | "claude" => {
            let api_key = llm_config
                .anthropic_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".into()))?;
            Ok(Box::new(claude::ClaudeProvider::new(
                api_key.clone(),
                llm_config.anthropic_model.clone(),
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o".into(),
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_model: "claude".into(),
        }
    }

    fn ollama_config() -> OllamaConfig {
        OllamaConfig {
            url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
            embedding_model: "nomic-embed-text".into(),
        }
    }

    #[test]
    fn openai_without_key_is_not_configured() {
        let err = create_provider(&llm_config("openai"), &ollama_config()).err().unwrap();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn ollama_needs_no_key() {
        let provider = create_provider(&llm_config("ollama"), &ollama_config()).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_provider(&llm_config("gemini"), &ollama_config()).err().unwrap();
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn reply_text_follows_pointer() {
        let resp = serde_json::json!({ "choices": [{ "message": { "content": "hey" } }] });
        assert_eq!(reply_text(&resp, "/choices/0/message/content").unwrap(), "hey");
        assert!(matches!(
            reply_text(&resp, "/content/0/text"),
            Err(LlmError::ParseError(_))
        ));
    }

    #[test]
    fn chat_messages_use_lowercase_roles() {
        let msgs = chat_messages(&[Message::system("s"), Message::user("u")]);
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[1]["content"], "u");
    }
}
