use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

mod retry;

use retry::{RATE_LIMIT_BASE_DELAY, RATE_LIMIT_MAX_RETRIES, is_retryable, retry_after,
    wait_with_backoff};

#[derive(Debug, Clone, Serialize)]
pub struct ProviderUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderResponse {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<ProviderUsage>,
}

#[derive(Debug, Clone, Copy)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

pub type ProviderFuture = Pin<Box<dyn Future<Output = Result<ProviderResponse>> + Send>>;

/// Chat backend seam. Handlers build a conversation with the consuming
/// builder methods and await `complete`; tests swap in a canned impl.
pub trait Provider: Clone + Send + Sync {
    fn append_system_input(self, input: String) -> Self;
    fn append_user_input(self, input: String) -> Self;
    fn complete(self) -> ProviderFuture;
}

/// Client for the local Ollama chat endpoint.
#[derive(Debug, Clone)]
pub struct Ollama {
    base_url: String,
    model: String,
    temperature: f32,
    messages: Vec<Message>,
}

impl Ollama {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 0.4,
            messages: Vec::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Provider for Ollama {
    fn append_system_input(mut self, input: String) -> Self {
        self.messages.push(Message {
            role: MessageRole::System,
            content: input,
        });
        self
    }

    fn append_user_input(mut self, input: String) -> Self {
        self.messages.push(Message {
            role: MessageRole::User,
            content: input,
        });
        self
    }

    fn complete(self) -> ProviderFuture {
        Box::pin(async move { call_chat(self).await })
    }
}

async fn call_chat(provider: Ollama) -> Result<ProviderResponse> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/chat", provider.base_url);

    let messages = provider
        .messages
        .iter()
        .map(|message| json!({"role": message.role.as_str(), "content": message.content}))
        .collect::<Vec<_>>();
    let body = json!({
        "model": provider.model,
        "messages": messages,
        "stream": false,
        "options": {"temperature": provider.temperature}
    });

    let mut attempt = 0usize;
    let mut delay = RATE_LIMIT_BASE_DELAY;
    loop {
        attempt += 1;
        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| {
                format!(
                    "failed to reach Ollama at {} (is it running?)",
                    provider.base_url
                )
            })?;

        let status = response.status();
        let retry_after = retry_after(response.headers());
        let text = response.text().await.unwrap_or_default();
        if status.is_success() {
            return extract_chat_response(&text, &provider.model);
        }
        if is_retryable(status, &text) && attempt < RATE_LIMIT_MAX_RETRIES {
            delay = wait_with_backoff(&provider.model, attempt, delay, retry_after).await;
            continue;
        }
        return Err(anyhow!(
            "Ollama API error ({}): {}",
            status,
            extract_ollama_error(&text).unwrap_or(text)
        ));
    }
}

fn extract_chat_response(text: &str, fallback_model: &str) -> Result<ProviderResponse> {
    let payload: OllamaChatResponse =
        serde_json::from_str(text).with_context(|| "failed to parse Ollama response JSON")?;
    let content = payload
        .message
        .ok_or_else(|| anyhow!("no message returned from Ollama"))?
        .content;
    let model = payload
        .model
        .filter(|value| !value.trim().is_empty())
        .or_else(|| Some(fallback_model.to_string()));
    let usage = match (payload.prompt_eval_count, payload.eval_count) {
        (None, None) => None,
        (prompt, completion) => Some(ProviderUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt
                .zip(completion)
                .map(|(prompt, completion)| prompt + completion),
        }),
    };
    Ok(ProviderResponse {
        text: content.trim().to_string(),
        model,
        usage,
    })
}

fn extract_ollama_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.filter(|message| !message.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: Option<String>,
    message: Option<OllamaChatMessage>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_chat_text_and_usage() {
        let payload = r#"{
            "model": "qwen2:1.5b",
            "message": {"role": "assistant", "content": "  Kathmandu.  "},
            "done": true,
            "prompt_eval_count": 42,
            "eval_count": 7
        }"#;
        let response = extract_chat_response(payload, "fallback").unwrap();
        assert_eq!(response.text, "Kathmandu.");
        assert_eq!(response.model.as_deref(), Some("qwen2:1.5b"));
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, Some(42));
        assert_eq!(usage.completion_tokens, Some(7));
        assert_eq!(usage.total_tokens, Some(49));
    }

    #[test]
    fn falls_back_to_requested_model() {
        let payload = r#"{"model": "", "message": {"role": "assistant", "content": "hi"}}"#;
        let response = extract_chat_response(payload, "gemma:2b").unwrap();
        assert_eq!(response.model.as_deref(), Some("gemma:2b"));
        assert!(response.usage.is_none());
    }

    #[test]
    fn missing_message_is_an_error() {
        let payload = r#"{"model": "gemma:2b", "done": true}"#;
        let err = extract_chat_response(payload, "gemma:2b").unwrap_err();
        assert!(err.to_string().contains("no message"));
    }

    #[test]
    fn extracts_error_body() {
        assert_eq!(
            extract_ollama_error(r#"{"error": "model 'x' not found"}"#).as_deref(),
            Some("model 'x' not found")
        );
        assert!(extract_ollama_error("not json").is_none());
        assert!(extract_ollama_error(r#"{"error": "  "}"#).is_none());
    }

    #[test]
    fn builder_accumulates_messages() {
        let provider = Ollama::new("http://localhost:11434/", "gemma:2b")
            .with_temperature(0.2)
            .append_system_input("be brief".to_string())
            .append_user_input("hello".to_string());
        assert_eq!(provider.base_url, "http://localhost:11434");
        assert_eq!(provider.messages.len(), 2);
        assert!(matches!(provider.messages[0].role, MessageRole::System));
        assert!(matches!(provider.messages[1].role, MessageRole::User));
    }
}
