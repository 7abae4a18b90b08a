//! OpenAI Chat Completions クライアント

use super::http::{base_url_from_env, build_client, read_json, send_error};
use super::CompletionProvider;
use crate::error::ProviderError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// OpenAI APIクライアント
pub struct OpenAiProvider {
    base_url: String,
    http_client: Client,
}

impl OpenAiProvider {
    /// 新しいクライアントを作成（`OPENAI_BASE_URL` で接続先を変更可能）
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(base_url_from_env("OPENAI_BASE_URL", DEFAULT_BASE_URL))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: base_url.into(),
            http_client: build_client(PROVIDER)?,
        })
    }
}

impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn complete(
        &self,
        prompt: &str,
        credential: &str,
        model_id: &str,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest::new(model_id, prompt);
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = model_id, %url, "OpenAI にリクエスト送信");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(credential)
            .json(&request)
            .send()
            .map_err(|e| send_error(PROVIDER, e))?;

        let chat: ChatResponse = read_json(PROVIDER, response)?;
        chat.into_text()
    }
}

// Chat Completions リクエスト/レスポンス構造体

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ProviderError::call(PROVIDER, "レスポンスに content がありません"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::http::testing::respond_once;
    use serde_json::json;

    #[test]
    fn request_carries_model_and_both_messages() {
        let request = ChatRequest::new("gpt-4o", "Extract...");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "Extract..."}
                ]
            })
        );
    }

    #[test]
    fn reads_first_choice_trimmed() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  Deep Learning; LeCun \n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Deep Learning; LeCun");
    }

    #[test]
    fn missing_content_is_call_error() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert!(matches!(
            response.into_text(),
            Err(ProviderError::Call { provider: "OpenAI", .. })
        ));

        let response: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.into_text().is_err());
    }

    #[test]
    fn unreachable_endpoint_is_call_error() {
        let provider = OpenAiProvider::with_base_url("http://127.0.0.1:1/v1").unwrap();
        let result = provider.complete("prompt", "sk-test", "gpt-4o");
        assert!(matches!(result, Err(ProviderError::Call { .. })));
    }

    #[test]
    fn rejected_key_surfaces_status_as_call_error() {
        let (addr, server) = respond_once(
            "401 Unauthorized",
            r#"{"error": {"message": "Incorrect API key provided"}}"#,
        );
        let provider = OpenAiProvider::with_base_url(format!("http://{addr}/v1")).unwrap();

        let err = provider.complete("prompt", "sk-bad", "gpt-4o").unwrap_err();
        match &err {
            ProviderError::Call { provider, message } => {
                assert_eq!(*provider, "OpenAI");
                assert!(message.contains("401"), "{message}");
                assert!(message.contains("Incorrect API key"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let head = server.join().unwrap().to_ascii_lowercase();
        assert!(head.starts_with("post /v1/chat/completions "), "{head}");
        assert!(head.contains("authorization: bearer sk-bad"), "{head}");
    }
}
