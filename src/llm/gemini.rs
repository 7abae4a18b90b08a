//! Google Gemini generateContent クライアント

use super::http::{base_url_from_env, build_client, read_json, send_error};
use super::CompletionProvider;
use crate::error::ProviderError;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini APIクライアント
///
/// 思考（thinking）予算を 0 にして、最速の非推論モードで応答させる。
pub struct GeminiProvider {
    base_url: String,
    http_client: Client,
}

impl GeminiProvider {
    /// 新しいクライアントを作成（`GEMINI_BASE_URL` で接続先を変更可能）
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(base_url_from_env("GEMINI_BASE_URL", DEFAULT_BASE_URL))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: base_url.into(),
            http_client: build_client(PROVIDER)?,
        })
    }

    /// `{base}/models/{model}:generateContent`
    ///
    /// モデル名は1つのパスセグメントとしてエスケープする（`/` `?` `#` を含んでも経路が変わらない）。
    fn endpoint(&self, model_id: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::call(PROVIDER, format!("不正なエンドポイント: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::call(PROVIDER, "不正なエンドポイント"))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{model_id}:generateContent"));
        Ok(url)
    }
}

impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn complete(
        &self,
        prompt: &str,
        credential: &str,
        model_id: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateRequest::new(prompt);
        let url = self.endpoint(model_id)?;
        tracing::debug!(model = model_id, %url, "Gemini にリクエスト送信");

        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", credential)
            .json(&request)
            .send()
            .map_err(|e| send_error(PROVIDER, e))?;

        let generated: GenerateResponse = read_json(PROVIDER, response)?;
        generated.into_text()
    }
}

// generateContent リクエスト/レスポンス構造体

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "thinkingConfig")]
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// 最初の候補のテキストパートを連結
    fn into_text(self) -> Result<String, ProviderError> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            return Err(ProviderError::call(PROVIDER, "レスポンスにテキストがありません"));
        }

        Ok(texts.concat().trim().to_string())
    }
}
