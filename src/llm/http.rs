//! プロバイダー共通の HTTP 処理

use crate::error::ProviderError;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// 1リクエストのタイムアウト
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// エラー本文をメッセージに含める最大文字数
const MAX_ERROR_BODY_CHARS: usize = 500;

pub(crate) fn build_client(provider: &'static str) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::call(provider, format!("HTTPクライアントの作成に失敗: {e}")))
}

/// 環境変数があればエンドポイントを上書き
pub(crate) fn base_url_from_env(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// ステータスを確認してJSONレスポンスをパース
pub(crate) fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        return Err(ProviderError::call(provider, format!("HTTP {status}: {body}")));
    }

    response
        .json()
        .map_err(|e| ProviderError::call(provider, format!("レスポンスのパースに失敗: {e}")))
}

pub(crate) fn send_error(provider: &'static str, err: reqwest::Error) -> ProviderError {
    ProviderError::call(provider, format!("リクエストに失敗: {err}"))
}
