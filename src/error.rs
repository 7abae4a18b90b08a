//! エラー定義
//!
//! 1ファイルの処理で起こり得る失敗はすべて [`ProcessError`] にまとまり、
//! バッチ処理側でファイル単位に記録される。

use std::path::PathBuf;
use thiserror::Error;

/// PDFを開けない・解析できない
#[derive(Debug, Error)]
#[error("PDFの読み込みに失敗: {path:?}: {message}")]
pub struct DocumentReadError {
    pub path: PathBuf,
    pub message: String,
}

/// LLMプロバイダーのエラー
#[derive(Debug, Error)]
pub enum ProviderError {
    /// プロバイダーのクライアントがこのビルドに含まれていない
    #[error("{provider} クライアントが利用できません (feature `{feature}` を有効にしてビルドしてください)")]
    Unavailable {
        provider: &'static str,
        feature: &'static str,
    },

    /// 認証・通信・レスポンス形式のエラー
    #[error("{provider} API 呼び出しに失敗: {message}")]
    Call {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub(crate) fn call(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Call {
            provider,
            message: message.into(),
        }
    }
}

/// メタデータ抽出のエラー（プロバイダーの失敗のみ）
#[derive(Debug, Error)]
#[error("メタデータ抽出に失敗: {source}")]
pub struct ExtractionError {
    #[from]
    pub source: ProviderError,
}

impl ExtractionError {
    /// プロバイダーが未導入による失敗か
    pub fn is_unavailable(&self) -> bool {
        matches!(self.source, ProviderError::Unavailable { .. })
    }
}

/// リネームのエラー
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("リネーム先が既に存在します: {path:?}")]
    TargetExists { path: PathBuf },

    #[error("リネームに失敗: {from:?} -> {to:?}: {source}")]
    Filesystem {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 1ファイル分の処理エラー
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Document(#[from] DocumentReadError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Rename(#[from] RenameError),
}

impl ProcessError {
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(self, Self::Extraction(e) if e.is_unavailable())
    }
}

/// フォルダの走査エラー（バッチ開始前にのみ発生）
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("フォルダの読み込みに失敗: {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Setup(#[from] ProviderError),
}
