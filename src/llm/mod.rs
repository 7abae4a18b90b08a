//! LLM モジュール - 論文メタデータ抽出
//!
//! モデル名でプロバイダーを選択する:
//! - `gemini` で始まるモデル名（大文字小文字を区別しない）→ [`GeminiProvider`]
//! - それ以外 → [`OpenAiProvider`]
//!
//! 各プロバイダーは cargo feature (`openai` / `gemini`) で有効化される。
//! 無効なプロバイダーが選ばれた場合は [`ProviderError::Unavailable`] になる。
//!
//! [`ProviderError::Unavailable`]: crate::error::ProviderError::Unavailable

mod extractor;
#[cfg(feature = "gemini")]
mod gemini;
#[cfg(any(feature = "openai", feature = "gemini"))]
mod http;
#[cfg(feature = "openai")]
mod openai;
mod registry;

pub use extractor::{build_prompt, MetadataExtractor};
#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;
pub use registry::{is_gemini_model, ProviderRegistry, UnavailableProvider};

use crate::error::ProviderError;

/// LLMプロバイダー共通インターフェース
pub trait CompletionProvider: Send + Sync {
    /// ログ・エラー表示用の名前
    fn name(&self) -> &'static str;

    /// プロンプトを1回送信し、最初の応答テキスト（trim済み）を返す
    fn complete(&self, prompt: &str, credential: &str, model_id: &str)
        -> Result<String, ProviderError>;
}
