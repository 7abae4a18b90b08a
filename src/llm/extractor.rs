//! 論文タイトル・筆頭著者の抽出

use super::ProviderRegistry;
use crate::error::{ExtractionError, ProviderError};
use crate::parser::ExtractionResult;

const PROMPT_INSTRUCTION: &str = "Extract the title and the first author's lastname \
from the following text. Respond with only the title, followed by the first author's \
lastname, separated by a semicolon, in the format: [Title of the Paper]; \
[First Author's Last Name].";

/// 抽出用プロンプトを組み立てる
pub fn build_prompt(raw_text: &str) -> String {
    format!("{PROMPT_INSTRUCTION}\n\n{raw_text}")
}

/// LLMで書誌情報を抽出する
pub struct MetadataExtractor {
    registry: ProviderRegistry,
}

impl MetadataExtractor {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// 標準のプロバイダー構成で作成
    pub fn with_default_providers() -> Result<Self, ProviderError> {
        Ok(Self::new(ProviderRegistry::with_defaults()?))
    }

    /// 本文テキストから (タイトル, 著者の姓) を抽出
    ///
    /// 応答にセミコロンが無い場合は既定値を返す（エラーにはしない）。
    pub fn extract(
        &self,
        raw_text: &str,
        credential: &str,
        model_id: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let provider = self.registry.select(model_id);
        tracing::debug!(provider = provider.name(), model = model_id, "プロバイダーを選択");

        let reply = provider.complete(&build_prompt(raw_text), credential, model_id)?;
        let result = ExtractionResult::parse_reply(&reply);

        if !reply.contains(';') {
            tracing::warn!(
                provider = provider.name(),
                reply = %reply,
                "応答にセミコロンがないため既定値を使用"
            );
        }

        Ok(result)
    }
}
