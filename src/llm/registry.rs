//! モデル名 → プロバイダーの対応表

use super::CompletionProvider;
use crate::error::ProviderError;

type Selector = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Gemini 系モデル名かどうか（大文字小文字を区別しない前方一致）
pub fn is_gemini_model(model_id: &str) -> bool {
    model_id
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("gemini"))
}

struct Route {
    selector: Selector,
    provider: Box<dyn CompletionProvider>,
}

/// モデル名からプロバイダーを選ぶレジストリ
///
/// 登録順に条件を評価し、どれにも一致しなければフォールバックを使う。
pub struct ProviderRegistry {
    routes: Vec<Route>,
    fallback: Box<dyn CompletionProvider>,
}

impl ProviderRegistry {
    pub fn new(fallback: Box<dyn CompletionProvider>) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// 条件に一致するモデル名を `provider` に振り分ける
    pub fn route<F>(mut self, selector: F, provider: Box<dyn CompletionProvider>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            selector: Box::new(selector),
            provider,
        });
        self
    }

    /// 標準構成: `gemini*` → Gemini、それ以外 → OpenAI
    pub fn with_defaults() -> Result<Self, ProviderError> {
        Ok(Self::new(default_openai()?).route(is_gemini_model, default_gemini()?))
    }

    pub fn select(&self, model_id: &str) -> &dyn CompletionProvider {
        self.routes
            .iter()
            .find(|route| (route.selector)(model_id))
            .map(|route| route.provider.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

#[cfg(feature = "openai")]
fn default_openai() -> Result<Box<dyn CompletionProvider>, ProviderError> {
    Ok(Box::new(super::OpenAiProvider::new()?))
}

#[cfg(not(feature = "openai"))]
fn default_openai() -> Result<Box<dyn CompletionProvider>, ProviderError> {
    Ok(Box::new(UnavailableProvider::new("OpenAI", "openai")))
}

#[cfg(feature = "gemini")]
fn default_gemini() -> Result<Box<dyn CompletionProvider>, ProviderError> {
    Ok(Box::new(super::GeminiProvider::new()?))
}

#[cfg(not(feature = "gemini"))]
fn default_gemini() -> Result<Box<dyn CompletionProvider>, ProviderError> {
    Ok(Box::new(UnavailableProvider::new("Gemini", "gemini")))
}

/// ビルドに含まれていないプロバイダーの代わり
pub struct UnavailableProvider {
    provider: &'static str,
    feature: &'static str,
}

impl UnavailableProvider {
    pub fn new(provider: &'static str, feature: &'static str) -> Self {
        Self { provider, feature }
    }
}

impl CompletionProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        self.provider
    }

    fn complete(
        &self,
        _prompt: &str,
        _credential: &str,
        _model_id: &str,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable {
            provider: self.provider,
            feature: self.feature,
        })
    }
}
