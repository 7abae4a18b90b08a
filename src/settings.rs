//! 前回の入力値の保存・読み込み

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 保存先ファイル（作業フォルダ）
pub const SETTINGS_FILE: &str = "last_inputs.json";

/// モデル名が空の場合の既定値
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 前回の入力値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastInputs {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub directory_path: String,
}

impl LastInputs {
    /// ファイルから読み込む（無い・壊れている場合は空）
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut inputs = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("設定ファイルのパースに失敗: {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if inputs.model.trim().is_empty() {
            inputs.model = DEFAULT_MODEL.to_string();
        }
        inputs
    }

    /// 環境変数で上書き（空の値は無視）
    pub fn with_env_overrides(mut self) -> Self {
        let overrides = [
            ("PAPER_RENAMER_API_KEY", &mut self.api_key),
            ("PAPER_RENAMER_MODEL", &mut self.model),
            ("PAPER_RENAMER_DIR", &mut self.directory_path),
        ];
        for (var, field) in overrides {
            if let Some(value) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
        self
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("設定のシリアライズに失敗")?;
        std::fs::write(path, json)
            .with_context(|| format!("設定ファイルの書き込みに失敗: {:?}", path))
    }

    /// 3項目すべてが入力されているか
    pub fn is_complete(&self) -> bool {
        [&self.api_key, &self.model, &self.directory_path]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}
