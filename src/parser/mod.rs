//! LLM応答の解析とファイル名生成

mod sanitize;

pub use sanitize::sanitize;

/// 応答を解析できなかった場合のタイトル
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// 応答を解析できなかった場合の著者名
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// LLMから抽出された書誌情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// 論文タイトル
    pub title: String,
    /// 筆頭著者の姓
    pub author_surname: String,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            author_surname: UNKNOWN_AUTHOR.to_string(),
        }
    }
}

impl ExtractionResult {
    pub fn new(title: impl Into<String>, author_surname: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author_surname: author_surname.into(),
        }
    }

    /// `"タイトル; 姓"` 形式の応答を解析
    ///
    /// 最初のセミコロンでのみ分割する。セミコロンが無ければ
    /// エラーにはせず `("Unknown Title", "Unknown Author")` を返す。
    pub fn parse_reply(reply: &str) -> Self {
        match reply.split_once(';') {
            Some((title, author)) => Self::new(title.trim(), author.trim()),
            None => Self::default(),
        }
    }

    /// 解析失敗時の既定値かどうか
    pub fn is_placeholder(&self) -> bool {
        self.title == UNKNOWN_TITLE && self.author_surname == UNKNOWN_AUTHOR
    }

    /// 両フィールドをサニタイズ（空になった場合は既定値）
    pub fn sanitized(&self) -> Self {
        let title = sanitize(&self.title);
        let author_surname = sanitize(&self.author_surname);
        Self {
            title: non_empty_or(title, UNKNOWN_TITLE),
            author_surname: non_empty_or(author_surname, UNKNOWN_AUTHOR),
        }
    }

    /// 新しいファイル名を生成
    /// フォーマット: [タイトル] - [筆頭著者の姓].pdf
    pub fn generate_filename(&self) -> String {
        let clean = self.sanitized();
        format!("{} - {}.pdf", clean.title, clean.author_surname)
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
