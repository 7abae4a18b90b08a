//! ファイル名サニタイズ

use regex::Regex;
use std::sync::LazyLock;

/// パスに使えない文字と改行
static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\n\r]"#).expect("INVALID_CHARS は有効な正規表現"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE は有効な正規表現"));

/// ファイル名に使用できない文字を削除し、空白を整理する
///
/// 失敗しない。記号だけの入力なら空文字列を返す。
pub fn sanitize(raw: &str) -> String {
    let removed = INVALID_CHARS.replace_all(raw, "");
    WHITESPACE.replace_all(removed.trim(), " ").into_owned()
}
