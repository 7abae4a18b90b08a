//! PDF処理モジュール - 先頭ページのテキスト抽出

use crate::error::DocumentReadError;
use lopdf::Document;
use std::path::Path;

/// LLMに渡す最大ページ数
pub const MAX_PAGES: usize = 3;

/// ページごとのテキストを返す抽出器
pub trait PageTextReader: Send + Sync {
    /// 先頭から最大 `max_pages` ページ分のテキストを返す
    ///
    /// テキストの無いページ（スキャン画像など）は空文字列になる。
    fn read_pages(&self, path: &Path, max_pages: usize) -> Result<Vec<String>, DocumentReadError>;
}

/// lopdf を使った抽出器
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfReader;

impl PageTextReader for LopdfReader {
    fn read_pages(&self, path: &Path, max_pages: usize) -> Result<Vec<String>, DocumentReadError> {
        let document = Document::load(path).map_err(|e| DocumentReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let pages = document
            .get_pages()
            .into_keys()
            .take(max_pages)
            .map(|page_number| {
                document.extract_text(&[page_number]).unwrap_or_else(|e| {
                    tracing::warn!(?path, page_number, error = %e, "ページのテキスト抽出に失敗");
                    String::new()
                })
            })
            .collect();

        Ok(pages)
    }
}

/// 先頭ページのテキストを改行区切りで連結
pub fn read_leading_text(
    reader: &dyn PageTextReader,
    path: &Path,
) -> Result<String, DocumentReadError> {
    Ok(reader.read_pages(path, MAX_PAGES)?.join("\n"))
}

/// テスト用のPDFを生成
#[cfg(test)]
pub(crate) mod testing {
    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};
    use std::path::Path;

    /// 1ページ1行のテキストを持つPDFを書き出す
    pub fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let content = format!("BT /F1 24 Tf 72 700 Td ({text}) Tj ET");
                let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
