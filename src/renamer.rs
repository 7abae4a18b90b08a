//! 1ファイル分のリネーム処理

use crate::error::{ProcessError, ProviderError, RenameError};
use crate::llm::MetadataExtractor;
use crate::pdf::{read_leading_text, LopdfReader, PageTextReader};
use std::path::{Path, PathBuf};

/// リネーム結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    /// 元のファイル名
    pub original: String,
    /// 新しいファイル名
    pub new_name: String,
    /// LLMの応答を解析できず既定値で命名した
    pub placeholder: bool,
}

/// PDFを読み取り、タイトルと著者名でリネームする
pub struct DocumentRenamer {
    reader: Box<dyn PageTextReader>,
    extractor: MetadataExtractor,
}

impl DocumentRenamer {
    pub fn new(reader: Box<dyn PageTextReader>, extractor: MetadataExtractor) -> Self {
        Self { reader, extractor }
    }

    /// lopdf と標準のプロバイダー構成で作成
    pub fn with_defaults() -> Result<Self, ProviderError> {
        Ok(Self::new(
            Box::new(LopdfReader),
            MetadataExtractor::with_default_providers()?,
        ))
    }

    /// `pdf_path` を `"{タイトル} - {著者}.pdf"` にリネーム
    pub fn rename_one(
        &self,
        pdf_path: &Path,
        credential: &str,
        model_id: &str,
    ) -> Result<RenamedFile, ProcessError> {
        let text = read_leading_text(self.reader.as_ref(), pdf_path)?;
        let info = self.extractor.extract(&text, credential, model_id)?;

        let new_name = info.generate_filename();
        let new_path = target_path(pdf_path, &new_name);
        rename_file(pdf_path, &new_path)?;

        tracing::info!("リネーム完了: {:?} -> {}", pdf_path, new_name);

        Ok(RenamedFile {
            original: file_name_of(pdf_path),
            new_name,
            placeholder: info.is_placeholder(),
        })
    }
}

/// 元のファイルと同じフォルダ内の新しいパス
fn target_path(pdf_path: &Path, new_name: &str) -> PathBuf {
    pdf_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(new_name)
}

/// 既存ファイルを上書きせずにリネーム
fn rename_file(from: &Path, to: &Path) -> Result<(), RenameError> {
    if from == to {
        // 既に同じ名前
        return Ok(());
    }
    // 大文字小文字を区別しないファイルシステムでは、表記違いの自分自身が見つかる
    if to.exists() && !is_same_file(from, to) {
        return Err(RenameError::TargetExists {
            path: to.to_path_buf(),
        });
    }

    std::fs::rename(from, to).map_err(|source| RenameError::Filesystem {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentReadError;
    use crate::llm::{CompletionProvider, ProviderRegistry};
    use tempfile::tempdir;

    struct FixedText(&'static str);

    impl PageTextReader for FixedText {
        fn read_pages(&self, path: &Path, _: usize) -> Result<Vec<String>, DocumentReadError> {
            if !path.exists() {
                return Err(DocumentReadError {
                    path: path.to_path_buf(),
                    message: "not found".into(),
                });
            }
            Ok(vec![self.0.to_string()])
        }
    }

    struct Reply(&'static str);

    impl CompletionProvider for Reply {
        fn name(&self) -> &'static str {
            "reply"
        }

        fn complete(&self, _: &str, _: &str, _: &str) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    fn renamer(reply: &'static str) -> DocumentRenamer {
        DocumentRenamer::new(
            Box::new(FixedText("Attention Is All You Need\nAshish Vaswani")),
            MetadataExtractor::new(ProviderRegistry::new(Box::new(Reply(reply)))),
        )
    }

    #[test]
    fn renames_in_same_directory() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("1706.03762.pdf");
        std::fs::write(&source, b"%PDF").unwrap();

        let renamed = renamer("Attention Is All You Need; Vaswani")
            .rename_one(&source, "key", "gpt-4o")
            .unwrap();

        assert_eq!(renamed.original, "1706.03762.pdf");
        assert_eq!(renamed.new_name, "Attention Is All You Need - Vaswani.pdf");
        assert!(!renamed.placeholder);
        assert!(!source.exists());
        assert!(dir.path().join("Attention Is All You Need - Vaswani.pdf").exists());
    }

    #[test]
    fn unparseable_reply_still_renames_with_sentinels() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scan.pdf");
        std::fs::write(&source, b"%PDF").unwrap();

        let renamed = renamer("Sorry, no idea").rename_one(&source, "key", "gpt-4o").unwrap();
        assert_eq!(renamed.new_name, "Unknown Title - Unknown Author.pdf");
        assert!(renamed.placeholder);
        assert!(dir.path().join("Unknown Title - Unknown Author.pdf").exists());
    }

    #[test]
    fn existing_target_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.pdf");
        let existing = dir.path().join("Deep Learning - LeCun.pdf");
        std::fs::write(&source, b"source").unwrap();
        std::fs::write(&existing, b"existing").unwrap();

        let err = renamer("Deep Learning; LeCun")
            .rename_one(&source, "key", "gpt-4o")
            .unwrap_err();

        assert!(matches!(err, ProcessError::Rename(RenameError::TargetExists { .. })));
        assert!(source.exists());
        assert_eq!(std::fs::read(&existing).unwrap(), b"existing");
    }

    #[test]
    fn already_named_file_is_left_in_place() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("Deep Learning - LeCun.pdf");
        std::fs::write(&source, b"%PDF").unwrap();

        let renamed = renamer("Deep Learning; LeCun")
            .rename_one(&source, "key", "gpt-4o")
            .unwrap();
        assert_eq!(renamed.original, renamed.new_name);
        assert!(source.exists());
    }

    #[test]
    fn case_only_change_is_applied() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("deep learning - lecun.pdf");
        std::fs::write(&source, b"%PDF").unwrap();

        let renamed = renamer("Deep Learning; LeCun")
            .rename_one(&source, "key", "gpt-4o")
            .unwrap();
        assert_eq!(renamed.new_name, "Deep Learning - LeCun.pdf");

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| file_name_of(&entry.unwrap().path()))
            .collect();
        assert_eq!(names, ["Deep Learning - LeCun.pdf"]);
    }

    #[test]
    fn differently_spelled_paths_to_one_file_are_the_same() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();

        assert!(is_same_file(&path, &dir.path().join(".").join("a.pdf")));
        assert!(!is_same_file(&path, &dir.path().join("b.pdf")));
        assert!(!is_same_file(&path, &dir.path().join("missing.pdf")));
    }

    #[cfg(unix)]
    #[test]
    fn target_that_is_the_source_itself_is_not_a_collision() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.pdf");
        let target = dir.path().join("Deep Learning - LeCun.pdf");
        std::fs::write(&source, b"%PDF").unwrap();
        std::fs::hard_link(&source, &target).unwrap();

        renamer("Deep Learning; LeCun")
            .rename_one(&source, "key", "gpt-4o")
            .unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF");
    }

    #[test]
    fn unreadable_document_is_reported() {
        let dir = tempdir().unwrap();
        let err = renamer("T; A")
            .rename_one(&dir.path().join("missing.pdf"), "key", "gpt-4o")
            .unwrap_err();
        assert!(matches!(err, ProcessError::Document(_)));
    }
}
