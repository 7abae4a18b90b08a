//! フォルダ単位のバッチ処理
//!
//! フォルダ内のPDFを名前順に1件ずつ処理する。1件の失敗はバッチを止めず、
//! ファイル名とエラーメッセージを [`BatchSummary::failed`] に記録する。

use crate::error::{ProcessError, ScanError};
use crate::renamer::{file_name_of, DocumentRenamer, RenamedFile};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 失敗したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub filename: String,
    pub error_message: String,
    /// プロバイダーがビルドに含まれていないことによる失敗
    pub provider_unavailable: bool,
}

impl FailedFile {
    fn new(filename: String, error: &ProcessError) -> Self {
        Self {
            filename,
            error_message: error.to_string(),
            provider_unavailable: error.is_provider_unavailable(),
        }
    }
}

/// バッチ処理の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedFile>,
    /// 成功したリネーム（処理順）
    pub renamed: Vec<RenamedFile>,
    /// 途中で中止された
    pub cancelled: bool,
}

impl BatchSummary {
    /// プロバイダー未導入の失敗を含むか
    pub fn has_unavailable_provider(&self) -> bool {
        self.failed.iter().any(|f| f.provider_unavailable)
    }
}

/// 1回分のバッチ
#[derive(Debug)]
pub struct BatchJob {
    directory: PathBuf,
    credential: String,
    model_id: String,
    files: Vec<PathBuf>,
    completed: usize,
}

impl BatchJob {
    /// フォルダ内のPDF（拡張子の大文字小文字は問わない）を名前順に列挙
    pub fn scan(
        directory: impl Into<PathBuf>,
        credential: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Result<Self, ScanError> {
        let directory = directory.into();
        let files = list_pdf_files(&directory)?;
        tracing::info!("{} 個のPDFを検出: {:?}", files.len(), directory);

        Ok(Self {
            directory,
            credential: credential.into(),
            model_id: model_id.into(),
            files,
            completed: 0,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// 処理を試みたファイル数（成功・失敗を問わない）
    pub fn completed(&self) -> usize {
        self.completed
    }
}

fn list_pdf_files(directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let read_dir_error = |source: std::io::Error| ScanError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().to_lowercase().ends_with(".pdf"))
}

/// バッチを実行する
pub struct BatchRunner {
    renamer: DocumentRenamer,
    cancel: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new(renamer: DocumentRenamer) -> Self {
        Self {
            renamer,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 外部から中止できるフラグを設定（ファイルの間でのみ確認する）
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// 全ファイルを順に処理
    ///
    /// `on_progress(completed, total)` は1ファイル処理するたびに必ず1回呼ばれる。
    pub fn run(
        &self,
        job: &mut BatchJob,
        mut on_progress: impl FnMut(usize, usize),
    ) -> BatchSummary {
        let total = job.total();
        let mut summary = BatchSummary {
            total_files: total,
            ..BatchSummary::default()
        };

        for index in job.completed..total {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::info!("バッチを中止: {}/{} 件処理済み", job.completed, total);
                summary.cancelled = true;
                break;
            }

            let pdf_path = &job.files[index];
            match self
                .renamer
                .rename_one(pdf_path, &job.credential, &job.model_id)
            {
                Ok(renamed) => {
                    summary.succeeded += 1;
                    summary.renamed.push(renamed);
                }
                Err(e) => {
                    let filename = file_name_of(pdf_path);
                    tracing::warn!("処理に失敗: {}: {}", filename, e);
                    summary.failed.push(FailedFile::new(filename, &e));
                }
            }

            job.completed += 1;
            on_progress(job.completed, total);
        }

        tracing::info!(
            "バッチ完了: {} 件成功, {} 件失敗 (全 {} 件)",
            summary.succeeded,
            summary.failed.len(),
            total
        );
        summary
    }
}

/// 標準構成でフォルダ内のPDFをすべてリネーム
///
/// ファイル単位のエラーは結果に記録される。`Err` になるのはフォルダを読めない場合と
/// HTTPクライアントを作成できない場合のみ。
pub fn run_batch(
    directory: impl AsRef<Path>,
    credential: &str,
    model_id: &str,
    on_progress: impl FnMut(usize, usize),
) -> Result<BatchSummary, ScanError> {
    let mut job = BatchJob::scan(directory.as_ref(), credential, model_id)?;
    let runner = BatchRunner::new(DocumentRenamer::with_defaults()?);
    Ok(runner.run(&mut job, on_progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"%PDF-1.5").unwrap();
    }

    #[test]
    fn lists_pdfs_case_insensitively_in_name_order() {
        let dir = tempdir().unwrap();
        for name in ["b.pdf", "A.PDF", "c.Pdf", "notes.txt", "pdf", "archive.pdf.zip"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let job = BatchJob::scan(dir.path(), "key", "gpt-4o").unwrap();
        let names: Vec<String> = job.files().iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, ["A.PDF", "b.pdf", "c.Pdf"]);
        assert_eq!(job.total(), 3);
        assert_eq!(job.completed(), 0);
    }

    #[test]
    fn missing_directory_is_scan_error() {
        let dir = tempdir().unwrap();
        let err = BatchJob::scan(dir.path().join("nope"), "key", "gpt-4o").unwrap_err();
        assert!(matches!(err, ScanError::ReadDir { .. }));
    }

    #[test]
    fn empty_directory_yields_empty_job() {
        let dir = tempdir().unwrap();
        let job = BatchJob::scan(dir.path(), "key", "gpt-4o").unwrap();
        assert_eq!(job.total(), 0);
        assert!(job.files().is_empty());
        assert_eq!(job.directory(), dir.path());
    }
}
