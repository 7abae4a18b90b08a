//! 論文PDFリネーマー - LLM を使用したPDF自動リネームツール
//!
//! # 機能
//! - PDFの先頭3ページからテキスト抽出
//! - OpenAI / Google Gemini で論文タイトルと筆頭著者の姓を抽出
//! - `"タイトル - 著者.pdf"` 形式でフォルダ内のPDFを一括リネーム
//! - 1ファイルの失敗でバッチを止めない
//!
//! ```no_run
//! let summary = paper_renamer::run_batch("./papers", "api-key", "gemini-2.5-flash", |done, n| {
//!     println!("{done}/{n}");
//! })?;
//! println!("{} 件成功", summary.succeeded);
//! # Ok::<(), paper_renamer::error::ScanError>(())
//! ```

pub mod batch;
pub mod error;
pub mod gui;
pub mod llm;
pub mod parser;
pub mod pdf;
pub mod renamer;
pub mod settings;

pub use batch::{run_batch, BatchJob, BatchRunner, BatchSummary, FailedFile};
pub use parser::{sanitize, ExtractionResult};
pub use renamer::{DocumentRenamer, RenamedFile};
