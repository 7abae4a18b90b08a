//! メインアプリケーションウィンドウ

use crate::batch::{BatchJob, BatchRunner, BatchSummary};
use crate::renamer::DocumentRenamer;
use crate::settings::{LastInputs, SETTINGS_FILE};
use anyhow::Result;
use eframe::egui;
use egui::{CentralPanel, RichText, Vec2};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use super::theme::{japanese_fonts, paper_theme, Colors};

/// ワーカースレッドからの通知
enum WorkerEvent {
    Progress { completed: usize, total: usize },
    Finished(BatchSummary),
    Failed(String),
}

/// アプリケーション状態
pub struct PaperRenamerApp {
    /// フォームの入力値
    inputs: LastInputs,
    /// 処理中のワーカーからの受信チャンネル
    worker_rx: Option<Receiver<WorkerEvent>>,
    /// 中止フラグ
    cancel: Arc<AtomicBool>,
    /// 進捗 (完了数, 全体)
    progress: (usize, usize),
    /// 直近のバッチ結果
    summary: Option<BatchSummary>,
    /// 結果を表示しているフォルダ
    last_folder: Option<PathBuf>,
    /// ステータスメッセージ
    status: String,
    /// エラーメッセージ
    error: Option<String>,
}

impl Default for PaperRenamerApp {
    fn default() -> Self {
        Self {
            inputs: LastInputs::load(SETTINGS_FILE).with_env_overrides(),
            worker_rx: None,
            cancel: Arc::new(AtomicBool::new(false)),
            progress: (0, 0),
            summary: None,
            last_folder: None,
            status: "APIキー・モデル・フォルダを入力して開始".to_string(),
            error: None,
        }
    }
}

impl PaperRenamerApp {
    fn is_processing(&self) -> bool {
        self.worker_rx.is_some()
    }

    /// バッチ処理を開始
    fn start_processing(&mut self, ctx: &egui::Context) {
        if !self.inputs.is_complete() {
            self.error = Some("すべての項目を入力してください".to_string());
            return;
        }

        if let Err(e) = self.inputs.save(SETTINGS_FILE) {
            tracing::warn!("設定の保存に失敗: {:#}", e);
        }

        let directory = PathBuf::from(self.inputs.directory_path.trim());
        let credential = self.inputs.api_key.trim().to_string();
        let model_id = self.inputs.model.trim().to_string();

        self.error = None;
        self.summary = None;
        self.progress = (0, 0);
        self.last_folder = Some(directory.clone());
        self.status = "処理中...".to_string();
        self.cancel = Arc::new(AtomicBool::new(false));

        let (tx, rx) = channel();
        self.worker_rx = Some(rx);

        let cancel = Arc::clone(&self.cancel);
        let ctx = ctx.clone();

        // バックグラウンドで処理（バッチ自体は1件ずつ逐次）
        std::thread::spawn(move || {
            let event = match run_worker(directory, credential, model_id, cancel, &tx, &ctx) {
                Ok(summary) => WorkerEvent::Finished(summary),
                Err(e) => WorkerEvent::Failed(format!("{:#}", e)),
            };
            let _ = tx.send(event);
            ctx.request_repaint();
        });
    }

    /// ワーカーからの通知を受信
    fn receive_events(&mut self) {
        let Some(rx) = &self.worker_rx else {
            return;
        };

        let mut finished = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                WorkerEvent::Progress { completed, total } => {
                    self.progress = (completed, total);
                    self.status = format!("処理中... {}/{}", completed, total);
                }
                WorkerEvent::Finished(summary) => {
                    self.status = if summary.cancelled {
                        format!(
                            "中止: {} 件成功, {} 件失敗 (全 {} 件)",
                            summary.succeeded,
                            summary.failed.len(),
                            summary.total_files
                        )
                    } else {
                        format!(
                            "完了: {} 件成功, {} 件失敗",
                            summary.succeeded,
                            summary.failed.len()
                        )
                    };
                    if summary.has_unavailable_provider() {
                        self.error = summary
                            .failed
                            .iter()
                            .find(|f| f.provider_unavailable)
                            .map(|f| format!("依存関係が不足しています: {}", f.error_message));
                    }
                    self.summary = Some(summary);
                    finished = true;
                }
                WorkerEvent::Failed(message) => {
                    self.status = "処理を開始できませんでした".to_string();
                    self.error = Some(message);
                    finished = true;
                }
            }
        }

        if finished {
            self.worker_rx = None;
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let processing = self.is_processing();

        egui::Grid::new("inputs")
            .num_columns(3)
            .spacing([8.0, 10.0])
            .show(ui, |ui| {
                ui.label("APIキー:");
                ui.add_enabled(
                    !processing,
                    egui::TextEdit::singleline(&mut self.inputs.api_key)
                        .password(true)
                        .desired_width(380.0),
                );
                ui.end_row();

                ui.label("モデル:");
                ui.add_enabled(
                    !processing,
                    egui::TextEdit::singleline(&mut self.inputs.model).desired_width(380.0),
                );
                ui.end_row();

                ui.label("フォルダ:");
                ui.add_enabled(
                    !processing,
                    egui::TextEdit::singleline(&mut self.inputs.directory_path)
                        .desired_width(380.0),
                );
                if ui
                    .add_enabled(!processing, egui::Button::new("参照"))
                    .clicked()
                {
                    if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                        self.inputs.directory_path = folder.display().to_string();
                    }
                }
                ui.end_row();
            });

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if processing {
                if ui.button("中止").clicked() {
                    self.cancel.store(true, Ordering::Relaxed);
                    self.status = "現在のファイルの処理後に中止します...".to_string();
                }
            } else if ui
                .add(
                    egui::Button::new(RichText::new("開始").strong())
                        .min_size(Vec2::new(96.0, 28.0)),
                )
                .clicked()
            {
                self.start_processing(ctx);
            }

            if ui
                .add_enabled(self.last_folder.is_some(), egui::Button::new("📁 フォルダを開く"))
                .clicked()
            {
                if let Some(ref folder) = self.last_folder {
                    let _ = open::that(folder);
                }
            }
        });
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        let Some(summary) = &self.summary else {
            return;
        };

        ui.label(
            RichText::new(format!(
                "処理結果: {}/{} 件成功",
                summary.succeeded, summary.total_files
            ))
            .size(15.0)
            .color(Colors::INK),
        );

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for renamed in &summary.renamed {
                    let color = if renamed.placeholder {
                        Colors::WARNING
                    } else {
                        Colors::SUCCESS
                    };
                    result_card(
                        ui,
                        "✓",
                        color,
                        &renamed.original,
                        &format!("→ {}", renamed.new_name),
                    );
                }
                for failed in &summary.failed {
                    result_card(
                        ui,
                        "✗",
                        Colors::ERROR,
                        &failed.filename,
                        &format!("エラー: {}", failed.error_message),
                    );
                }
            });
    }
}

fn result_card(ui: &mut egui::Ui, icon: &str, color: egui::Color32, title: &str, detail: &str) {
    ui.add_space(4.0);
    egui::Frame::new()
        .fill(Colors::CARD)
        .stroke(egui::Stroke::new(1.0, Colors::BORDER))
        .corner_radius(8.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).size(16.0).color(color));
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(12.0).color(Colors::INK_MUTED));
                    ui.label(RichText::new(detail).size(13.0).color(Colors::INK));
                });
            });
        });
}

/// ワーカースレッド本体
fn run_worker(
    directory: PathBuf,
    credential: String,
    model_id: String,
    cancel: Arc<AtomicBool>,
    tx: &Sender<WorkerEvent>,
    ctx: &egui::Context,
) -> Result<BatchSummary> {
    let mut job = BatchJob::scan(directory, credential, model_id)?;
    let runner = BatchRunner::new(DocumentRenamer::with_defaults()?).with_cancel_flag(cancel);

    let _ = tx.send(WorkerEvent::Progress {
        completed: 0,
        total: job.total(),
    });
    ctx.request_repaint();

    Ok(runner.run(&mut job, |completed, total| {
        let _ = tx.send(WorkerEvent::Progress { completed, total });
        ctx.request_repaint();
    }))
}

impl eframe::App for PaperRenamerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_events();

        CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 10.0);

            ui.heading(RichText::new("論文PDFリネーマー").size(24.0).color(Colors::INK));
            ui.label(
                RichText::new("PDFの先頭ページからタイトルと筆頭著者を抽出し「タイトル - 著者.pdf」にリネーム")
                    .size(13.0)
                    .color(Colors::INK_MUTED),
            );
            ui.add_space(6.0);

            self.show_form(ui, ctx);

            // エラー表示
            if let Some(ref error) = self.error {
                egui::Frame::new()
                    .fill(Colors::CARD)
                    .stroke(egui::Stroke::new(1.5, Colors::ERROR))
                    .corner_radius(8.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("⚠").size(20.0).color(Colors::ERROR));
                            ui.label(RichText::new(error).color(Colors::ERROR));
                        });
                    });
            }

            // 進捗
            let (completed, total) = self.progress;
            if self.is_processing() || total > 0 {
                let fraction = if total == 0 {
                    0.0
                } else {
                    completed as f32 / total as f32
                };
                ui.horizontal(|ui| {
                    if self.is_processing() {
                        ui.spinner();
                    }
                    ui.label(RichText::new(&self.status).color(Colors::ACCENT));
                });
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .fill(Colors::ACCENT)
                        .text(format!("{}/{}", completed, total)),
                );
            } else {
                ui.label(RichText::new(&self.status).color(Colors::INK_MUTED));
            }

            ui.add_space(6.0);
            self.show_results(ui);
        });
    }
}

/// アプリケーションを起動
pub fn run() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([680.0, 620.0])
            .with_min_inner_size([560.0, 480.0])
            .with_title("論文PDFリネーマー"),
        ..Default::default()
    };

    eframe::run_native(
        "論文PDFリネーマー",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_style(paper_theme());
            cc.egui_ctx.set_fonts(japanese_fonts());
            Ok(Box::new(PaperRenamerApp::default()))
        }),
    )
    .map_err(|e| anyhow::anyhow!("アプリケーションエラー: {}", e))
}
