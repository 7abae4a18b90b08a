//! テーマ設定 - 紙とインクの配色

use egui::{Color32, CornerRadius, FontData, FontDefinitions, FontFamily, Stroke, Style, Visuals};

/// カラーパレット
pub struct Colors;

impl Colors {
    pub const PAPER: Color32 = Color32::from_rgb(250, 248, 242);
    pub const CARD: Color32 = Color32::from_rgb(255, 255, 255);
    pub const CARD_HOVER: Color32 = Color32::from_rgb(238, 234, 222);
    pub const INK: Color32 = Color32::from_rgb(33, 37, 41);
    pub const INK_MUTED: Color32 = Color32::from_rgb(108, 117, 125);
    pub const ACCENT: Color32 = Color32::from_rgb(29, 78, 137);
    pub const SUCCESS: Color32 = Color32::from_rgb(25, 135, 84);
    pub const WARNING: Color32 = Color32::from_rgb(176, 112, 0);
    pub const ERROR: Color32 = Color32::from_rgb(200, 35, 51);
    pub const BORDER: Color32 = Color32::from_rgb(214, 208, 194);
}

/// 明るいテーマのスタイルを作成
pub fn paper_theme() -> Style {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Colors::PAPER;
    visuals.window_fill = Colors::CARD;
    visuals.extreme_bg_color = Colors::CARD;
    visuals.faint_bg_color = Colors::PAPER;

    let radius = CornerRadius::same(6);
    for (widget, fill, text) in [
        (&mut visuals.widgets.noninteractive, Colors::PAPER, Colors::INK_MUTED),
        (&mut visuals.widgets.inactive, Colors::CARD_HOVER, Colors::INK),
        (&mut visuals.widgets.hovered, Colors::BORDER, Colors::INK),
        (&mut visuals.widgets.active, Colors::ACCENT, Colors::CARD),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.fg_stroke = Stroke::new(1.0, text);
        widget.corner_radius = radius;
    }

    visuals.selection.bg_fill = Colors::ACCENT.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, Colors::ACCENT);

    Style {
        visuals,
        ..Style::default()
    }
}

/// 日本語フォントの候補（OSごと）
const JAPANESE_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\YuGothM.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
];

/// 最初に見つかった日本語フォントを追加
pub fn japanese_fonts() -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    let Some((path, data)) = JAPANESE_FONT_CANDIDATES
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|data| (*path, data)))
    else {
        tracing::debug!("日本語フォントが見つかりません");
        return fonts;
    };

    tracing::debug!("日本語フォントを使用: {}", path);
    fonts
        .font_data
        .insert("japanese".to_owned(), FontData::from_owned(data).into());
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, "japanese".to_owned());
    fonts
        .families
        .entry(FontFamily::Monospace)
        .or_default()
        .push("japanese".to_owned());

    fonts
}
