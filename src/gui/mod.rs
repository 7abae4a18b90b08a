//! GUI - 入力フォームと進捗表示

mod app;
mod theme;

pub use app::run;
