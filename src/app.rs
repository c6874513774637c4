//! コマンド共通の処理

use crate::config::Config;
use crate::error::Result;
use crate::output::FileReport;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use palm_leaf_ocr_common::{ControllerOptions, Controller, LanguageHints, MatchMode, Recognizer};
use std::path::Path;
use std::time::Duration;

/// 設定とコマンドライン指定からコントローラ設定を組み立てる
pub fn build_options(
    config: &Config,
    lang: Option<LanguageHints>,
    match_mode: Option<MatchMode>,
    table: Option<&Path>,
) -> Result<ControllerOptions> {
    Ok(ControllerOptions {
        hints: lang.unwrap_or_else(|| config.languages.clone()),
        match_mode: match_mode.unwrap_or(config.match_mode),
        race_policy: config.race_policy,
        table: config.substitution_table(table)?,
    })
}

/// 画像を1枚ずつ選択して認識する（1枚ごとに1アップロードサイクル）
pub async fn recognize_all<R>(
    controller: &Controller<R>,
    images: &[ImageInfo],
    show_progress: bool,
) -> Vec<FileReport>
where
    R: Recognizer<Image = ImageInfo>,
{
    let mut reports = Vec::with_capacity(images.len());

    for (idx, image) in images.iter().enumerate() {
        let spinner = show_progress.then(|| processing_spinner(idx + 1, images.len(), &image.file_name));

        let state = controller.select_image(image).await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        reports.push(FileReport::new(image.file_name.clone(), &state));
    }

    reports
}

/// 処理中インジケータ
fn processing_spinner(current: usize, total: usize, file_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("[{}/{}] Processing... {}", current, total, file_name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
