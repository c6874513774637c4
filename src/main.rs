use clap::Parser;
use palm_leaf_ocr::{app, cli, config, error, ocr, output, scanner};
use palm_leaf_ocr_common::{annotate_with, Controller, SubstitutionTable, UploadPhase, UploadState};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::{OcrAppError, Result};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Recognize { paths, format, lang, match_mode, table } => {
            let config = Config::load()?;
            let images = scanner::collect_images(&paths)?;
            let options = app::build_options(&config, lang, match_mode, table.as_deref())?;

            if cli.verbose {
                eprintln!("📜 {}枚の画像を検出 (lang: {}, mode: {})", images.len(), options.hints, options.match_mode);
                for image in &images {
                    match image.dimensions {
                        Some((w, h)) => eprintln!("  {} ({}x{})", image.file_name, w, h),
                        None => eprintln!("  {} (デコード不可)", image.file_name),
                    }
                }
            }

            let recognizer = ocr::TesseractCli::from_config(&config);
            let controller = Controller::with_options(recognizer, options);

            let show_progress = std::io::stderr().is_terminal();
            let reports = app::recognize_all(&controller, &images, show_progress).await;

            let rendered = output::render_reports(&reports, format, use_color(format))?;
            output::emit(&rendered)?;

            let done = reports.iter().filter(|r| r.phase == UploadPhase::Done).count();
            eprintln!("✔ {}/{}枚を認識", done, reports.len());
        }

        Commands::Annotate { text, file, format, match_mode, table } => {
            let config = Config::load()?;
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)?,
                (None, None) => {
                    return Err(OcrAppError::Input("テキストまたは --file を指定してください".into()));
                }
            };

            let options = app::build_options(&config, None, match_mode, table.as_deref())?;
            let table = options.table.as_ref().unwrap_or_else(|| SubstitutionTable::palm_leaf());
            let segments = annotate_with(&text, table, options.match_mode);

            // OCRなしで完了状態を組み立てる
            let mut state = UploadState::new();
            let ticket = state.select_image("-".into());
            state.begin_processing(ticket, options.race_policy);
            state.finish_success(ticket, text, segments, options.race_policy);

            let reports = vec![output::FileReport::new("input", &state)];
            let rendered = output::render_reports(&reports, format, use_color(format))?;
            output::emit(&rendered)?;
        }

        Commands::Table { json, table } => {
            let config = Config::load()?;
            let custom = config.substitution_table(table.as_deref())?;
            let table = custom.as_ref().unwrap_or_else(|| SubstitutionTable::palm_leaf());
            output::emit(&output::render_table(table, json)?)?;
        }

        Commands::Languages => {
            let config = Config::load()?;
            let recognizer = ocr::TesseractCli::from_config(&config);
            let languages = recognizer.list_languages().await?;
            println!("{} ({}件):", recognizer.binary().display(), languages.len());
            for lang in &languages {
                let mark = if config.languages.languages().contains(lang) { " *" } else { "" };
                println!("  {}{}", lang, mark);
            }
        }

        Commands::Config { show, set_tesseract_path, set_languages, set_timeout, set_match_mode, set_table, reset } => {
            let path = Config::config_path()?;
            let mut config = Config::load_for_edit(&path, reset)?;
            let changed = reset
                || set_tesseract_path.is_some()
                || set_languages.is_some()
                || set_timeout.is_some()
                || set_match_mode.is_some()
                || set_table.is_some();

            if let Some(path) = set_tesseract_path {
                config.tesseract_path = Some(path);
            }
            if let Some(languages) = set_languages {
                config.languages = languages;
            }
            if let Some(secs) = set_timeout {
                config.timeout_seconds = (secs > 0).then_some(secs);
            }
            if let Some(mode) = set_match_mode {
                config.match_mode = mode;
            }
            if let Some(path) = set_table {
                config.table_path = Some(path);
            }

            if changed {
                config.save_to(&path)?;
                println!("✔ 設定を保存しました: {}", path.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  tesseract: {}", config.tesseract_binary().display());
                println!("  言語: {}", config.languages);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  照合モード: {}", config.match_mode);
                println!("  競合時の方針: {}", config.race_policy);
                match &config.table_path {
                    Some(path) => println!("  置換テーブル: {}", path.display()),
                    None => println!("  置換テーブル: 組み込み"),
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "palm_leaf_ocr=debug,palm_leaf_ocr_common=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 端末への文字出力のときだけ色を付ける
fn use_color(format: OutputFormat) -> bool {
    format == OutputFormat::Text
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
}
