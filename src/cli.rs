use clap::{Parser, Subcommand};
use palm_leaf_ocr_common::{LanguageHints, MatchMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "palm-ocr")]
#[command(about = "Palm-leaf Manuscript OCR", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をOCRし、誤認識しやすい文字をハイライト表示
    Recognize {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 出力形式 (text/json/html)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 言語ヒント（例: sin+eng）
        #[arg(short, long)]
        lang: Option<LanguageHints>,

        /// 照合モード (single-char/longest-prefix)
        #[arg(short, long)]
        match_mode: Option<MatchMode>,

        /// カスタム置換テーブル（JSON）
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// テキストに注釈を付ける（OCRなし）
    Annotate {
        /// 対象テキスト
        text: Option<String>,

        /// テキストファイルから読み込み
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// 出力形式 (text/json/html)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 照合モード (single-char/longest-prefix)
        #[arg(short, long)]
        match_mode: Option<MatchMode>,

        /// カスタム置換テーブル（JSON）
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// 置換テーブルを表示
    Table {
        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// カスタム置換テーブル（JSON）
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// tesseractで利用できる言語を表示
    Languages,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// tesseractバイナリのパス
        #[arg(long)]
        set_tesseract_path: Option<PathBuf>,

        /// 既定の言語ヒント（例: sin+eng）
        #[arg(long)]
        set_languages: Option<LanguageHints>,

        /// 認識のタイムアウト秒数（0で無制限）
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 既定の照合モード
        #[arg(long)]
        set_match_mode: Option<MatchMode>,

        /// 既定のカスタム置換テーブル
        #[arg(long)]
        set_table: Option<PathBuf>,

        /// 初期設定に戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown format: {}. Use text, json, or html", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}
