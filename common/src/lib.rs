//! Palm-leaf OCR Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック:
//! - 置換テーブルと注釈（ハイライト）処理
//! - アップロード状態機械とOCRコントローラ

pub mod error;
pub mod table;
pub mod annotator;
pub mod state;
pub mod recognizer;
pub mod controller;
pub mod render;

pub use error::{Error, Result};
pub use table::SubstitutionTable;
pub use annotator::{annotate, annotate_with, DisplaySegment, MatchMode};
pub use state::{RacePolicy, Ticket, UploadPhase, UploadState, ERROR_TEXT, INITIAL_TEXT, PROCESSING_TEXT};
pub use recognizer::{ImageSource, LanguageHints, Recognition, RecognizeError, Recognizer};
pub use controller::{Controller, ControllerOptions};
pub use render::{escape_html, render_html_fragment, render_html_page, HIGHLIGHT_STYLE};
