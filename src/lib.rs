//! Palm-leaf Manuscript OCR (CLI)

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod ocr;
pub mod output;
pub mod scanner;
