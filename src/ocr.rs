//! tesseractコマンド連携
//!
//! `tesseract <画像> stdout -l sin+eng` を非同期プロセスとして実行する。

use crate::config::Config;
use crate::error::{OcrAppError, Result};
use crate::scanner::ImageInfo;
use palm_leaf_ocr_common::{LanguageHints, Recognition, RecognizeError, Recognizer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut cli = Self::new(config.tesseract_binary());
        if let Some(secs) = config.timeout_seconds.filter(|&s| s > 0) {
            cli = cli.with_timeout(Duration::from_secs(secs));
        }
        cli
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    /// `tesseract --list-langs` の結果（1行目の見出しは除く）
    pub async fn list_languages(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.binary)
            .arg("--list-langs")
            .output()
            .await
            .map_err(|e| OcrAppError::Tesseract(format!("{}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrAppError::Tesseract(format!(
                "--list-langs failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Recognizer for TesseractCli {
    type Image = ImageInfo;

    async fn recognize(
        &self,
        image: &ImageInfo,
        hints: &LanguageHints,
    ) -> std::result::Result<Recognition, RecognizeError> {
        let mut command = Command::new(&self.binary);
        command
            .arg(&image.path)
            .arg("stdout")
            .arg("-l")
            .arg(hints.to_string())
            .kill_on_drop(true);

        debug!(binary = %self.binary.display(), file = %image.file_name, lang = %hints, "tesseract_spawn");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| RecognizeError::Timeout(limit.as_secs()))?,
            None => command.output().await,
        }
        .map_err(|e| RecognizeError::Spawn(format!("{}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognizeError::Engine(format!(
                "tesseract failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!(file = %image.file_name, chars = text.chars().count(), "tesseract_done");

        Ok(Recognition { text })
    }
}

fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
