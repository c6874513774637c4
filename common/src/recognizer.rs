//! 外部OCRエンジンとの境界
//!
//! 認識処理そのものは外部ライブラリに委譲する。
//! CLIではtesseractコマンド、WebではTesseract.jsが実装する。

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// 既定の言語ヒント（地域文字 + ラテン文字）
pub const DEFAULT_LANGUAGES: &[&str] = &["sin", "eng"];

/// OCRエンジンに渡す言語ヒント（空にはできない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LanguageHints(Vec<String>);

impl Default for LanguageHints {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect())
    }
}

impl LanguageHints {
    pub fn languages(&self) -> &[String] {
        &self.0
    }
}

/// tesseract形式（`sin+eng`）で表示
impl std::fmt::Display for LanguageHints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("+"))
    }
}

impl TryFrom<Vec<String>> for LanguageHints {
    type Error = String;

    fn try_from(languages: Vec<String>) -> Result<Self, Self::Error> {
        let languages: Vec<String> = languages
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if languages.is_empty() {
            return Err("language hints are empty".to_string());
        }
        Ok(Self(languages))
    }
}

impl From<LanguageHints> for Vec<String> {
    fn from(hints: LanguageHints) -> Self {
        hints.0
    }
}

impl std::str::FromStr for LanguageHints {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.split(['+', ',']).map(str::to_string).collect::<Vec<_>>())
    }
}

/// 認識結果（利用するのはテキストのみ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recognition {
    pub text: String,
}

/// 認識エラー
///
/// コントローラではすべて同じ固定メッセージに変換される。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognizeError {
    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("OCR engine could not be started: {0}")]
    Spawn(String),

    #[error("OCR timed out after {0}s")]
    Timeout(u64),

    #[error("Unsupported image: {0}")]
    Unsupported(String),
}

/// プレビュー参照を作れる画像入力
pub trait ImageSource {
    /// 表示用の参照（object URL、ファイルパスなど）
    fn preview_reference(&self) -> String;

    /// ログ用の名前
    fn display_name(&self) -> String {
        self.preview_reference()
    }
}

/// 外部OCR機能
pub trait Recognizer {
    type Image: ImageSource;

    fn recognize(
        &self,
        image: &Self::Image,
        hints: &LanguageHints,
    ) -> impl Future<Output = Result<Recognition, RecognizeError>>;
}
