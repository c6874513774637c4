use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrAppError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像ファイルではありません: {0}")]
    UnsupportedImage(String),

    #[error("入力エラー: {0}")]
    Input(String),

    #[error("tesseract実行エラー: {0}")]
    Tesseract(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] palm_leaf_ocr_common::Error),
}

pub type Result<T> = std::result::Result<T, OcrAppError>;
