use crate::error::{OcrAppError, Result};
use palm_leaf_ocr_common::{LanguageHints, MatchMode, RacePolicy, SubstitutionTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// tesseractバイナリのパスを上書きする環境変数
pub const TESSERACT_ENV: &str = "PALM_OCR_TESSERACT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tesseract_path: Option<PathBuf>,
    pub languages: LanguageHints,
    /// 未設定なら無制限に待つ
    pub timeout_seconds: Option<u64>,
    pub match_mode: MatchMode,
    pub race_policy: RacePolicy,
    /// カスタム置換テーブル（JSON）
    pub table_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            languages: LanguageHints::default(),
            timeout_seconds: None,
            match_mode: MatchMode::SingleChar,
            race_policy: RacePolicy::DropStale,
            table_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// `config`サブコマンド用。resetなら壊れたファイルでも読まずに初期値から始める
    pub fn load_for_edit(path: &Path, reset: bool) -> Result<Self> {
        if reset {
            Ok(Self::default())
        } else {
            Self::load_from(path)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OcrAppError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("palm-leaf-ocr").join("config.json"))
    }

    pub fn tesseract_binary(&self) -> PathBuf {
        // 環境変数を優先
        if let Ok(path) = std::env::var(TESSERACT_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        self.tesseract_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("tesseract"))
    }

    /// カスタムテーブル（未設定ならNone = 組み込みテーブル）
    pub fn substitution_table(&self, override_path: Option<&Path>) -> Result<Option<SubstitutionTable>> {
        match override_path.or(self.table_path.as_deref()) {
            Some(path) => {
                if !path.exists() {
                    return Err(OcrAppError::FileNotFound(path.display().to_string()));
                }
                Ok(Some(SubstitutionTable::from_file(path)?))
            }
            None => Ok(None),
        }
    }
}
