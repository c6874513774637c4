//! 画像入力
//!
//! ファイル選択の `accept="image/*"` に相当する拡張子フィルタのみ行う。
//! デコードできない画像もそのままOCRに渡す（失敗は認識エラーになる）。

use crate::error::{OcrAppError, Result};
use palm_leaf_ocr_common::ImageSource;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// デコードできた場合の画像サイズ
    pub dimensions: Option<(u32, u32)>,
}

impl ImageInfo {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(OcrAppError::FileNotFound(path.display().to_string()));
        }
        if !is_image_path(path) {
            return Err(OcrAppError::UnsupportedImage(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let dimensions = match image::image_dimensions(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                debug!(file = %file_name, error = %e, "image_not_decodable");
                None
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            dimensions,
        })
    }
}

impl ImageSource for ImageInfo {
    fn preview_reference(&self) -> String {
        self.path.display().to_string()
    }

    fn display_name(&self) -> String {
        self.file_name.clone()
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "bmp", "gif", "webp", "pbm", "pgm", "ppm"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// フォルダ直下の画像をファイル名順に列挙
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(OcrAppError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_image_path(path) {
            images.push(ImageInfo::from_path(path)?);
        }
    }

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// コマンドライン引数（ファイル/フォルダ混在）から画像を集める
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            images.extend(scan_folder(path)?);
        } else {
            images.push(ImageInfo::from_path(path)?);
        }
    }

    if images.is_empty() {
        let joined = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(OcrAppError::NoImagesFound(joined));
    }

    Ok(images)
}
