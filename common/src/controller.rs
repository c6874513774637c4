//! アップロード/認識コントローラ
//!
//! UI状態（UploadState）を所有し、画像選択から外部OCR呼び出し、
//! 注釈処理までを仲介する。認識呼び出しが唯一の中断点で、
//! ロックを保持したまま `.await` しない。

use crate::annotator::{annotate_with, MatchMode};
use crate::recognizer::{ImageSource, LanguageHints, Recognizer};
use crate::state::{RacePolicy, Ticket, UploadState};
use crate::table::SubstitutionTable;
use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// コントローラ設定
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    pub hints: LanguageHints,
    pub match_mode: MatchMode,
    pub race_policy: RacePolicy,
    /// 省略時は組み込みテーブル
    pub table: Option<SubstitutionTable>,
}

type Observer = Box<dyn Fn(&UploadState)>;

pub struct Controller<R: Recognizer> {
    recognizer: R,
    hints: LanguageHints,
    match_mode: MatchMode,
    race_policy: RacePolicy,
    table: Cow<'static, SubstitutionTable>,
    state: Mutex<UploadState>,
    observer: Option<Observer>,
}

impl<R: Recognizer> Controller<R> {
    pub fn new(recognizer: R) -> Self {
        Self::with_options(recognizer, ControllerOptions::default())
    }

    pub fn with_options(recognizer: R, options: ControllerOptions) -> Self {
        let table = match options.table {
            Some(table) => Cow::Owned(table),
            None => Cow::Borrowed(SubstitutionTable::palm_leaf()),
        };
        Self {
            recognizer,
            hints: options.hints,
            match_mode: options.match_mode,
            race_policy: options.race_policy,
            table,
            state: Mutex::new(UploadState::new()),
            observer: None,
        }
    }

    /// 状態が変わるたびに呼ばれるフック（Web UIのシグナル反映用）
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&UploadState) + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// 現在の状態のスナップショット
    pub fn state(&self) -> UploadState {
        self.lock().clone()
    }

    /// 画像を選択し、プレビューを設定して認識を実行
    pub async fn select_image(&self, image: &R::Image) -> UploadState {
        let preview = image.preview_reference();
        let ticket = self.update(|s| s.select_image(preview));
        info!(image = %image.display_name(), generation = ticket.generation(), "image_selected");
        self.run_recognition(image, ticket).await
    }

    /// 認識を実行し、結果（または固定エラー）を状態に反映
    pub async fn run_recognition(&self, image: &R::Image, ticket: Ticket) -> UploadState {
        let policy = self.race_policy;
        if !self.update(|s| s.begin_processing(ticket, policy)) {
            return self.state();
        }

        debug!(hints = %self.hints, "recognition_started");
        match self.recognizer.recognize(image, &self.hints).await {
            Ok(recognition) => {
                let segments = annotate_with(&recognition.text, &self.table, self.match_mode);
                let highlighted = segments.iter().filter(|s| s.highlighted).count();
                let applied =
                    self.update(|s| s.finish_success(ticket, recognition.text, segments, policy));
                info!(
                    image = %image.display_name(),
                    highlighted,
                    applied,
                    "recognition_done"
                );
            }
            Err(e) => {
                // 原因は開発者向けログのみに残す
                warn!(image = %image.display_name(), error = %e, "recognition_failed");
                self.update(|s| s.finish_failure(ticket, policy));
            }
        }

        self.state()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, UploadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(&self, f: impl FnOnce(&mut UploadState) -> T) -> T {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut *state);
            let snapshot = self.observer.as_ref().map(|_| state.clone());
            (result, snapshot)
        };
        if let (Some(observer), Some(snapshot)) = (&self.observer, snapshot) {
            observer(&snapshot);
        }
        result
    }
}
