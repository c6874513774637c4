//! アップロード状態機械
//!
//! Idle → Previewing → Processing → Done / Failed
//!
//! 終了状態（Done / Failed）からは新しい画像選択でのみ遷移する。
//! リセット・キャンセル操作はない。

use crate::annotator::DisplaySegment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 初期表示テキスト
pub const INITIAL_TEXT: &str = "no result yet";
/// 処理中表示テキスト
pub const PROCESSING_TEXT: &str = "Processing...";
/// 認識失敗時の固定メッセージ
pub const ERROR_TEXT: &str = "Error processing the image.";

/// アップロードサイクルの段階
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadPhase {
    #[default]
    Idle,
    Previewing,
    Processing,
    Done,
    Failed,
}

impl UploadPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadPhase::Idle => "idle",
            UploadPhase::Previewing => "previewing",
            UploadPhase::Processing => "processing",
            UploadPhase::Done => "done",
            UploadPhase::Failed => "failed",
        }
    }

    /// 1サイクル内で正当な遷移か
    pub fn can_transition_to(self, next: UploadPhase) -> bool {
        matches!(
            (self, next),
            (UploadPhase::Idle, UploadPhase::Previewing)
                | (UploadPhase::Previewing, UploadPhase::Processing)
                | (UploadPhase::Processing, UploadPhase::Done)
                | (UploadPhase::Processing, UploadPhase::Failed)
                // 新しい画像選択
                | (UploadPhase::Done, UploadPhase::Previewing)
                | (UploadPhase::Failed, UploadPhase::Previewing)
                // 処理中に次の画像が選択された
                | (UploadPhase::Processing, UploadPhase::Previewing)
        )
    }
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 処理が重なったときの書き込み方針
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RacePolicy {
    /// 古い世代の完了結果を破棄する
    #[default]
    DropStale,
    /// 後に完了した結果で上書きする
    LastWriteWins,
}

impl std::str::FromStr for RacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop-stale" | "stale" => Ok(RacePolicy::DropStale),
            "last-write-wins" | "lww" => Ok(RacePolicy::LastWriteWins),
            _ => Err(format!("Unknown race policy: {}. Use drop-stale or last-write-wins", s)),
        }
    }
}

impl std::fmt::Display for RacePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RacePolicy::DropStale => write!(f, "drop-stale"),
            RacePolicy::LastWriteWins => write!(f, "last-write-wins"),
        }
    }
}

/// 画像選択ごとに発行される世代チケット
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// UI状態
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    /// 表示中の画像への参照（object URL / パス）
    pub preview: Option<String>,
    pub recognized_text: String,
    pub is_processing: bool,
    pub segments: Vec<DisplaySegment>,
    pub phase: UploadPhase,
    #[serde(skip)]
    generation: u64,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            preview: None,
            recognized_text: INITIAL_TEXT.to_string(),
            is_processing: false,
            segments: Vec::new(),
            phase: UploadPhase::Idle,
            generation: 0,
        }
    }
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 結果エリアに表示するセグメント
    ///
    /// 完了時は注釈済みセグメント、未選択・失敗時は状態テキスト
    /// （"no result yet" / エラーメッセージ）をそのまま表示する。
    /// 選択直後と処理中は空（"Processing..." は処理中インジケータが出す）。
    pub fn display_segments(&self) -> Vec<DisplaySegment> {
        match self.phase {
            UploadPhase::Done => self.segments.clone(),
            UploadPhase::Idle | UploadPhase::Failed => {
                self.recognized_text.chars().map(DisplaySegment::plain).collect()
            }
            UploadPhase::Previewing | UploadPhase::Processing => Vec::new(),
        }
    }

    /// 最新の世代
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// チケットが最新世代か
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// 画像を選択: プレビューを設定し、新しい世代のチケットを返す
    pub fn select_image(&mut self, preview: String) -> Ticket {
        self.generation += 1;
        self.preview = Some(preview);
        self.set_phase(UploadPhase::Previewing);
        Ticket(self.generation)
    }

    /// 認識開始: 処理中フラグと処理中テキストを設定
    pub fn begin_processing(&mut self, ticket: Ticket, policy: RacePolicy) -> bool {
        if !self.accepts(ticket, policy) {
            return false;
        }
        self.is_processing = true;
        self.recognized_text = PROCESSING_TEXT.to_string();
        self.set_phase(UploadPhase::Processing);
        true
    }

    /// 認識成功: テキストとセグメントをまとめて反映
    pub fn finish_success(
        &mut self,
        ticket: Ticket,
        text: String,
        segments: Vec<DisplaySegment>,
        policy: RacePolicy,
    ) -> bool {
        if !self.accepts(ticket, policy) {
            return false;
        }
        self.recognized_text = text;
        self.segments = segments;
        self.is_processing = false;
        self.set_phase(UploadPhase::Done);
        true
    }

    /// 認識失敗: 固定メッセージを表示し、セグメントを空にする
    pub fn finish_failure(&mut self, ticket: Ticket, policy: RacePolicy) -> bool {
        if !self.accepts(ticket, policy) {
            return false;
        }
        self.recognized_text = ERROR_TEXT.to_string();
        self.segments.clear();
        self.is_processing = false;
        self.set_phase(UploadPhase::Failed);
        true
    }

    fn accepts(&self, ticket: Ticket, policy: RacePolicy) -> bool {
        match policy {
            RacePolicy::LastWriteWins => true,
            RacePolicy::DropStale => {
                let current = self.is_current(ticket);
                if !current {
                    debug!(
                        ticket = ticket.0,
                        generation = self.generation,
                        "stale_completion_dropped"
                    );
                }
                current
            }
        }
    }

    fn set_phase(&mut self, next: UploadPhase) {
        let prev = self.phase;
        if !prev.can_transition_to(next) {
            // 後勝ち方針で完了が重なった場合のみ到達する
            warn!(from = %prev, to = %next, "unexpected_upload_transition");
        }
        self.phase = next;
        debug!(from = %prev, to = %next, "upload_transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = UploadState::new();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert_eq!(state.recognized_text, INITIAL_TEXT);
        assert!(!state.is_processing);
        assert!(state.preview.is_none());
        assert!(state.segments.is_empty());
    }

    #[test]
    fn test_success_cycle() {
        let mut state = UploadState::new();
        let ticket = state.select_image("blob:1".into());
        assert_eq!(state.phase, UploadPhase::Previewing);
        assert_eq!(state.preview.as_deref(), Some("blob:1"));

        assert!(state.begin_processing(ticket, RacePolicy::DropStale));
        assert_eq!(state.phase, UploadPhase::Processing);
        assert_eq!(state.recognized_text, PROCESSING_TEXT);
        assert!(state.is_processing);

        let segments = vec![DisplaySegment::plain('x')];
        assert!(state.finish_success(ticket, "x".into(), segments.clone(), RacePolicy::DropStale));
        assert_eq!(state.phase, UploadPhase::Done);
        assert_eq!(state.recognized_text, "x");
        assert_eq!(state.segments, segments);
        assert!(!state.is_processing);
    }

    #[test]
    fn test_failure_cycle_clears_segments() {
        let mut state = UploadState::new();
        let first = state.select_image("a".into());
        state.begin_processing(first, RacePolicy::DropStale);
        state.finish_success(first, "o".into(), vec![DisplaySegment::highlighted("ට")], RacePolicy::DropStale);

        let second = state.select_image("b".into());
        state.begin_processing(second, RacePolicy::DropStale);
        assert!(state.finish_failure(second, RacePolicy::DropStale));
        assert_eq!(state.phase, UploadPhase::Failed);
        assert_eq!(state.recognized_text, ERROR_TEXT);
        assert!(state.segments.is_empty());
        assert!(!state.is_processing);
    }

    #[test]
    fn test_stale_completion_dropped() {
        let mut state = UploadState::new();
        let first = state.select_image("a".into());
        state.begin_processing(first, RacePolicy::DropStale);
        let second = state.select_image("b".into());
        state.begin_processing(second, RacePolicy::DropStale);

        assert!(!state.finish_success(first, "old".into(), vec![], RacePolicy::DropStale));
        assert_eq!(state.recognized_text, PROCESSING_TEXT);
        assert!(state.is_processing);

        assert!(state.finish_success(second, "new".into(), vec![], RacePolicy::DropStale));
        assert_eq!(state.recognized_text, "new");
    }

    #[test]
    fn test_last_write_wins() {
        let mut state = UploadState::new();
        let first = state.select_image("a".into());
        state.begin_processing(first, RacePolicy::LastWriteWins);
        let second = state.select_image("b".into());
        state.begin_processing(second, RacePolicy::LastWriteWins);

        assert!(state.finish_success(second, "new".into(), vec![], RacePolicy::LastWriteWins));
        assert!(state.finish_success(first, "old".into(), vec![], RacePolicy::LastWriteWins));
        assert_eq!(state.recognized_text, "old");
        assert_eq!(state.preview.as_deref(), Some("b"));
    }

    #[test]
    fn test_display_segments() {
        let mut state = UploadState::new();
        assert_eq!(crate::annotator::joined_text(&state.display_segments()), INITIAL_TEXT);

        let ticket = state.select_image("a".into());
        assert!(state.display_segments().is_empty());
        state.begin_processing(ticket, RacePolicy::DropStale);
        assert!(state.display_segments().is_empty());

        state.finish_failure(ticket, RacePolicy::DropStale);
        let shown = state.display_segments();
        assert_eq!(crate::annotator::joined_text(&shown), ERROR_TEXT);
        assert!(shown.iter().all(|s| !s.highlighted));

        let ticket = state.select_image("b".into());
        state.begin_processing(ticket, RacePolicy::DropStale);
        state.finish_success(ticket, "o".into(), vec![DisplaySegment::highlighted("ට")], RacePolicy::DropStale);
        assert_eq!(state.display_segments(), vec![DisplaySegment::highlighted("ට")]);
    }

    #[test]
    fn test_processing_text_not_in_result_area() {
        let mut state = UploadState::new();
        let first = state.select_image("a".into());
        state.begin_processing(first, RacePolicy::DropStale);
        let segments = vec![DisplaySegment::highlighted("ල"), DisplaySegment::plain('a')];
        state.finish_success(first, "Ta".into(), segments, RacePolicy::DropStale);

        // 再選択中は前回結果も処理中テキストも結果欄に出さない
        let second = state.select_image("b".into());
        state.begin_processing(second, RacePolicy::DropStale);
        assert!(state.is_processing);
        assert_eq!(state.recognized_text, PROCESSING_TEXT);
        assert!(state.display_segments().is_empty());
    }

    #[test]
    fn test_can_transition_to() {
        assert!(UploadPhase::Idle.can_transition_to(UploadPhase::Previewing));
        assert!(UploadPhase::Done.can_transition_to(UploadPhase::Previewing));
        assert!(UploadPhase::Failed.can_transition_to(UploadPhase::Previewing));
        assert!(!UploadPhase::Idle.can_transition_to(UploadPhase::Done));
        assert!(!UploadPhase::Done.can_transition_to(UploadPhase::Idle));
        assert!(!UploadPhase::Previewing.can_transition_to(UploadPhase::Done));
    }

    #[test]
    fn test_ticket_generation_increases() {
        let mut state = UploadState::new();
        let a = state.select_image("a".into());
        let b = state.select_image("b".into());
        assert!(b > a);
        assert_eq!(b.generation(), state.generation());
        assert!(!state.is_current(a));
    }

    #[test]
    fn test_race_policy_from_str() {
        assert_eq!("lww".parse::<RacePolicy>().unwrap(), RacePolicy::LastWriteWins);
        assert_eq!("drop-stale".parse::<RacePolicy>().unwrap(), RacePolicy::DropStale);
        assert!("x".parse::<RacePolicy>().is_err());
    }

    #[test]
    fn test_state_serialization_skips_generation() {
        let mut state = UploadState::new();
        state.select_image("p.png".into());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["phase"], "previewing");
        assert_eq!(json["recognizedText"], INITIAL_TEXT);
        assert!(json.get("generation").is_none());
    }
}
