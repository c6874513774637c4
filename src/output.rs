//! 結果出力（端末 / JSON / HTML）

use crate::cli::OutputFormat;
use crate::error::Result;
use palm_leaf_ocr_common::{
    render_html_page, DisplaySegment, SubstitutionTable, UploadPhase, UploadState,
};
use serde::Serialize;
use std::io::Write;

pub const PAGE_TITLE: &str = "Palm-leaf Manuscript OCR";

const ANSI_HIGHLIGHT: &str = "\x1b[1;31m";
const ANSI_RESET: &str = "\x1b[0m";

/// 1ファイル分の出力
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub phase: UploadPhase,
    pub recognized_text: String,
    pub highlighted: usize,
    pub segments: Vec<DisplaySegment>,
    #[serde(skip)]
    display: Vec<DisplaySegment>,
}

impl FileReport {
    pub fn new(file: impl Into<String>, state: &UploadState) -> Self {
        Self {
            file: file.into(),
            phase: state.phase,
            recognized_text: state.recognized_text.clone(),
            highlighted: state.segments.iter().filter(|s| s.highlighted).count(),
            segments: state.segments.clone(),
            display: state.display_segments(),
        }
    }

    /// 表示するセグメント（失敗時は固定メッセージ）
    pub fn display_segments(&self) -> &[DisplaySegment] {
        &self.display
    }
}

/// 端末向け: ハイライトを赤・太字で表示
pub fn render_terminal(segments: &[DisplaySegment], color: bool) -> String {
    let mut out = String::new();
    for seg in segments {
        if seg.highlighted && color {
            out.push_str(ANSI_HIGHLIGHT);
            out.push_str(&seg.text);
            out.push_str(ANSI_RESET);
        } else {
            out.push_str(&seg.text);
        }
    }
    out
}

pub fn render_reports(reports: &[FileReport], format: OutputFormat, color: bool) -> Result<String> {
    let rendered = match format {
        OutputFormat::Text => reports
            .iter()
            .map(|r| {
                format!(
                    "📜 {}\nExtracted Text:\n{}\n",
                    r.file,
                    render_terminal(r.display_segments(), color)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(reports)? + "\n",
        OutputFormat::Html => {
            let sections: Vec<(String, Vec<DisplaySegment>)> = reports
                .iter()
                .map(|r| (r.file.clone(), r.display_segments().to_vec()))
                .collect();
            render_html_page(PAGE_TITLE, &sections)
        }
    };
    Ok(rendered)
}

pub fn render_table(table: &SubstitutionTable, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(table)? + "\n");
    }

    let mut out = String::new();
    for (key, value) in table.iter() {
        let note = if key.chars().count() > 1 { "  (複数文字キー)" } else { "" };
        out.push_str(&format!("{key}\t→\t{value}{note}\n"));
    }
    Ok(out)
}

/// 標準出力へ書き出す（保存はリダイレクトに任せる）
pub fn emit(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use palm_leaf_ocr_common::ERROR_TEXT;

    fn done_state(text: &str) -> UploadState {
        let mut state = UploadState::new();
        let ticket = state.select_image("leaf.png".into());
        state.begin_processing(ticket, Default::default());
        let segments = palm_leaf_ocr_common::annotate(text, SubstitutionTable::palm_leaf());
        state.finish_success(ticket, text.to_string(), segments, Default::default());
        state
    }

    #[test]
    fn test_render_terminal() {
        let segments = vec![DisplaySegment::plain('x'), DisplaySegment::highlighted("අ")];
        assert_eq!(render_terminal(&segments, false), "xඅ");
        assert_eq!(render_terminal(&segments, true), "x\x1b[1;31mඅ\x1b[0m");
    }

    #[test]
    fn test_file_report() {
        let report = FileReport::new("leaf.png", &done_state("Tx"));
        assert_eq!(report.phase, UploadPhase::Done);
        assert_eq!(report.recognized_text, "Tx");
        assert_eq!(report.highlighted, 1);
        assert_eq!(report.segments.len(), 2);
    }

    #[test]
    fn test_render_json() {
        let reports = vec![FileReport::new("leaf.png", &done_state("o"))];
        let json = render_reports(&reports, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["file"], "leaf.png");
        assert_eq!(value[0]["phase"], "done");
        assert_eq!(value[0]["recognizedText"], "o");
        assert_eq!(value[0]["segments"][0]["text"], "ට");
        assert_eq!(value[0]["segments"][0]["highlighted"], true);
    }

    #[test]
    fn test_render_failed_text_shows_error_message() {
        let mut state = UploadState::new();
        let ticket = state.select_image("bad.png".into());
        state.begin_processing(ticket, Default::default());
        state.finish_failure(ticket, Default::default());

        let reports = vec![FileReport::new("bad.png", &state)];
        let text = render_reports(&reports, OutputFormat::Text, true).unwrap();
        assert!(text.contains("bad.png"));
        assert!(text.contains(ERROR_TEXT));
        assert!(!text.contains(ANSI_HIGHLIGHT));
    }

    #[test]
    fn test_render_html() {
        let reports = vec![FileReport::new("leaf.png", &done_state("a<"))];
        let html = render_reports(&reports, OutputFormat::Html, false).unwrap();
        assert!(html.contains(PAGE_TITLE));
        assert!(html.contains(r#"<span style="color: red; font-weight: bold">ප</span>"#));
        assert!(html.contains("<span>&lt;</span>"));
    }

    #[test]
    fn test_render_table() {
        let text = render_table(SubstitutionTable::palm_leaf(), false).unwrap();
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("ඉං\t→\tඉමo  (複数文字キー)"));

        let json = render_table(SubstitutionTable::palm_leaf(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["?"], "අ");
    }
}
