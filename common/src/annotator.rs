//! 認識テキストの注釈処理
//!
//! 認識結果を1文字ずつ置換テーブルと照合し、表示用セグメント列に変換する。
//! テーブルに一致した文字は置換値で表示し、ハイライトする。

use crate::table::SubstitutionTable;
use serde::{Deserialize, Serialize};

/// 表示セグメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySegment {
    pub text: String,
    pub highlighted: bool,
}

impl DisplaySegment {
    pub fn plain(c: char) -> Self {
        Self {
            text: c.to_string(),
            highlighted: false,
        }
    }

    pub fn highlighted(replacement: &str) -> Self {
        Self {
            text: replacement.to_string(),
            highlighted: true,
        }
    }
}

/// 照合モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// 1文字ずつ照合（複数文字キーは一致しない）
    #[default]
    SingleChar,
    /// 現在位置から最長のキーを優先して照合
    LongestPrefix,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single-char" | "single" | "char" => Ok(MatchMode::SingleChar),
            "longest-prefix" | "longest" | "prefix" => Ok(MatchMode::LongestPrefix),
            _ => Err(format!("Unknown match mode: {}. Use single-char or longest-prefix", s)),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::SingleChar => write!(f, "single-char"),
            MatchMode::LongestPrefix => write!(f, "longest-prefix"),
        }
    }
}

/// 1文字単位で注釈を付ける（入力1文字につき出力1セグメント）
pub fn annotate(text: &str, table: &SubstitutionTable) -> Vec<DisplaySegment> {
    text.chars()
        .map(|c| match table.get_char(c) {
            Some(replacement) => DisplaySegment::highlighted(replacement),
            None => DisplaySegment::plain(c),
        })
        .collect()
}

/// 照合モードを指定して注釈を付ける
pub fn annotate_with(text: &str, table: &SubstitutionTable, mode: MatchMode) -> Vec<DisplaySegment> {
    match mode {
        MatchMode::SingleChar => annotate(text, table),
        MatchMode::LongestPrefix => annotate_longest_prefix(text, table),
    }
}

fn annotate_longest_prefix(text: &str, table: &SubstitutionTable) -> Vec<DisplaySegment> {
    let max_chars = table.max_key_chars();
    // 各文字の開始バイト位置（末尾に全長を追加）
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    let char_count = bounds.len() - 1;

    let mut segments = Vec::with_capacity(char_count);
    let mut pos = 0;
    while pos < char_count {
        let longest = max_chars.min(char_count - pos);
        let hit = (1..=longest).rev().find_map(|len| {
            let key = &text[bounds[pos]..bounds[pos + len]];
            table.get(key).map(|replacement| (len, replacement))
        });

        match hit {
            Some((len, replacement)) => {
                segments.push(DisplaySegment::highlighted(replacement));
                pos += len;
            }
            None => {
                segments.push(DisplaySegment {
                    text: text[bounds[pos]..bounds[pos + 1]].to_string(),
                    highlighted: false,
                });
                pos += 1;
            }
        }
    }

    segments
}

/// セグメントのテキストを順に連結
#[cfg(test)]
pub(crate) fn joined_text(segments: &[DisplaySegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}
