//! 置換テーブル
//!
//! OCRが誤認識しやすい文字を、表示用の置換文字に対応付ける固定テーブル。
//! 一度構築したら変更しない。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// 組み込みテーブル（貝葉写本向け）
const PALM_LEAF_ENTRIES: &[(&str, &str)] = &[
    ("?", "අ"),
    ("_", "ක"),
    ("o", "ට"),
    ("0", "ෆ"),
    ("a", "ප"),
    ("T", "ල"),
    ("8", "ප"),
    ("ඉං", "ඉමo"),
    ("॥", "ට"),
];

/// 置換テーブル
///
/// キーは大文字小文字を区別した完全一致で引く。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionTable {
    entries: BTreeMap<String, String>,
}

impl SubstitutionTable {
    /// 組み込みテーブル（プロセス内で一度だけ構築）
    pub fn palm_leaf() -> &'static SubstitutionTable {
        static TABLE: OnceLock<SubstitutionTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            Self::from_pairs(PALM_LEAF_ENTRIES.iter().copied())
                .unwrap_or_default()
        })
    }

    /// キーと値の組から構築（空キー・空値はエラー）
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entries = BTreeMap::new();
        for (key, value) in pairs {
            if key.is_empty() {
                return Err(Error::Table("empty key".into()));
            }
            if value.is_empty() {
                return Err(Error::Table(format!("empty value for key {key:?}")));
            }
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self { entries })
    }

    /// JSON文字列から読み込み（`{"key": "value", ...}`）
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        Self::from_pairs(raw.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 完全一致で置換値を取得
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// 1文字キーの検索
    pub fn get_char(&self, c: char) -> Option<&str> {
        let mut buf = [0u8; 4];
        self.get(c.encode_utf8(&mut buf))
    }

    /// 最長キーの文字数
    pub fn max_key_chars(&self) -> usize {
        self.entries
            .keys()
            .map(|k| k.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palm_leaf_table_contents() {
        let table = SubstitutionTable::palm_leaf();
        assert_eq!(table.len(), 9);
        assert_eq!(table.get("?"), Some("අ"));
        assert_eq!(table.get("T"), Some("ල"));
        assert_eq!(table.get("ඉං"), Some("ඉමo"));
        assert_eq!(table.get("t"), None);
    }

    #[test]
    fn test_get_char_is_case_sensitive() {
        let table = SubstitutionTable::palm_leaf();
        assert_eq!(table.get_char('a'), Some("ප"));
        assert_eq!(table.get_char('A'), None);
        assert_eq!(table.get_char('॥'), Some("ට"));
    }

    #[test]
    fn test_multi_char_keys() {
        let table = SubstitutionTable::palm_leaf();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).filter(|k| k.chars().count() > 1).collect();
        assert_eq!(keys, vec!["ඉං"]);
        assert_eq!(table.max_key_chars(), 2);
    }

    #[test]
    fn test_from_json() {
        let table = SubstitutionTable::from_json(r#"{"x": "ය", "yz": "ර"}"#).unwrap();
        assert_eq!(table.get("x"), Some("ය"));
        assert_eq!(table.get("yz"), Some("ර"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_empty_key() {
        let result = SubstitutionTable::from_json(r#"{"": "ය"}"#);
        assert!(matches!(result, Err(Error::Table(_))));
    }

    #[test]
    fn test_from_json_rejects_empty_value() {
        let result = SubstitutionTable::from_json(r#"{"x": ""}"#);
        assert!(matches!(result, Err(Error::Table(ref m)) if m.contains("\"x\"")));

        let result = SubstitutionTable::from_pairs([("o", "ට"), ("x", "")]);
        assert!(matches!(result, Err(Error::Table(_))));
    }

    #[test]
    fn test_from_json_invalid() {
        let result = SubstitutionTable::from_json("[1, 2]");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_serialize_as_plain_map() {
        let table = SubstitutionTable::from_pairs([("o", "ට")]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"o":"ට"}"#);
    }
}
