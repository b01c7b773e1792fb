//! Lookup table from raw gateway messages to localized explanations

use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// Errors that can occur while loading the error table
#[derive(Error, Debug)]
pub enum ErrorTableError {
    #[error("Failed to read error table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid error table format: {0}")]
    Format(#[from] serde_json::Error),
}

/// A single known gateway failure message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCodeEntry {
    #[serde(rename = "ret_code", alias = "code")]
    pub code: String,
    /// Exact decoded `msg` text as sent by the gateway
    #[serde(rename = "raw_info")]
    pub raw_pattern: String,
    #[serde(rename = "info_zh")]
    pub localized_message: String,
    #[serde(rename = "info_en")]
    pub english_message: String,
}

/// Ordered, read-only list of [`ErrorCodeEntry`] records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTable {
    entries: Vec<ErrorCodeEntry>,
}

impl ErrorTable {
    /// Create a table from entries, keeping their order
    pub fn new(entries: Vec<ErrorCodeEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of `{ret_code, raw_info, info_zh, info_en}` records
    pub fn from_json_slice(data: &[u8]) -> Result<Self, ErrorTableError> {
        Ok(Self::new(serde_json::from_slice(data)?))
    }

    /// Read a JSON array of records from a reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ErrorTableError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_json_slice(&data)
    }

    /// Find the first entry whose raw pattern equals `message` exactly
    pub fn lookup(&self, message: &str) -> Option<&ErrorCodeEntry> {
        self.entries.iter().find(|e| e.raw_pattern == message)
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

    const SAMPLE: &str = r#"[
        {"ret_code":"1","raw_info":"userid error1","info_zh":"账号不存在","info_en":"Account does not exist"},
        {"ret_code":"1","raw_info":"ldap auth error","info_zh":"密码错误","info_en":"Wrong password"},
        {"ret_code":"1","raw_info":"userid error1","info_zh":"重复条目","info_en":"Duplicate entry"}
    ]"#;

    #[test]
    fn test_parse_preserves_order() {
        let table = ErrorTable::from_json_slice(SAMPLE.as_bytes()).expect("parse failed");
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.lookup("ldap auth error").map(|e| e.english_message.as_str()),
            Some("Wrong password")
        );
    }

    #[test]
    fn test_first_match_wins() {
        let table = ErrorTable::from_reader(SAMPLE.as_bytes()).expect("parse failed");
        let entry = table.lookup("userid error1").expect("entry missing");
        assert_eq!(entry.localized_message, "账号不存在");
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = ErrorTable::from_json_slice(SAMPLE.as_bytes()).expect("parse failed");
        assert!(table.lookup("userid error").is_none());
        assert!(table.lookup("USERID ERROR1").is_none());
        assert!(table.lookup(" userid error1").is_none());
    }

    #[test]
    fn test_accepts_code_field_name() {
        let table = ErrorTable::from_json_slice(
            r#"[{"code":"1","raw_info":"ldap auth error","info_zh":"密码错误","info_en":"Wrong password"}]"#
                .as_bytes(),
        )
        .expect("parse failed");
        let entry = table.lookup("ldap auth error").expect("entry missing");
        assert_eq!(entry.code, "1");
    }

    #[test]
    fn test_empty_table() {
        let table = ErrorTable::default();
        assert!(table.is_empty());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_rejects_non_array() {
        let result = ErrorTable::from_json_slice(br#"{"ret_code":"1"}"#);
        assert!(matches!(result, Err(ErrorTableError::Format(_))));
    }
}
