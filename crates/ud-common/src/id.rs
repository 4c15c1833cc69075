//! Identifiers for correlating one evaluation's output with its logs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a single CLI evaluation.
///
/// Format: `ud-YYYYMMDD-HHMMSS-XXXX`
/// Example: `ud-20260115-143022-a7xq`
///
/// Ids are never stored; they only tie a payload on stdout to the log
/// lines written for it on stderr.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EvaluationId(pub String);

impl EvaluationId {
    /// Generate a new id from the current time and a random suffix.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        EvaluationId(format!(
            "ud-{}-{}-{}",
            now.format("%Y%m%d"),
            now.format("%H%M%S"),
            base32_suffix()
        ))
    }

    /// Parse an existing id string.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 23 {
            return None;
        }
        let bytes = s.as_bytes();
        if !s.starts_with("ud-") || bytes[11] != b'-' || bytes[18] != b'-' {
            return None;
        }
        let date = &s[3..11];
        let time = &s[12..18];
        let suffix = &s[19..23];
        if !date.chars().all(|c| c.is_ascii_digit()) || !time.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c))
        {
            return None;
        }
        Some(EvaluationId(s.to_string()))
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four base32 characters (20 random bits) taken from a v4 UUID.
fn base32_suffix() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    let value =
        (((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32)) & 0x000F_FFFF;
    let alphabet = b"abcdefghijklmnopqrstuvwxyz234567";
    [15_u32, 10, 5, 0]
        .iter()
        .map(|shift| alphabet[((value >> shift) & 0x1F) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_has_expected_shape() {
        let id = EvaluationId::new();
        assert!(id.0.starts_with("ud-"));
        assert_eq!(id.0.len(), 23);
    }

    #[test]
    fn new_id_parses() {
        let id = EvaluationId::new();
        assert_eq!(EvaluationId::parse(&id.0), Some(id));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(EvaluationId::parse("").is_none());
        assert!(EvaluationId::parse("uu-20260115-143022-a7xq").is_none());
        assert!(EvaluationId::parse("ud-2026011x-143022-a7xq").is_none());
        assert!(EvaluationId::parse("ud-20260115-143022-A7XQ").is_none());
        assert!(EvaluationId::parse("ud-20260115-143022-a7x1").is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EvaluationId("ud-20260115-143022-a7xq".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ud-20260115-143022-a7xq\"");
    }
}
