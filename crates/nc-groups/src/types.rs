//! G-group definitions.

use serde::{Deserialize, Serialize};

/// Whether a group's selection persists across blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effectiveness {
    /// Selected code stays active until another code of the same group.
    Modal,
    /// Code applies to the block it is written in only.
    NonModal,
}

impl Effectiveness {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "modal" => Some(Self::Modal),
            "non-modal" | "nonmodal" | "non_modal" => Some(Self::NonModal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::NonModal => "non-modal",
        }
    }
}

impl std::fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One code of a group, e.g. `G1` in the motion group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GGroupEntry {
    pub id: String,
    pub nr: u32,
    pub description: String,
}

/// A set of mutually exclusive codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GGroup {
    pub nr: u32,
    pub title: String,
    pub effectiveness: Effectiveness,
    /// Column identifier used for this group in converted tables.
    pub short_name: String,
    pub entries: Vec<GGroupEntry>,
}

impl GGroup {
    pub fn is_modal(&self) -> bool {
        self.effectiveness == Effectiveness::Modal
    }

    /// Returns the entry for a code token, if it belongs to this group.
    pub fn entry(&self, code: &str) -> Option<&GGroupEntry> {
        let key = normalize_code(code);
        self.entries.iter().find(|e| normalize_code(&e.id) == key)
    }
}

/// Canonical lookup key for a code token.
///
/// Codes compare case-insensitively, and the numeric part of a `G` code
/// ignores leading zeros (`G01` and `g1` are the same code).
pub fn normalize_code(code: &str) -> String {
    let upper = code.trim().to_ascii_uppercase();
    if let Some(digits) = upper.strip_prefix('G') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let trimmed = digits.trim_start_matches('0');
            let number = if trimmed.is_empty() { "0" } else { trimmed };
            return format!("G{number}");
        }
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_g_codes() {
        assert_eq!(normalize_code("G01"), "G1");
        assert_eq!(normalize_code("g00"), "G0");
        assert_eq!(normalize_code("G0"), "G0");
        assert_eq!(normalize_code("G641"), "G641");
        assert_eq!(normalize_code("cfc"), "CFC");
        assert_eq!(normalize_code("GOTOB"), "GOTOB");
    }

    #[test]
    fn parses_effectiveness() {
        assert_eq!(Effectiveness::parse("modal"), Some(Effectiveness::Modal));
        assert_eq!(
            Effectiveness::parse(" Non-Modal "),
            Some(Effectiveness::NonModal)
        );
        assert_eq!(Effectiveness::parse("sometimes"), None);
    }

    #[test]
    fn effectiveness_serializes_kebab_case() {
        let json = serde_json::to_string(&Effectiveness::NonModal).unwrap();
        assert_eq!(json, "\"non-modal\"");
    }
}
