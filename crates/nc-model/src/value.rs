//! Cell values.

use serde::{Deserialize, Serialize};

use nc_common::format_numeric;

/// A value held by one column of the machine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
}

impl Value {
    /// Numeric view of the value; text and lists have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) | Self::TextList(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Renders the value as a plain string (lists are space-joined).
    pub fn render(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format_numeric(*v),
            Self::Text(s) => s.clone(),
            Self::TextList(items) => items.join(" "),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_values() {
        assert_eq!(Value::Float(10.0).render(), "10");
        assert_eq!(Value::Float(-0.25).render(), "-0.25");
        assert_eq!(Value::Int(20).render(), "20");
        assert_eq!(Value::from("G01").render(), "G01");
        assert_eq!(
            Value::TextList(vec!["M3".into(), "M8".into()]).render(),
            "M3 M8"
        );
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::from("5").as_f64(), None);
        assert!(Value::from("5").is_text());
    }
}
