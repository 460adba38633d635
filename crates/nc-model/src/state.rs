//! Machine state carried from line to line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nc_common::format_numeric;

use crate::column::{ColumnRole, TOOL_COLUMN};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct StateEntry {
    pub role: ColumnRole,
    pub value: Value,
}

/// Current value of every column, keyed by axis name, group short name or
/// other column identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineState {
    entries: BTreeMap<String, StateEntry>,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id).map(|e| &e.value)
    }

    pub fn entry(&self, id: &str) -> Option<&StateEntry> {
        self.entries.get(id)
    }

    pub fn role(&self, id: &str) -> Option<ColumnRole> {
        self.entries.get(id).map(|e| e.role)
    }

    pub fn set(&mut self, id: impl Into<String>, role: ColumnRole, value: Value) {
        self.entries.insert(id.into(), StateEntry { role, value });
    }

    /// Drops every value that is only valid for the line that set it.
    pub fn clear_line_local(&mut self) {
        self.entries.retain(|_, entry| entry.role.persists());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Immutable view of the persistent part of the state.
    pub fn to_final(&self) -> FinalState {
        let mut state = FinalState::default();
        for (id, entry) in &self.entries {
            match (entry.role, &entry.value) {
                (ColumnRole::Axis, value) => {
                    if let Some(v) = value.as_f64() {
                        state.axes.insert(id.clone(), v);
                    }
                }
                (ColumnRole::ModalGroup, value) => {
                    state.groups.insert(id.clone(), value.render());
                }
                (ColumnRole::Tool, value) => state.tool = Some(value.render()),
                (ColumnRole::Unknown, value) => {
                    state.extra.insert(id.clone(), value.clone());
                }
                _ => {}
            }
        }
        state
    }
}

/// The persistent machine state at the end of a program.
///
/// Serializes as a nested mapping:
/// `{"axes": {"X": 10.0}, "groups": {"GG01_motion": "G1"}, "tool": "5", "extra": {}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    pub axes: BTreeMap<String, f64>,
    /// Active code per modal group, as written in the program.
    pub groups: BTreeMap<String, String>,
    pub tool: Option<String>,
    /// Columns that are neither axes nor groups.
    pub extra: BTreeMap<String, Value>,
}

impl FinalState {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
            && self.groups.is_empty()
            && self.tool.is_none()
            && self.extra.is_empty()
    }

    /// Renders the state as program text.
    ///
    /// Interpreting the returned text as an initial state reproduces this
    /// state exactly.
    pub fn to_program(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if !self.groups.is_empty() {
            lines.push(self.groups.values().cloned().collect::<Vec<_>>().join(" "));
        }

        if !self.axes.is_empty() {
            let words: Vec<String> = self
                .axes
                .iter()
                .map(|(axis, v)| format!("{axis}={}", format_numeric(*v)))
                .collect();
            lines.push(words.join(" "));
        }

        let mut words: Vec<String> = Vec::new();
        if let Some(tool) = &self.tool {
            words.push(format!("{TOOL_COLUMN}=\"{tool}\""));
        }
        for (id, value) in &self.extra {
            match value {
                Value::Int(_) | Value::Float(_) => words.push(format!("{id}={}", value.render())),
                Value::Text(text) => words.push(format!("{id}=\"{text}\"")),
                Value::TextList(_) => {}
            }
        }
        if !words.is_empty() {
            lines.push(words.join(" "));
        }

        let mut program = lines.join("\n");
        if !program.is_empty() {
            program.push('\n');
        }
        program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clears_only_line_local_values() {
        let mut state = MachineState::new();
        state.set("X", ColumnRole::Axis, Value::Float(1.0));
        state.set("GG02", ColumnRole::NonModalGroup, Value::from("G4"));
        state.set("M", ColumnRole::Directives, Value::TextList(vec!["M3".into()]));
        state.set("T", ColumnRole::Tool, Value::from("5"));

        state.clear_line_local();

        assert_eq!(state.len(), 2);
        assert_eq!(state.get("X"), Some(&Value::Float(1.0)));
        assert!(state.get("GG02").is_none());
        assert!(state.get("M").is_none());
        assert_eq!(state.role("T"), Some(ColumnRole::Tool));
    }

    #[test]
    fn final_state_sections() {
        let mut state = MachineState::new();
        state.set("X", ColumnRole::Axis, Value::Float(10.0));
        state.set("GG01_motion", ColumnRole::ModalGroup, Value::from("G01"));
        state.set("T", ColumnRole::Tool, Value::from("DRILL"));
        state.set("R1", ColumnRole::Unknown, Value::Float(2.5));
        state.set("N", ColumnRole::BlockNumber, Value::Int(10));

        let final_state = state.to_final();

        assert_eq!(final_state.axes.get("X"), Some(&10.0));
        assert_eq!(final_state.groups.get("GG01_motion").map(String::as_str), Some("G01"));
        assert_eq!(final_state.tool.as_deref(), Some("DRILL"));
        assert_eq!(final_state.extra.get("R1"), Some(&Value::Float(2.5)));
        assert!(!final_state.extra.contains_key("N"));
    }

    #[test]
    fn renders_program() {
        let mut final_state = FinalState::default();
        final_state.axes.insert("X".into(), 10.0);
        final_state.axes.insert("Y".into(), -0.5);
        final_state.groups.insert("GG01_motion".into(), "G01".into());
        final_state.tool = Some("5".into());
        final_state.extra.insert("NAME".into(), Value::from("part a"));

        assert_eq!(
            final_state.to_program(),
            "G01\nX=10 Y=-0.5\nT=\"5\" NAME=\"part a\"\n"
        );
    }

    #[test]
    fn empty_state_renders_empty_program() {
        assert_eq!(FinalState::default().to_program(), "");
        assert!(FinalState::default().is_empty());
    }
}
