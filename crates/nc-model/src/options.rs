//! Configuration options for forward and reverse conversion.

use serde::{Deserialize, Serialize};

/// Axis identifiers used when no explicit set is configured.
pub const DEFAULT_AXIS_IDENTIFIERS: &[&str] = &[
    "X", "Y", "Z", "A", "B", "C", "D", "E", "F", "S", "U", "V", "RA1", "RA2", "RA3", "RA4",
    "RA5", "RA6",
];

/// Maximum number of rows a single conversion may produce.
pub const DEFAULT_ITERATION_LIMIT: usize = 10_000;

/// Decimal places used when writing numeric values.
pub const DEFAULT_PRECISION: usize = 3;

/// What to do with a line the tokenizer cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedLinePolicy {
    /// Stop the conversion with an error.
    #[default]
    Abort,
    /// Log the line, record it, and continue with the next one.
    Skip,
}

/// Options controlling program to table conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Program text interpreted before the main program to seed the state.
    /// It produces no rows.
    pub initial_state: Option<String>,

    /// Axis identifiers. `None` selects [`DEFAULT_AXIS_IDENTIFIERS`].
    pub axis_identifiers: Option<Vec<String>>,

    /// Additional axes appended after the configured set.
    pub extra_axes: Vec<String>,

    /// Upper bound on emitted rows.
    pub iteration_limit: usize,

    /// Leave cells empty unless the line defines them explicitly.
    pub disable_forward_fill: bool,

    pub on_malformed: MalformedLinePolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            initial_state: None,
            axis_identifiers: None,
            extra_axes: Vec::new(),
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            disable_forward_fill: false,
            on_malformed: MalformedLinePolicy::Abort,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_state(mut self, program: impl Into<String>) -> Self {
        self.initial_state = Some(program.into());
        self
    }

    pub fn with_axes<I, S>(mut self, axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.axis_identifiers = Some(axes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_extra_axes<I, S>(mut self, axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_axes = axes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    pub fn with_forward_fill(mut self, enabled: bool) -> Self {
        self.disable_forward_fill = !enabled;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// The effective axis list: configured (or default) axes followed by
    /// the extra axes, in order. Duplicates are kept so that callers can
    /// report them.
    pub fn resolved_axes(&self) -> Vec<String> {
        let mut axes: Vec<String> = match &self.axis_identifiers {
            Some(axes) => axes.clone(),
            None => DEFAULT_AXIS_IDENTIFIERS
                .iter()
                .map(|axis| (*axis).to_string())
                .collect(),
        };
        axes.extend(self.extra_axes.iter().cloned());
        axes
    }
}

/// Options controlling table to program conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseOptions {
    /// Decimal places for numeric values.
    pub precision: usize,

    /// Omit numeric and modal values equal to the last emitted value.
    pub suppress_unchanged: bool,

    /// Drop the comment column from the output.
    pub ignore_comments: bool,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            suppress_unchanged: true,
            ignore_comments: false,
        }
    }
}

impl ReverseOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_suppress_unchanged(mut self, enabled: bool) -> Self {
        self.suppress_unchanged = enabled;
        self
    }

    pub fn with_ignore_comments(mut self, ignore: bool) -> Self {
        self.ignore_comments = ignore;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_axes_exclude_block_number() {
        let axes = ConvertOptions::default().resolved_axes();
        assert_eq!(axes.len(), 18);
        assert!(!axes.iter().any(|a| a == "N"));
        assert_eq!(axes.first().map(String::as_str), Some("X"));
        assert_eq!(axes.last().map(String::as_str), Some("RA6"));
    }

    #[test]
    fn extra_axes_are_appended() {
        let options = ConvertOptions::new()
            .with_axes(["X", "Y"])
            .with_extra_axes(["W"]);
        assert_eq!(options.resolved_axes(), vec!["X", "Y", "W"]);
    }

    #[test]
    fn builder_sets_fields() {
        let options = ConvertOptions::new()
            .with_initial_state("G90")
            .with_iteration_limit(5)
            .with_forward_fill(false)
            .with_malformed_policy(MalformedLinePolicy::Skip);
        assert_eq!(options.initial_state.as_deref(), Some("G90"));
        assert_eq!(options.iteration_limit, 5);
        assert!(options.disable_forward_fill);
        assert_eq!(options.on_malformed, MalformedLinePolicy::Skip);
    }

    #[test]
    fn reverse_defaults() {
        let options = ReverseOptions::default();
        assert_eq!(options.precision, 3);
        assert!(options.suppress_unchanged);
        assert!(!options.ignore_comments);
    }
}
