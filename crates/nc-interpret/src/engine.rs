//! Line-by-line interpretation of a program into a table.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use nc_groups::GGroupRegistry;
use nc_model::{ConvertOptions, FinalState, MalformedLinePolicy, RESERVED_COLUMNS};

use crate::error::{ConvertError, Result, Source};
use crate::table::assemble;
use crate::tokenizer::{WordError, tokenize_line};
use crate::tracker::{Row, Tracker};

/// Result of a forward conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// One row per interpreted line, in program order.
    pub table: DataFrame,
    /// Persistent machine state after the last line.
    pub state: FinalState,
    /// Lines dropped under [`MalformedLinePolicy::Skip`].
    pub skipped: Vec<SkippedLine>,
}

/// A malformed line that was skipped instead of aborting the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub origin: Source,
    pub line_no: usize,
    pub column: usize,
    pub token: String,
    pub message: String,
}

/// Converts program text into a table of machine-state snapshots.
///
/// The `initial_state` program of `options`, if any, is interpreted first; it
/// seeds the state but contributes no rows.
///
/// # Errors
///
/// - [`ConvertError::InvalidInput`] if `input` is `None` or the iteration
///   limit is zero; nothing is interpreted in that case.
/// - [`ConvertError::UnknownAxisConfiguration`] for an unusable axis list.
/// - [`ConvertError::MalformedLine`] for the first malformed line, unless
///   malformed lines are skipped.
/// - [`ConvertError::IterationLimitExceeded`] when the program would produce
///   more rows than the limit; the error carries the rows produced so far.
pub fn nc_to_dataframe(
    input: Option<&str>,
    options: &ConvertOptions,
    registry: &GGroupRegistry,
) -> Result<Conversion> {
    let Some(program) = input else {
        return Err(ConvertError::InvalidInput(
            "program text is missing".to_string(),
        ));
    };
    if options.iteration_limit == 0 {
        return Err(ConvertError::InvalidInput(
            "iteration limit must be at least 1".to_string(),
        ));
    }
    let axes = validate_axes(options.resolved_axes(), registry)?;

    let span = info_span!("convert", axes = axes.len(), limit = options.iteration_limit);
    let _guard = span.enter();

    let mut interpreter = Interpreter {
        tracker: Tracker::new(registry, &axes),
        registry,
        axes: &axes,
        options,
        skipped: Vec::new(),
    };

    if let Some(initial_state) = &options.initial_state {
        interpreter.run(initial_state, Source::InitialState)?;
        debug!(
            entries = interpreter.tracker.state().len(),
            "applied initial state"
        );
    }
    let rows = interpreter.run(program, Source::Program)?;
    let conversion = interpreter.finish(&rows)?;

    info!(
        rows = conversion.table.height(),
        columns = conversion.table.width(),
        skipped = conversion.skipped.len(),
        "converted program"
    );
    Ok(conversion)
}

struct Interpreter<'a> {
    tracker: Tracker<'a>,
    registry: &'a GGroupRegistry,
    axes: &'a [String],
    options: &'a ConvertOptions,
    skipped: Vec<SkippedLine>,
}

impl Interpreter<'_> {
    fn run(&mut self, text: &str, origin: Source) -> Result<Vec<Row>> {
        let limit = self.options.iteration_limit;
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let tokenized = match tokenize_line(line) {
                Ok(tokenized) => tokenized,
                Err(err) => {
                    self.malformed(origin, line_no, err)?;
                    continue;
                }
            };
            if tokenized.is_empty() {
                continue;
            }
            let resolved = match self.tracker.resolve_line(&tokenized) {
                Ok(resolved) => resolved,
                Err(err) => {
                    self.malformed(origin, line_no, err)?;
                    continue;
                }
            };
            if rows.len() == limit {
                warn!(%origin, limit, line_no, "iteration limit reached");
                return Err(self.limit_exceeded(origin, line_no, &rows));
            }
            rows.push(self.tracker.commit(line_no, resolved));
        }
        debug!(%origin, rows = rows.len(), "interpreted program text");
        Ok(rows)
    }

    fn malformed(&mut self, origin: Source, line_no: usize, err: WordError) -> Result<()> {
        match self.options.on_malformed {
            MalformedLinePolicy::Abort => Err(ConvertError::MalformedLine {
                origin,
                line_no,
                column: err.column,
                token: err.token,
                message: err.message,
            }),
            MalformedLinePolicy::Skip => {
                warn!(
                    %origin,
                    line_no,
                    column = err.column,
                    token = %err.token,
                    "skipping malformed line: {}",
                    err.message
                );
                self.skipped.push(SkippedLine {
                    origin,
                    line_no,
                    column: err.column,
                    token: err.token,
                    message: err.message,
                });
                Ok(())
            }
        }
    }

    fn limit_exceeded(&self, origin: Source, line_no: usize, rows: &[Row]) -> ConvertError {
        let limit = self.options.iteration_limit;
        // Rows of the initial state program are never part of the table.
        let rows = match origin {
            Source::Program => rows,
            Source::InitialState => &[],
        };
        match self.conversion(rows) {
            Ok(partial) => ConvertError::IterationLimitExceeded {
                limit,
                line_no,
                partial: Box::new(partial),
            },
            Err(err) => err,
        }
    }

    fn conversion(&self, rows: &[Row]) -> Result<Conversion> {
        let table = assemble(
            rows,
            self.registry,
            self.axes,
            !self.options.disable_forward_fill,
        )?;
        Ok(Conversion {
            table,
            state: self.tracker.state().to_final(),
            skipped: self.skipped.clone(),
        })
    }

    fn finish(self, rows: &[Row]) -> Result<Conversion> {
        let mut conversion = self.conversion(rows)?;
        conversion.skipped = self.skipped;
        Ok(conversion)
    }
}

/// Checks the effective axis list and returns it.
fn validate_axes(axes: Vec<String>, registry: &GGroupRegistry) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    for axis in &axes {
        let reason = if axis.is_empty() {
            Some("axis identifier is empty".to_string())
        } else if !is_identifier(axis) {
            Some("axis identifier must be a plain identifier".to_string())
        } else if !seen.insert(axis.to_ascii_uppercase()) {
            Some("axis is listed more than once".to_string())
        } else if RESERVED_COLUMNS
            .iter()
            .chain(&["G"])
            .any(|reserved| reserved.eq_ignore_ascii_case(axis))
        {
            Some("identifier is reserved".to_string())
        } else if registry
            .groups()
            .iter()
            .any(|group| group.short_name.eq_ignore_ascii_case(axis))
        {
            Some("identifier is the short name of a G group".to_string())
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConvertError::UnknownAxisConfiguration {
                axis: axis.clone(),
                reason,
            });
        }
    }
    Ok(axes)
}

fn is_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
