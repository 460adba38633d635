//! Applies tokenized lines to the machine state.

use tracing::{debug, warn};

use nc_common::parse_i64;
use nc_groups::{GGroup, GGroupRegistry};
use nc_model::{
    BLOCK_NUMBER_COLUMN, COMMENT_COLUMN, ColumnRole, DIRECTIVES_COLUMN, FUNCTION_CALL_COLUMN,
    MAX_DIRECTIVES_PER_BLOCK, MachineState, RESERVED_COLUMNS, TOOL_COLUMN, Value,
    is_reserved_column,
};

use crate::expr::{EvalError, Expr};
use crate::tokenizer::{TokenizedLine, Word, WordError, WordValue};

/// Address letter of preparatory functions.
const G_ADDRESS: &str = "G";

/// The machine state after one processed line.
#[derive(Debug, Clone)]
pub struct Row {
    /// 1-based line number in the program.
    pub line_no: usize,
    /// Full state after the line, line-local values included.
    pub state: MachineState,
    /// Identifiers the line set explicitly, in the order their words appear.
    pub explicit: Vec<String>,
}

impl Row {
    pub fn is_explicit(&self, id: &str) -> bool {
        self.explicit.iter().any(|explicit| explicit == id)
    }
}

enum Update {
    Set {
        id: String,
        role: ColumnRole,
        value: Value,
    },
    Directive(String),
    Call(String),
}

/// A validated line whose updates have not touched the state yet.
pub struct ResolvedLine {
    updates: Vec<Update>,
    comment: Option<String>,
}

/// Owns the machine state for one conversion.
pub struct Tracker<'a> {
    registry: &'a GGroupRegistry,
    axes: &'a [String],
    state: MachineState,
}

impl<'a> Tracker<'a> {
    pub fn new(registry: &'a GGroupRegistry, axes: &'a [String]) -> Self {
        Self {
            registry,
            axes,
            state: MachineState::new(),
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn is_axis(&self, id: &str) -> bool {
        self.axes.iter().any(|axis| axis == id)
    }

    /// Applies one line and returns the resulting row.
    pub fn apply(&mut self, line_no: usize, line: &TokenizedLine) -> Result<Row, WordError> {
        let resolved = self.resolve_line(line)?;
        Ok(self.commit(line_no, resolved))
    }

    /// Resolves every word of `line` against the current state.
    ///
    /// Words are evaluated left to right, so an expression sees values
    /// assigned earlier on the same line. The state is not changed.
    pub fn resolve_line(&self, line: &TokenizedLine) -> Result<ResolvedLine, WordError> {
        let mut updates = Vec::with_capacity(line.words.len());
        let mut directive_count = 0;
        for word in &line.words {
            let update = self.resolve(word, &updates)?;
            if matches!(update, Update::Directive(_)) {
                directive_count += 1;
                if directive_count > MAX_DIRECTIVES_PER_BLOCK {
                    return Err(WordError::at(
                        word,
                        format!("more than {MAX_DIRECTIVES_PER_BLOCK} M functions in one block"),
                    ));
                }
            }
            updates.push(update);
        }
        Ok(ResolvedLine {
            updates,
            comment: line.comment.clone(),
        })
    }

    /// Writes a resolved line into the state and snapshots it.
    pub fn commit(&mut self, line_no: usize, line: ResolvedLine) -> Row {
        let mut explicit = Vec::new();
        let mut directives = Vec::new();
        let mut calls = Vec::new();
        for update in line.updates {
            match update {
                Update::Set { id, role, value } => self.set_explicit(&mut explicit, id, role, value),
                Update::Directive(code) => directives.push(code),
                Update::Call(text) => calls.push(text),
            }
        }
        if !directives.is_empty() {
            self.set_explicit(
                &mut explicit,
                DIRECTIVES_COLUMN.to_string(),
                ColumnRole::Directives,
                Value::TextList(directives),
            );
        }
        if !calls.is_empty() {
            self.set_explicit(
                &mut explicit,
                FUNCTION_CALL_COLUMN.to_string(),
                ColumnRole::FunctionCall,
                Value::Text(calls.join(" ")),
            );
        }
        if let Some(comment) = line.comment {
            self.set_explicit(
                &mut explicit,
                COMMENT_COLUMN.to_string(),
                ColumnRole::Comment,
                Value::Text(comment),
            );
        }

        let row = Row {
            line_no,
            state: self.state.clone(),
            explicit,
        };
        self.state.clear_line_local();
        row
    }

    fn set_explicit(&mut self, explicit: &mut Vec<String>, id: String, role: ColumnRole, value: Value) {
        if !explicit.contains(&id) {
            explicit.push(id.clone());
        }
        self.state.set(id, role, value);
    }

    /// Maps an identifier onto the column it names, ignoring case.
    fn canonical_id(&self, id: &str) -> String {
        if let Some(axis) = self.axes.iter().find(|axis| axis.eq_ignore_ascii_case(id)) {
            return axis.clone();
        }
        if let Some(reserved) = RESERVED_COLUMNS
            .iter()
            .find(|reserved| reserved.eq_ignore_ascii_case(id))
        {
            return (*reserved).to_string();
        }
        if let Some(group) = self
            .registry
            .groups()
            .iter()
            .find(|group| group.short_name.eq_ignore_ascii_case(id))
        {
            return group.short_name.clone();
        }
        id.to_ascii_uppercase()
    }

    /// Current value of `id`, with earlier words of the line taking
    /// precedence over the state.
    fn lookup<'v>(&'v self, id: &str, pending: &'v [Update]) -> Option<&'v Value> {
        pending
            .iter()
            .rev()
            .find_map(|update| match update {
                Update::Set { id: set, value, .. } if set == id => Some(value),
                _ => None,
            })
            .or_else(|| self.state.get(id))
    }

    fn variable(&self, name: &str, pending: &[Update]) -> Result<f64, EvalError> {
        let id = self.canonical_id(name);
        match self.lookup(&id, pending) {
            None => Err(EvalError::Undefined(id)),
            Some(value) => value.as_f64().ok_or(EvalError::NotNumeric(id)),
        }
    }

    fn evaluate(&self, word: &Word, expr: &Expr, pending: &[Update]) -> Result<f64, WordError> {
        expr.evaluate(&|name: &str| self.variable(name, pending))
            .map_err(|err| WordError::at(word, err.to_string()))
    }

    /// `IC(step)`: the current value of `id` plus `step`.
    fn incremented(
        &self,
        word: &Word,
        id: &str,
        step: &Expr,
        pending: &[Update],
    ) -> Result<f64, WordError> {
        let step = self.evaluate(word, step, pending)?;
        let base = match self.lookup(id, pending) {
            Some(current) => current
                .as_f64()
                .ok_or_else(|| WordError::at(word, format!("{id} does not hold a number")))?,
            None => {
                warn!(column = %id, "increment before any value was set, starting from 0");
                0.0
            }
        };
        Ok(base + step)
    }

    /// Value assigned to `id` by `word`.
    fn assigned_value(&self, word: &Word, id: &str, pending: &[Update]) -> Result<Value, WordError> {
        match &word.value {
            WordValue::Number { value, .. } => Ok(Value::Float(*value)),
            WordValue::Text(text) => Ok(Value::Text(text.clone())),
            WordValue::Expression(expr) => self.evaluate(word, expr, pending).map(Value::Float),
            WordValue::Increment(step) => self.incremented(word, id, step, pending).map(Value::Float),
            WordValue::Symbol(name) => {
                let value = match self.lookup(&self.canonical_id(name), pending) {
                    Some(value @ (Value::Int(_) | Value::Float(_) | Value::Text(_))) => {
                        value.clone()
                    }
                    _ => Value::Text(name.clone()),
                };
                Ok(value)
            }
            WordValue::Keyword | WordValue::Call(_) => Err(WordError::at(word, "expected a value")),
        }
    }

    fn resolve(&self, word: &Word, pending: &[Update]) -> Result<Update, WordError> {
        let id = self.canonical_id(&word.address);
        match id.as_str() {
            BLOCK_NUMBER_COLUMN => return resolve_block_number(word),
            DIRECTIVES_COLUMN => {
                return match word.value {
                    WordValue::Number { .. } | WordValue::Text(_) | WordValue::Symbol(_) => {
                        Ok(Update::Directive(word.raw.clone()))
                    }
                    _ => Err(WordError::at(word, "M function without a value")),
                };
            }
            TOOL_COLUMN => {
                let tool = match &word.value {
                    WordValue::Number { text, .. } => text.clone(),
                    WordValue::Text(text) | WordValue::Symbol(text) => text.clone(),
                    _ => return Err(WordError::at(word, "tool selection requires a number or a name")),
                };
                return Ok(Update::Set {
                    id,
                    role: ColumnRole::Tool,
                    value: Value::Text(tool),
                });
            }
            _ => {}
        }

        if self.is_axis(&id) {
            let value = match &word.value {
                WordValue::Number { value, .. } => *value,
                WordValue::Expression(expr) => self.evaluate(word, expr, pending)?,
                WordValue::Increment(step) => self.incremented(word, &id, step, pending)?,
                WordValue::Symbol(name) => self
                    .variable(name, pending)
                    .map_err(|err| WordError::at(word, err.to_string()))?,
                WordValue::Text(_) | WordValue::Keyword | WordValue::Call(_) => {
                    return Err(WordError::at(word, format!("axis {id} requires a numeric value")));
                }
            };
            return Ok(Update::Set {
                id,
                role: ColumnRole::Axis,
                value: Value::Float(value),
            });
        }

        match &word.value {
            WordValue::Call(_) => return Ok(Update::Call(word.raw.clone())),
            WordValue::Keyword => {
                if let Some(group) = self.registry.group_for_code(&word.raw) {
                    return Ok(group_update(group, word));
                }
                debug!(keyword = %word.raw, "recording keyword as function call");
                return Ok(Update::Call(word.raw.clone()));
            }
            _ => {}
        }

        if !word.assignment {
            if let Some(group) = self.registry.group_for_code(&word.raw) {
                return Ok(group_update(group, word));
            }
            if word.address == G_ADDRESS {
                warn!(
                    code = %word.raw,
                    column = word.column,
                    "unknown G code recorded as function call"
                );
                return Ok(Update::Call(word.raw.clone()));
            }
        }

        if self.registry.is_group(&id) {
            return Err(WordError::at(
                word,
                format!("group {id} can only be selected by one of its codes"),
            ));
        }
        if is_reserved_column(&id) {
            return Err(WordError::at(word, format!("{id} is a reserved column")));
        }

        let value = self.assigned_value(word, &id, pending)?;
        Ok(Update::Set {
            id,
            role: ColumnRole::Unknown,
            value,
        })
    }
}

fn resolve_block_number(word: &Word) -> Result<Update, WordError> {
    let number = match &word.value {
        WordValue::Number { text, .. } => parse_i64(text),
        _ => None,
    };
    match number {
        Some(number) => Ok(Update::Set {
            id: BLOCK_NUMBER_COLUMN.to_string(),
            role: ColumnRole::BlockNumber,
            value: Value::Int(number),
        }),
        None => Err(WordError::at(word, "block number must be an integer")),
    }
}

fn group_update(group: &GGroup, word: &Word) -> Update {
    let role = if group.is_modal() {
        ColumnRole::ModalGroup
    } else {
        ColumnRole::NonModalGroup
    };
    Update::Set {
        id: group.short_name.clone(),
        role,
        value: Value::Text(word.raw.clone()),
    }
}
