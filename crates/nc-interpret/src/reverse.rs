//! Serializes a table back into program text.
//!
//! Each row becomes one line. Numeric, modal-group and plain text cells are
//! delta encoded against the previous row; tool selections, non-modal codes,
//! M functions, calls and comments are written whenever they are present.
//!
//! A non-modal code in two consecutive rows is written twice. The table never
//! forward fills such a column, so each present cell is a separate command
//! (two `G4` dwells stay two dwells) and `suppress_unchanged` leaves it alone.

use std::io::Write;

use polars::prelude::{AnyValue, Column, DataFrame, DataType};
use tracing::debug;

use nc_common::{any_to_f64, any_to_i64, any_to_string, any_to_string_list, format_fixed, round_to};
use nc_groups::GGroupRegistry;
use nc_model::{
    BLOCK_NUMBER_COLUMN, COMMENT_COLUMN, FUNCTION_CALL_COLUMN, ReverseOptions, TOOL_COLUMN,
};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    BlockNumber,
    Numeric,
    Tool,
    ModalGroup,
    NonModalGroup,
    List,
    FunctionCall,
    Comment,
    Text,
}

impl Encoding {
    fn for_column(column: &Column, registry: &GGroupRegistry) -> Result<Self> {
        let name = column.name().as_str();
        let encoding = match name {
            BLOCK_NUMBER_COLUMN => Self::BlockNumber,
            TOOL_COLUMN => Self::Tool,
            FUNCTION_CALL_COLUMN => Self::FunctionCall,
            COMMENT_COLUMN => Self::Comment,
            _ if registry.is_group(name) => {
                if registry.is_modal(name)? {
                    Self::ModalGroup
                } else {
                    Self::NonModalGroup
                }
            }
            _ => match column.dtype() {
                DataType::List(_) => Self::List,
                dtype if dtype.is_primitive_numeric() => Self::Numeric,
                _ => Self::Text,
            },
        };
        Ok(encoding)
    }

    /// Non-modal codes are not: a repeated cell is a repeated command.
    fn is_delta_encoded(self) -> bool {
        matches!(self, Self::Numeric | Self::ModalGroup | Self::Text)
    }
}

/// Value used to compare a cell with the one above it.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Text(String),
}

struct ColumnWriter<'a> {
    column: &'a Column,
    encoding: Encoding,
    previous: Option<Cell>,
}

impl ColumnWriter<'_> {
    /// Returns the field for `row`, if any, and remembers the cell.
    fn field(&mut self, row: usize, options: &ReverseOptions) -> Result<Option<String>> {
        let value = self.column.get(row)?;
        let current = self.comparable(&value, options.precision);
        let unchanged = options.suppress_unchanged
            && self.encoding.is_delta_encoded()
            && current.is_some()
            && current == self.previous;
        self.previous = current;
        if unchanged || matches!(value, AnyValue::Null) {
            return Ok(None);
        }
        Ok(self.render(value, options.precision))
    }

    fn comparable(&self, value: &AnyValue<'_>, precision: usize) -> Option<Cell> {
        if matches!(value, AnyValue::Null) {
            return None;
        }
        match self.encoding {
            Encoding::Numeric => {
                any_to_f64(value.clone()).map(|v| Cell::Number(round_to(v, precision)))
            }
            Encoding::ModalGroup | Encoding::Text => Some(Cell::Text(any_to_string(value.clone()))),
            _ => None,
        }
    }

    fn render(&self, value: AnyValue<'_>, precision: usize) -> Option<String> {
        let name = self.column.name().as_str();
        let field = match self.encoding {
            Encoding::BlockNumber => match any_to_i64(value.clone()) {
                Some(number) => format!("{name}{number}"),
                None => format!("{name}{}", any_to_string(value)),
            },
            Encoding::Numeric => {
                let number = any_to_f64(value)?;
                format!("{name}={}", format_fixed(number, precision))
            }
            Encoding::Tool | Encoding::Text => format!("{name}=\"{}\"", any_to_string(value)),
            Encoding::ModalGroup | Encoding::NonModalGroup | Encoding::FunctionCall => {
                any_to_string(value)
            }
            Encoding::List => any_to_string_list(value)?.join(" "),
            Encoding::Comment => format!(";{}", any_to_string(value)),
        };
        (!field.is_empty()).then_some(field)
    }
}

/// Writes `table` as program text, one line per row.
///
/// Fields are joined with a single space in column order, the comment last.
/// A row without any field produces an empty line.
///
/// # Errors
///
/// Fails if a group column cannot be classified, a cell cannot be read, or
/// the writer fails.
pub fn dataframe_to_nc<W: Write>(
    table: &DataFrame,
    registry: &GGroupRegistry,
    options: &ReverseOptions,
    writer: &mut W,
) -> Result<()> {
    let mut columns = Vec::with_capacity(table.width());
    let mut comment = None;
    for column in table.get_columns() {
        let encoding = Encoding::for_column(column, registry)?;
        let column_writer = ColumnWriter {
            column,
            encoding,
            previous: None,
        };
        if encoding == Encoding::Comment {
            if !options.ignore_comments {
                comment = Some(column_writer);
            }
        } else {
            columns.push(column_writer);
        }
    }
    debug!(
        rows = table.height(),
        columns = columns.len(),
        precision = options.precision,
        "writing program text"
    );

    for row in 0..table.height() {
        let mut fields = Vec::with_capacity(columns.len() + 1);
        for column in columns.iter_mut().chain(comment.iter_mut()) {
            if let Some(field) = column.field(row, options)? {
                fields.push(field);
            }
        }
        writeln!(writer, "{}", fields.join(" "))?;
    }
    Ok(())
}

/// Like [`dataframe_to_nc`], returning the program as a string.
pub fn dataframe_to_nc_string(
    table: &DataFrame,
    registry: &GGroupRegistry,
    options: &ReverseOptions,
) -> Result<String> {
    let mut buffer = Vec::new();
    dataframe_to_nc(table, registry, options, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
