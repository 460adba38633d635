//! Writers for conversion results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{
    Column, CsvWriter, DataFrame, DataType, IntoColumn, NamedFrom, SerWriter, Series,
};

use nc_common::any_to_string_list;
use nc_model::FinalState;

/// Writes `table` as CSV, floats rounded to `precision` digits.
///
/// List cells such as the `M` directives are joined with single spaces.
pub fn write_table_csv(table: &DataFrame, path: &Path, precision: usize) -> Result<()> {
    let mut flat = flatten_lists(table)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_float_precision(Some(precision))
        .finish(&mut flat)
        .with_context(|| format!("write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Writes the final machine state as pretty JSON.
pub fn write_state_json(state: &FinalState, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, state).context("serialize final state")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Replaces list columns with space-joined string columns.
pub fn flatten_lists(table: &DataFrame) -> Result<DataFrame> {
    let mut flat = table.clone();
    for column in table.get_columns() {
        if matches!(column.dtype(), DataType::List(_)) {
            flat.with_column(join_list_column(column)?)?;
        }
    }
    Ok(flat)
}

fn join_list_column(column: &Column) -> Result<Column> {
    let mut values: Vec<Option<String>> = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        let cell = column.get(idx)?;
        values.push(any_to_string_list(cell).map(|items| items.join(" ")));
    }
    Ok(Series::new(column.name().clone(), values).into_column())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_cells_are_space_joined() {
        let m = Series::new(
            "M".into(),
            vec![
                Some(Series::new("".into(), ["M3", "M8"])),
                None,
                Some(Series::new("".into(), ["M30"])),
            ],
        );
        let df = DataFrame::new(vec![m.into_column()]).unwrap();

        let flat = flatten_lists(&df).unwrap();
        let values: Vec<Option<&str>> =
            flat.column("M").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(values, [Some("M3 M8"), None, Some("M30")]);
    }

    #[test]
    fn other_columns_are_untouched() {
        let df = DataFrame::new(vec![Series::new("X".into(), [1.0, 2.0]).into_column()]).unwrap();
        let flat = flatten_lists(&df).unwrap();
        assert!(flat.equals(&df));
    }
}
