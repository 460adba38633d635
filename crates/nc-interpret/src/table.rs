//! Assembles interpreted rows into a `DataFrame`.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, NamedFrom, PlSmallStr, PolarsResult, Series};

use nc_groups::GGroupRegistry;
use nc_model::{ColumnRole, Value};

use crate::tracker::Row;

struct ColumnInfo {
    role: ColumnRole,
    first_seen: usize,
    has_text: bool,
}

/// Returns the cell of `id` in `row`, or `None` if the cell stays empty.
///
/// With forward fill, persistent roles take their value from the state after
/// the line; everything else is only present where the line set it.
fn cell<'r>(row: &'r Row, id: &str, forward_fill: bool) -> Option<&'r Value> {
    let entry = row.state.entry(id)?;
    if row.is_explicit(id) || (forward_fill && entry.role.forward_fills()) {
        Some(&entry.value)
    } else {
        None
    }
}

/// Builds the table for `rows`.
///
/// Columns are the union of identifiers with at least one non-empty cell,
/// ordered as block number, groups (registry order), axes (configured
/// order), tool, other columns (first appearance), M functions, function
/// calls and comment.
pub fn assemble(
    rows: &[Row],
    registry: &GGroupRegistry,
    axes: &[String],
    forward_fill: bool,
) -> PolarsResult<DataFrame> {
    let mut infos: BTreeMap<&str, ColumnInfo> = BTreeMap::new();
    for row in rows {
        // Words of the line first, in program order, then filled values.
        let implicit = row
            .state
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !row.is_explicit(id));
        for id in row.explicit.iter().map(String::as_str).chain(implicit) {
            let (Some(entry), Some(value)) = (row.state.entry(id), cell(row, id, forward_fill))
            else {
                continue;
            };
            let next = infos.len();
            let info = infos.entry(id).or_insert(ColumnInfo {
                role: entry.role,
                first_seen: next,
                has_text: false,
            });
            info.has_text |= value.is_text();
        }
    }

    let mut ordered: Vec<(&str, &ColumnInfo)> =
        infos.iter().map(|(id, info)| (*id, info)).collect();
    ordered.sort_by_key(|(id, info)| (column_rank(id, info, registry, axes), *id));

    let columns = ordered
        .into_iter()
        .map(|(id, info)| build_column(rows, id, info, forward_fill))
        .collect();
    DataFrame::new(columns)
}

fn column_rank(
    id: &str,
    info: &ColumnInfo,
    registry: &GGroupRegistry,
    axes: &[String],
) -> (u8, usize) {
    match info.role {
        ColumnRole::BlockNumber => (0, 0),
        ColumnRole::ModalGroup | ColumnRole::NonModalGroup => {
            (1, registry.position(id).unwrap_or(usize::MAX))
        }
        ColumnRole::Axis => (2, axes.iter().position(|a| a == id).unwrap_or(usize::MAX)),
        ColumnRole::Tool => (3, 0),
        ColumnRole::Unknown => (4, info.first_seen),
        ColumnRole::Directives => (5, 0),
        ColumnRole::FunctionCall => (6, 0),
        ColumnRole::Comment => (7, 0),
    }
}

fn build_column(rows: &[Row], id: &str, info: &ColumnInfo, forward_fill: bool) -> Column {
    let name = PlSmallStr::from(id);
    let cells = rows.iter().map(|row| cell(row, id, forward_fill));
    match info.role {
        ColumnRole::BlockNumber => {
            let values: Vec<Option<i64>> = cells
                .map(|value| match value {
                    Some(Value::Int(v)) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into()
        }
        ColumnRole::Axis => float_column(name, cells),
        ColumnRole::Unknown if !info.has_text => float_column(name, cells),
        ColumnRole::Directives => {
            let values: Vec<Option<Series>> = cells
                .map(|value| match value {
                    Some(Value::TextList(items)) => Some(Series::new(PlSmallStr::EMPTY, items)),
                    _ => None,
                })
                .collect();
            Series::new(name, values).into()
        }
        _ => {
            let values: Vec<Option<String>> = cells.map(|value| value.map(Value::render)).collect();
            Series::new(name, values).into()
        }
    }
}

fn float_column<'r>(name: PlSmallStr, cells: impl Iterator<Item = Option<&'r Value>>) -> Column {
    let values: Vec<Option<f64>> = cells.map(|value| value.and_then(Value::as_f64)).collect();
    Series::new(name, values).into()
}
