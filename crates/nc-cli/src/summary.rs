use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::ConvertSummary;

pub fn print_summary(summary: &ConvertSummary) {
    println!("Input: {}", summary.input.display());
    println!("Table: {}", summary.output.display());
    if let Some(path) = &summary.state_out {
        println!("Final state: {}", path.display());
    }
    if let Some(path) = &summary.nc_out {
        println!("Program: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Columns")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(summary.rows).add_attribute(Attribute::Bold),
        Cell::new(summary.columns.join(", ")),
    ]);
    println!("{table}");

    if !summary.skipped.is_empty() {
        let mut skipped = Table::new();
        skipped.set_header(vec![
            header_cell("Source"),
            header_cell("Line"),
            header_cell("Column"),
            header_cell("Token"),
            header_cell("Problem"),
        ]);
        apply_table_style(&mut skipped);
        align_column(&mut skipped, 1, CellAlignment::Right);
        align_column(&mut skipped, 2, CellAlignment::Right);
        for line in &summary.skipped {
            skipped.add_row(vec![
                Cell::new(line.origin),
                Cell::new(line.line_no),
                Cell::new(line.column),
                Cell::new(&line.token).fg(Color::Yellow),
                Cell::new(&line.message),
            ]);
        }
        println!("Skipped lines:");
        println!("{skipped}");
    }

    if let Some(hit) = summary.limit_exceeded {
        eprintln!(
            "error: iteration limit of {} rows exceeded at line {}; table is incomplete",
            hit.limit, hit.line_no
        );
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
