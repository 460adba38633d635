use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{debug, info, info_span, warn};

use nc_cli::output::{write_state_json, write_table_csv};
use nc_groups::shared_registry;
use nc_interpret::{Conversion, ConvertError, dataframe_to_nc_string, nc_to_dataframe};
use nc_model::{ConvertOptions, MalformedLinePolicy, ReverseOptions};

use crate::cli::ConvertArgs;
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::{ConvertSummary, LimitHit};

pub fn run_groups() -> Result<()> {
    let registry = shared_registry().context("load G groups")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Nr"),
        header_cell("Column"),
        header_cell("Title"),
        header_cell("Effectiveness"),
        header_cell("Codes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for group in registry.groups() {
        let codes: Vec<&str> = group.entries.iter().map(|e| e.id.as_str()).collect();
        table.add_row(vec![
            Cell::new(group.nr),
            Cell::new(&group.short_name),
            Cell::new(&group.title),
            Cell::new(group.effectiveness),
            Cell::new(codes.join(" ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertSummary> {
    let span = info_span!("convert_file", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let registry = shared_registry().context("load G groups")?;
    let program = read_text(&args.input)?;
    let options = convert_options(args)?;
    debug!(
        axes = ?options.resolved_axes(),
        limit = options.iteration_limit,
        forward_fill = !options.disable_forward_fill,
        "conversion options"
    );

    let (conversion, limit_exceeded) = match nc_to_dataframe(Some(&program), &options, registry) {
        Ok(conversion) => (conversion, None),
        Err(ConvertError::IterationLimitExceeded {
            limit,
            line_no,
            partial,
        }) => {
            warn!(limit, line_no, "writing partial table");
            (*partial, Some(LimitHit { limit, line_no }))
        }
        Err(err) => {
            return Err(err).with_context(|| format!("convert {}", args.input.display()));
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("csv"));
    write_table_csv(&conversion.table, &output, args.precision)?;

    if let Some(path) = &args.state_out {
        write_state_json(&conversion.state, path)?;
    }
    if let Some(path) = &args.nc_out {
        write_program(&conversion, path, args.precision)?;
    }

    info!(
        rows = conversion.table.height(),
        elapsed_ms = start.elapsed().as_millis(),
        output = %output.display(),
        "wrote table"
    );

    Ok(ConvertSummary {
        input: args.input.clone(),
        output,
        rows: conversion.table.height(),
        columns: conversion
            .table
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
        skipped: conversion.skipped,
        state_out: args.state_out.clone(),
        nc_out: args.nc_out.clone(),
        limit_exceeded,
    })
}

fn convert_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = ConvertOptions::new()
        .with_extra_axes(args.extra_axes.iter().map(|axis| axis.trim().to_string()))
        .with_iteration_limit(args.iteration_limit)
        .with_forward_fill(!args.disable_forward_fill);
    if let Some(axes) = &args.axes {
        options = options.with_axes(axes.iter().map(|axis| axis.trim().to_string()));
    }
    if let Some(path) = &args.initial_state {
        options = options.with_initial_state(read_text(path)?);
    }
    if args.skip_malformed {
        options = options.with_malformed_policy(MalformedLinePolicy::Skip);
    }
    Ok(options)
}

fn write_program(conversion: &Conversion, path: &Path, precision: usize) -> Result<()> {
    let registry = shared_registry().context("load G groups")?;
    let reverse = ReverseOptions::default().with_precision(precision);
    let text = dataframe_to_nc_string(&conversion.table, registry, &reverse)
        .context("serialize table to G-code")?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
