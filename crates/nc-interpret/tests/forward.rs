//! Forward conversion of whole programs.

use nc_groups::{GGroupRegistry, shared_registry};
use nc_interpret::{ConvertError, Source, nc_to_dataframe};
use nc_model::{ConvertOptions, MalformedLinePolicy, Value};
use polars::prelude::DataFrame;

const FACE_MILL: &str = "\
; face milling
N10 G90 G17 G54 T=\"FACE_MILL\" M6
N20 G0 X0 Y0 Z5 S1200 M3 M8
N30 G1 Z-1 F200

N40 X100 ; first pass
N50 G4 F2
N60 Y50
N70 G0 Z5 M5 M30
";

const SINGLE_GROUP: &str = "\
group_nr,title,effectiveness,short_name,entry_nr,entry_id,description
1,Motion,modal,G,1,G01,Linear interpolation
";

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| (!v.is_empty()).then(|| (*v).to_string()))
        .collect()
}

#[test]
fn restated_axis_keeps_row_and_group_joins_last_row() {
    let registry = GGroupRegistry::from_csv_str(SINGLE_GROUP).unwrap();
    let options = ConvertOptions::new().with_axes(["X", "Y"]);

    let conversion =
        nc_to_dataframe(Some("X=10\nY=5\nX=10\nG01"), &options, &registry).unwrap();
    let df = &conversion.table;

    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["G", "X", "Y"]);
    assert_eq!(floats(df, "X"), [Some(10.0); 4]);
    assert_eq!(floats(df, "Y"), [None, Some(5.0), Some(5.0), Some(5.0)]);
    assert_eq!(strings(df, "G"), some(&["", "", "", "G01"]));
}

#[test]
fn modal_groups_fill_and_non_modal_groups_do_not() {
    let registry = shared_registry().unwrap();
    let conversion =
        nc_to_dataframe(Some(FACE_MILL), &ConvertOptions::default(), registry).unwrap();
    let df = &conversion.table;

    assert_eq!(df.height(), 7);
    assert_eq!(
        strings(df, "GG01_motion"),
        some(&["", "G0", "G1", "G1", "G1", "G1", "G0"])
    );
    assert_eq!(
        strings(df, "GG02_non_modal_motion"),
        some(&["", "", "", "", "G4", "", ""])
    );
    assert_eq!(strings(df, "GG14_absolute_incremental"), some(&["G90"; 7]));
    assert_eq!(
        floats(df, "Z"),
        [None, Some(5.0), Some(-1.0), Some(-1.0), Some(-1.0), Some(-1.0), Some(5.0)]
    );
    assert_eq!(strings(df, "T"), some(&["FACE_MILL", "", "", "", "", "", ""]));
    assert_eq!(strings(df, "comment"), some(&["", "", "", "first pass", "", "", ""]));

    let blocks: Vec<Option<i64>> = df.column("N").unwrap().i64().unwrap().into_iter().collect();
    assert_eq!(blocks[0], Some(10));
    assert_eq!(blocks[6], Some(70));
}

#[test]
fn directives_are_a_list_column() {
    let registry = shared_registry().unwrap();
    let conversion =
        nc_to_dataframe(Some(FACE_MILL), &ConvertOptions::default(), registry).unwrap();
    let m = conversion.table.column("M").unwrap();

    let second = nc_common::any_to_string_list(m.get(1).unwrap()).unwrap();
    assert_eq!(second, ["M3", "M8"]);
    assert_eq!(m.null_count(), 4);
}

#[test]
fn final_state_keeps_only_persistent_values() {
    let registry = shared_registry().unwrap();
    let conversion =
        nc_to_dataframe(Some(FACE_MILL), &ConvertOptions::default(), registry).unwrap();
    let state = &conversion.state;

    assert_eq!(state.axes.get("X"), Some(&100.0));
    assert_eq!(state.axes.get("F"), Some(&2.0));
    assert_eq!(state.groups.get("GG01_motion").map(String::as_str), Some("G0"));
    assert_eq!(state.groups.get("GG08_work_offset").map(String::as_str), Some("G54"));
    assert!(!state.groups.contains_key("GG02_non_modal_motion"));
    assert_eq!(state.tool.as_deref(), Some("FACE_MILL"));
}

#[test]
fn disabled_forward_fill_keeps_only_explicit_cells() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_forward_fill(false);
    let conversion = nc_to_dataframe(Some(FACE_MILL), &options, registry).unwrap();
    let df = &conversion.table;

    assert_eq!(
        strings(df, "GG01_motion"),
        some(&["", "G0", "G1", "", "", "", "G0"])
    );
    assert_eq!(
        floats(df, "X"),
        [None, Some(0.0), None, Some(100.0), None, None, None]
    );
    assert_eq!(conversion.state.axes.get("X"), Some(&100.0));
}

#[test]
fn initial_state_seeds_the_first_rows() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new()
        .with_axes(["X", "Y"])
        .with_initial_state("G1 G90\nX=5 ; start position");

    let conversion = nc_to_dataframe(Some("Y1\nX2"), &options, registry).unwrap();
    let df = &conversion.table;

    assert_eq!(df.height(), 2);
    assert_eq!(floats(df, "X"), [Some(5.0), Some(2.0)]);
    assert_eq!(strings(df, "GG01_motion"), some(&["G1", "G1"]));
    assert!(df.column("comment").is_err());
}

#[test]
fn unknown_codes_are_kept() {
    let registry = shared_registry().unwrap();
    let program = "G1 X1 R1=2.5 G999 STOPRE\nH=abc\nX2";
    let conversion = nc_to_dataframe(Some(program), &ConvertOptions::default(), registry).unwrap();
    let df = &conversion.table;

    assert_eq!(floats(df, "R1"), [Some(2.5), Some(2.5), Some(2.5)]);
    assert_eq!(strings(df, "H"), some(&["", "abc", "abc"]));
    assert_eq!(strings(df, "function_call"), some(&["G999 STOPRE", "", ""]));
    assert_eq!(conversion.state.extra.get("R1"), Some(&Value::Float(2.5)));
}

#[test]
fn identifiers_ignore_case() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_axes(["X", "Y"]);
    let conversion = nc_to_dataframe(Some("x10\nx=20\ny=x*2"), &options, registry).unwrap();
    let df = &conversion.table;

    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["X", "Y"]);
    assert_eq!(floats(df, "X"), [Some(10.0), Some(20.0), Some(20.0)]);
    assert_eq!(conversion.state.axes.get("Y"), Some(&40.0));
}

#[test]
fn expressions_and_increments() {
    let registry = shared_registry().unwrap();
    let program = "R1=2\nX=R1*3+1 Y=(R1+1) DIV 2\nX=IC(R1) Y=IC(-0.5)\nR1=R1 MOD 2";
    let conversion = nc_to_dataframe(Some(program), &ConvertOptions::default(), registry).unwrap();
    let df = &conversion.table;

    assert_eq!(floats(df, "X"), [None, Some(7.0), Some(9.0), Some(9.0)]);
    assert_eq!(floats(df, "Y"), [None, Some(1.0), Some(0.5), Some(0.5)]);
    assert_eq!(
        conversion.state.extra.get("R1").and_then(Value::as_f64),
        Some(0.0)
    );
}

#[test]
fn undefined_variable_is_a_malformed_line() {
    let registry = shared_registry().unwrap();
    let err = nc_to_dataframe(Some("X1\nY=R9*2"), &ConvertOptions::default(), registry)
        .unwrap_err();
    match err {
        ConvertError::MalformedLine {
            line_no, message, ..
        } => {
            assert_eq!(line_no, 2);
            assert!(message.contains("R9"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_columns_follow_word_order() {
    let registry = shared_registry().unwrap();
    let conversion = nc_to_dataframe(
        Some("X1 ZETA=1 ALPHA=2\nBETA=3"),
        &ConvertOptions::default(),
        registry,
    )
    .unwrap();
    let names: Vec<&str> = conversion
        .table
        .get_column_names()
        .iter()
        .map(|n| n.as_str())
        .collect();
    assert_eq!(names, ["X", "ZETA", "ALPHA", "BETA"]);
}

#[test]
fn extra_axes_extend_the_axis_set() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_extra_axes(["W"]);
    let conversion = nc_to_dataframe(Some("W=3\nX1"), &options, registry).unwrap();
    assert_eq!(conversion.state.axes.get("W"), Some(&3.0));

    let err = nc_to_dataframe(Some("W=abc"), &options, registry).unwrap_err();
    assert!(matches!(err, ConvertError::MalformedLine { .. }));
}

#[test]
fn missing_input_is_rejected() {
    let registry = shared_registry().unwrap();
    let err = nc_to_dataframe(None, &ConvertOptions::default(), registry).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidInput(_)));

    let options = ConvertOptions::new().with_iteration_limit(0);
    let err = nc_to_dataframe(Some("X1"), &options, registry).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidInput(_)));
}

#[test]
fn malformed_line_reports_position() {
    let registry = shared_registry().unwrap();
    let err = nc_to_dataframe(Some("X1\nG0 G1X10"), &ConvertOptions::default(), registry)
        .unwrap_err();
    match err {
        ConvertError::MalformedLine {
            origin,
            line_no,
            column,
            token,
            ..
        } => {
            assert_eq!(origin, Source::Program);
            assert_eq!(line_no, 2);
            assert_eq!(column, 4);
            assert_eq!(token, "G1X10");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_initial_state_is_reported_as_such() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_initial_state("X=");
    let err = nc_to_dataframe(Some("X1"), &options, registry).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MalformedLine {
            origin: Source::InitialState,
            line_no: 1,
            ..
        }
    ));
    assert!(err.to_string().starts_with("initial state line 1"));
}

#[test]
fn skipped_lines_are_recorded() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_malformed_policy(MalformedLinePolicy::Skip);
    let conversion =
        nc_to_dataframe(Some("X1\nX=R1+1\nY=\"a\"\nX2"), &options, registry).unwrap();

    assert_eq!(conversion.table.height(), 2);
    let lines: Vec<usize> = conversion.skipped.iter().map(|s| s.line_no).collect();
    assert_eq!(lines, [2, 3]);
    assert_eq!(conversion.state.axes.get("X"), Some(&2.0));
    assert!(!conversion.state.axes.contains_key("Y"));
}

#[test]
fn iteration_limit_returns_partial_table() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_iteration_limit(3);
    let err = nc_to_dataframe(Some("X1\nX2\n\nX3\nX4\nX5"), &options, registry).unwrap_err();

    match err {
        ConvertError::IterationLimitExceeded {
            limit,
            line_no,
            partial,
        } => {
            assert_eq!(limit, 3);
            assert_eq!(line_no, 5);
            assert_eq!(partial.table.height(), 3);
            assert_eq!(partial.state.axes.get("X"), Some(&3.0));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn program_at_the_limit_converts() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new().with_iteration_limit(3);
    let conversion = nc_to_dataframe(Some("X1\nX2\nX3\n; end"), &options, registry).unwrap();
    assert_eq!(conversion.table.height(), 3);
}

#[test]
fn initial_state_is_bounded_too() {
    let registry = shared_registry().unwrap();
    let options = ConvertOptions::new()
        .with_iteration_limit(1)
        .with_initial_state("X1\nX2");
    let err = nc_to_dataframe(Some("X3"), &options, registry).unwrap_err();
    match err {
        ConvertError::IterationLimitExceeded { partial, .. } => {
            assert_eq!(partial.table.height(), 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn axis_colliding_with_group_is_rejected() {
    let registry = GGroupRegistry::from_csv_str(SINGLE_GROUP).unwrap();
    let options = ConvertOptions::new().with_axes(["X", "G"]);
    let err = nc_to_dataframe(Some("X1"), &options, &registry).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::UnknownAxisConfiguration { ref axis, .. } if axis == "G"
    ));
}
