use rollcall_core::{aggregate, PipelineError, SourceFile};
use rollcall_parser::{normalize, MalformedInputError, RawTable};

fn fixture(name: &str) -> SourceFile {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../rollcall-parser/tests/data")
        .join(name);
    SourceFile::read(&path).expect("read fixture")
}

fn normalized(name: &str) -> rollcall_parser::CanonicalTable {
    let source = fixture(name);
    normalize(&RawTable::from_csv_bytes(&source.contents).expect("parse fixture"))
        .expect("normalize fixture")
}

#[test]
fn aggregate_concatenates_in_input_order() {
    let inputs = [fixture("cs101_attendance.csv"), fixture("cs102_attendance.csv")];
    let aggregated = aggregate(&inputs).expect("aggregate failed");

    let mut expected = normalized("cs101_attendance.csv").rows;
    expected.extend(normalized("cs102_attendance.csv").rows);

    assert_eq!(aggregated.rows, expected);
    assert_eq!(aggregated.len(), 8);
    assert_eq!(aggregated.dropped_rows, 2);
    assert_eq!(
        aggregated.sources,
        vec!["cs101_attendance.csv", "cs102_attendance.csv"]
    );
}

#[test]
fn aggregate_keeps_duplicates_across_files() {
    let inputs = [fixture("cs102_attendance.csv"), fixture("cs102_attendance.csv")];
    let aggregated = aggregate(&inputs).expect("aggregate failed");
    assert_eq!(aggregated.len(), 6);
    assert_eq!(aggregated.rows[0], aggregated.rows[3]);
}

#[test]
fn aggregate_reversed_inputs_reverse_blocks() {
    let forward = aggregate(&[fixture("cs101_attendance.csv"), fixture("cs102_attendance.csv")])
        .expect("forward aggregate failed");
    let reverse = aggregate(&[fixture("cs102_attendance.csv"), fixture("cs101_attendance.csv")])
        .expect("reverse aggregate failed");

    assert_eq!(reverse.rows[..3], forward.rows[5..]);
    assert_eq!(reverse.rows[3..], forward.rows[..5]);
}

#[test]
fn one_malformed_file_fails_the_batch() {
    let inputs = [
        fixture("cs101_attendance.csv"),
        fixture("no_marker.csv"),
        fixture("cs102_attendance.csv"),
    ];
    match aggregate(&inputs).expect_err("expected batch failure") {
        PipelineError::MalformedInput { input, source } => {
            assert_eq!(input, "no_marker.csv");
            assert!(matches!(source, MalformedInputError::MarkerNotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_column_file_names_the_input() {
    let inputs = [fixture("missing_average.csv")];
    let err = aggregate(&inputs).expect_err("expected batch failure");
    let message = err.to_string();
    assert!(message.starts_with("missing_average.csv:"));
    assert!(message.contains("Average %"));
}

#[test]
fn empty_input_list_is_rejected() {
    assert!(matches!(aggregate(&[]), Err(PipelineError::NoInputs)));
}

#[test]
fn unparseable_averages_never_reach_the_aggregate() {
    let inputs = [fixture("cs101_attendance.csv")];
    let aggregated = aggregate(&inputs).expect("aggregate failed");
    assert!(aggregated
        .rows
        .iter()
        .all(|row| row.enrollment_id != "0801CS231004"));
}

#[test]
fn in_memory_sources_aggregate_like_files() {
    let inputs = [SourceFile::new(
        "inline.csv",
        "preamble\nS.No.,Enrollment No.,Name,Average %\n1,E010,Kim,49.5\n",
    )];
    let aggregated = aggregate(&inputs).expect("aggregate failed");
    assert_eq!(aggregated.len(), 1);
    assert_eq!(aggregated.rows[0].average_percent, 49.5);
}
