//! The `gvex` subcommand handlers end to end: argument parsing through
//! file output, over temp files.

use std::fs;
use std::path::Path;

use clap::ArgMatches;
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::Value;

use gvex_cli::{map, reduce};

const REF_BLOCK: &str = r#"{"reference_name":"13","start":"102265602","reference_bases":"A","END":"102265842","call":[{"call_set_name":"different_start","genotype":[0,0]}]}"#;

const SNP: &str = r#"{"reference_name":"13","start":"102265642","end":"102265643","reference_bases":"A","alternate_bases":["G"],"call":[{"call_set_name":"hu52B7E5","genotype":[1,0]},{"call_set_name":"hu1187FF","genotype":[1,0]},{"call_set_name":"huC434ED","genotype":[1,0]},{"call_set_name":"ambiguous","genotype":[1,0]}]}"#;

fn map_matches(args: &[&str]) -> ArgMatches {
    let mut argv = vec!["map"];
    argv.extend_from_slice(args);
    map::cli::create_map_cli()
        .try_get_matches_from(argv)
        .unwrap()
}

fn reduce_matches(args: &[&str]) -> ArgMatches {
    let mut argv = vec!["reduce"];
    argv.extend_from_slice(args);
    reduce::cli::create_reduce_cli()
        .try_get_matches_from(argv)
        .unwrap()
}

fn write_lines(path: &Path, lines: &[&str]) {
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn call_count(record: &Value) -> usize {
    record["call"].as_array().unwrap().len()
}

#[rstest]
fn test_map_writes_one_keyed_line_per_bin() {
    let tempdir = tempfile::tempdir().unwrap();
    let input = tempdir.path().join("records.json");
    let output = tempdir.path().join("binned.tsv");
    write_lines(&input, &[REF_BLOCK, SNP]);

    map::handlers::run_map(&map_matches(&[
        input.to_str().unwrap(),
        "--bin-size",
        "1000",
        "--output",
        output.to_str().unwrap(),
    ]))
    .unwrap();

    let lines = read_lines(&output);
    // both records fit in bin 102265 at this width
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let (key, payload) = line.split_once('\t').unwrap();
        assert_eq!(key, "13:102265");
        let record: Value = serde_json::from_str(payload).unwrap();
        assert!(record.get("reference_name").is_some());
    }
}

#[rstest]
fn test_reduce_expands_grouped_lines_and_honors_shard_key() {
    let tempdir = tempfile::tempdir().unwrap();
    let input = tempdir.path().join("binned.tsv");
    let output = tempdir.path().join("expanded.json");
    write_lines(
        &input,
        &[
            &format!("13:102265\t{}", REF_BLOCK),
            &format!("13:102265\t{}", SNP),
        ],
    );

    reduce::handlers::run_reduce(&reduce_matches(&[
        input.to_str().unwrap(),
        "--bin-size",
        "1000",
        "--shard-key",
        "0",
        "--output",
        output.to_str().unwrap(),
    ]))
    .unwrap();

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 1);

    let (prefix, payload) = lines[0].split_once('\t').unwrap();
    assert_eq!(prefix, "0");
    let expanded: Value = serde_json::from_str(payload).unwrap();
    // 4 original calls + 1 merged reference call
    assert_eq!(call_count(&expanded), 5);
}

#[rstest]
fn test_map_output_feeds_reduce() {
    let tempdir = tempfile::tempdir().unwrap();
    let records = tempdir.path().join("records.json");
    let binned = tempdir.path().join("binned.tsv");
    let expanded = tempdir.path().join("expanded.json");
    write_lines(&records, &[REF_BLOCK, SNP]);

    map::handlers::run_map(&map_matches(&[
        records.to_str().unwrap(),
        "--bin-size",
        "1000",
        "--output",
        binned.to_str().unwrap(),
    ]))
    .unwrap();

    // a single bin here, so the mapper output is already grouped
    reduce::handlers::run_reduce(&reduce_matches(&[
        binned.to_str().unwrap(),
        "--bin-size",
        "1000",
        "--output",
        expanded.to_str().unwrap(),
    ]))
    .unwrap();

    let lines = read_lines(&expanded);
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(call_count(&record), 5);
}

#[rstest]
fn test_reduce_filters_failing_calls_before_flagging() {
    // the duplicate call for "s" fails its filter; removing it first means
    // the record is flagged unambiguous
    let variant = r#"{"reference_name":"1","start":5,"end":6,"reference_bases":"A","alternate_bases":["G"],"call":[{"call_set_name":"s","genotype":[0,1],"FILTER":["PASS"]},{"call_set_name":"s","genotype":[0,0],"FILTER":["LowGQX"]}]}"#;

    let tempdir = tempfile::tempdir().unwrap();
    let input = tempdir.path().join("binned.tsv");
    let output = tempdir.path().join("expanded.json");
    write_lines(&input, &[&format!("1:0\t{}", variant)]);

    reduce::handlers::run_reduce(&reduce_matches(&[
        input.to_str().unwrap(),
        "--filter-failing-calls",
        "--mark-ambiguous",
        "--output",
        output.to_str().unwrap(),
    ]))
    .unwrap();

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(call_count(&record), 1);
    assert_eq!(record["ambiguousCalls"], Value::String("false".to_string()));
}

#[rstest]
fn test_reduce_aborts_on_line_without_tab() {
    let tempdir = tempfile::tempdir().unwrap();
    let input = tempdir.path().join("binned.tsv");
    let output = tempdir.path().join("expanded.json");
    write_lines(&input, &[SNP]); // a bare record, no key

    let result = reduce::handlers::run_reduce(&reduce_matches(&[
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]));

    assert!(result.is_err());
}

#[rstest]
fn test_reduce_aborts_on_malformed_key() {
    let tempdir = tempfile::tempdir().unwrap();
    let input = tempdir.path().join("binned.tsv");
    let output = tempdir.path().join("expanded.json");
    write_lines(&input, &[&format!("13:not-a-bin\t{}", SNP)]);

    let result = reduce::handlers::run_reduce(&reduce_matches(&[
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]));

    assert!(result.is_err());
}
