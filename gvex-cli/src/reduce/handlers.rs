use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};

use gvex_core::expand::{ExpanderConfig, GvcfExpander};
use gvex_core::filter::{filter_failing_calls, flag_ambiguous_calls};
use gvex_core::models::{BinKey, Record};
use gvex_core::utils::{get_dynamic_reader_w_stdin, get_dynamic_writer};

use crate::map::handlers::parse_bin_size;

struct EmitOptions {
    shard_key: Option<String>,
    filter_failing_calls: bool,
    mark_ambiguous: bool,
}

pub fn run_reduce(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("input has a default");
    let output = matches.get_one::<String>("output");

    let config = ExpanderConfig {
        bin_size: parse_bin_size(matches)?,
        filter_ref_matches: matches.get_flag("filter-ref-matches"),
        emit_ref_blocks: matches.get_flag("emit-ref-blocks"),
    };
    let opts = EmitOptions {
        shard_key: matches.get_one::<String>("shard-key").cloned(),
        filter_failing_calls: matches.get_flag("filter-failing-calls"),
        mark_ambiguous: matches.get_flag("mark-ambiguous"),
    };

    let reader = get_dynamic_reader_w_stdin(input)?;
    let mut writer = get_dynamic_writer(output.map(Path::new))?;

    let mut expander = GvcfExpander::new(config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")?
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    spinner.set_message("Expanding binned records...");

    let mut processed: u64 = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (key, payload) = line
            .split_once('\t')
            .with_context(|| format!("expected key\\trecord at line {}: {}", index + 1, line))?;
        let key: BinKey = key
            .parse()
            .with_context(|| format!("bad bin key at line {}: {}", index + 1, line))?;
        let record: Record = serde_json::from_str(payload)
            .with_context(|| format!("failed to parse record at line {}: {}", index + 1, line))?;

        for expanded in expander.consume(key, record)? {
            emit(&mut writer, expanded, &opts)?;
        }

        processed += 1;
        if processed % 10_000 == 0 {
            spinner.set_message(format!("Expanded {} records", processed));
        }
        spinner.inc(1);
    }

    for expanded in expander.finalize()? {
        emit(&mut writer, expanded, &opts)?;
    }

    spinner.finish_with_message(format!("Done! {} records processed", processed));
    writer.flush()?;
    Ok(())
}

fn emit<W: Write>(writer: &mut W, record: Record, opts: &EmitOptions) -> Result<()> {
    let record = if opts.filter_failing_calls {
        match filter_failing_calls(record) {
            Some(record) => record,
            None => return Ok(()),
        }
    } else {
        record
    };
    let record = if opts.mark_ambiguous {
        match flag_ambiguous_calls(record) {
            Some(record) => record,
            None => return Ok(()),
        }
    } else {
        record
    };

    let json = serde_json::to_string(&record)?;
    match &opts.shard_key {
        Some(key) => writeln!(writer, "{}\t{}", key, json)?,
        None => writeln!(writer, "{}", json)?,
    }

    Ok(())
}
