use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use gvex_core::binning::Binner;
use gvex_core::models::Record;
use gvex_core::utils::{get_dynamic_reader_w_stdin, get_dynamic_writer};

pub fn run_map(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("input has a default");
    let output = matches.get_one::<String>("output");
    let bin_size = parse_bin_size(matches)?;

    let reader = get_dynamic_reader_w_stdin(input)?;
    let mut writer = get_dynamic_writer(output.map(Path::new))?;

    let binner = Binner::new(bin_size);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(line)
            .with_context(|| format!("failed to parse record at line {}: {}", index + 1, line))?;

        let pairs = binner
            .bin(&record)
            .with_context(|| format!("failed to bin record at line {}: {}", index + 1, line))?;
        for (key, record) in pairs {
            writeln!(writer, "{}\t{}", key, serde_json::to_string(record)?)?;
        }
    }

    writer.flush()?;
    Ok(())
}

pub(crate) fn parse_bin_size(matches: &ArgMatches) -> Result<u64> {
    let raw = matches
        .get_one::<String>("bin-size")
        .expect("bin-size has a default");
    let bin_size: u64 = raw
        .parse()
        .with_context(|| format!("bin size must be a positive integer, got: {}", raw))?;
    if bin_size == 0 {
        anyhow::bail!("bin size must be a positive integer, got: {}", raw);
    }
    Ok(bin_size)
}
