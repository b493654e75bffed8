use clap::{Arg, ArgAction, Command, arg};

use crate::map::cli::DEFAULT_BIN_SIZE;

pub const REDUCE_CMD: &str = "reduce";

pub fn create_reduce_cli() -> Command {
    Command::new(REDUCE_CMD)
        .about("Merge binned records within each shuffle group and emit expanded per-position variant records.")
        .arg(
            Arg::new("input")
                .help("key\\tjson lines grouped by key; a file, a .gz file, or '-' for stdin")
                .default_value("-"),
        )
        .arg(
            arg!(--"bin-size" <size> "Width of a genome-position bin; must match the mapper's")
                .default_value(DEFAULT_BIN_SIZE),
        )
        .arg(
            arg!(--"filter-ref-matches")
                .help("Skip reference calls for samples already called in a variant")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"emit-ref-blocks")
                .help("Also emit each reference block once, from its starting bin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"filter-failing-calls")
                .help("Drop variant calls whose FILTER list lacks PASS, and variants left with no calls")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"mark-ambiguous")
                .help("Flag records where one sample carries more than one call")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(--"shard-key" <key> "Prefix every output line with this constant sink key"))
        .arg(arg!(--output <output> "Write expanded records here instead of stdout"))
}
