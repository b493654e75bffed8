use clap::{Arg, Command, arg};

pub const MAP_CMD: &str = "map";
pub const DEFAULT_BIN_SIZE: &str = "1000";

pub fn create_map_cli() -> Command {
    Command::new(MAP_CMD)
        .about("Bin variant and reference-block records into shuffle keys.")
        .arg(
            Arg::new("input")
                .help("Newline-delimited JSON records; a file, a .gz file, or '-' for stdin")
                .default_value("-"),
        )
        .arg(
            arg!(--"bin-size" <size> "Width of a genome-position bin")
                .default_value(DEFAULT_BIN_SIZE),
        )
        .arg(arg!(--output <output> "Write key\\tjson lines here instead of stdout"))
}
