use anyhow::Result;
use clap::Command;

use gvex_cli::{map, reduce};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "gvex";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Expand compressed gVCF data into fully materialized variant records, one per SNP position, carrying the reference-matching genotypes of every covered sample.")
        .subcommand_required(true)
        .subcommand(map::cli::create_map_cli())
        .subcommand(reduce::cli::create_reduce_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // MAP (binning, feeds the external shuffle)
        //
        Some((map::cli::MAP_CMD, matches)) => {
            map::handlers::run_map(matches)?;
        }

        //
        // REDUCE (per-bin sort-merge expansion)
        //
        Some((reduce::cli::REDUCE_CMD, matches)) => {
            reduce::handlers::run_reduce(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
