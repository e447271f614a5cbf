//! Subcommand definitions for the chipdat CLI

pub mod convert;
pub mod info;
pub mod show;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize the levels in a DAT file
    Info {
        /// DAT file to read
        path: PathBuf,
    },

    /// Print one level's fields and map layers
    Show {
        /// DAT file to read
        path: PathBuf,

        /// Level number, as stored in the level header
        number: u16,

        /// Render the lower layer instead of the upper one
        #[arg(short, long)]
        lower: bool,
    },

    /// Convert between .dat and .json level packs
    Convert {
        /// Source file (.dat, .ccl or .json)
        source: PathBuf,

        /// Destination file, format inferred from its extension
        destination: PathBuf,

        /// Keep optional fields with unknown type identifiers when reading DAT
        #[arg(long)]
        keep_unknown: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { path } => info::execute(path),
            Commands::Show {
                path,
                number,
                lower,
            } => show::execute(path, *number, *lower),
            Commands::Convert {
                source,
                destination,
                keep_unknown,
            } => convert::execute(source, destination, *keep_unknown),
        }
    }
}
