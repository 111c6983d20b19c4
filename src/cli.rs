use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::normalize::Platform;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tournament deck record reconciler")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Match rankings to deck submissions and write the deck record files
    Fill {
        /// Tournament directory holding rankings, matches and submissions
        #[arg(short, long)]
        dir: PathBuf,
        /// Reject every ambiguous name instead of prompting
        #[arg(long)]
        non_interactive: bool,
        /// Percent-of-field cut-offs for the top-N% counters
        #[arg(long, value_delimiter = ',', default_values_t = [10, 20, 30, 40, 50])]
        breakpoints: Vec<u32>,
    },
    /// Convert saved platform payloads into rankings/matches/games files
    Normalize {
        /// Source platform of the payloads
        #[arg(short, long, value_enum)]
        platform: Platform,
        /// Payload file or directory
        #[arg(short, long)]
        input: PathBuf,
        /// Tournament directory to write into
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
