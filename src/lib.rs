pub mod cli;
pub mod config;
pub mod decks;
pub mod domain;
pub mod errors;
pub mod matching;
pub mod normalize;
pub mod overrides;
pub mod records;
pub mod resolver;
pub mod services;
pub mod stats;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use std::io;
use std::path::Path;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::normalize::Platform;
use crate::services::{FillService, NormalizeService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_fill(dir: &Path, non_interactive: bool, breakpoints: &[u32]) -> Result<()> {
    let mut config = AppConfig::new(dir.to_path_buf()).with_breakpoints(breakpoints.to_vec());
    if non_interactive {
        config = config.non_interactive();
    }

    let service = FillService::new(&config)?;
    service.run()?;
    Ok(())
}

pub fn handle_normalize(platform: Platform, input: &Path, output: &Path) -> Result<()> {
    let config = AppConfig::new(output.to_path_buf());
    let service = NormalizeService::new(&config, platform, input)?;
    service.run()?;
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
