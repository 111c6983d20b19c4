use anyhow::Result;

use deck_records::cli::Command;
use deck_records::{handle_completions, handle_fill, handle_normalize, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Fill {
            dir,
            non_interactive,
            breakpoints,
        } => handle_fill(dir, *non_interactive, breakpoints),
        Command::Normalize {
            platform,
            input,
            output,
        } => handle_normalize(*platform, input, output),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
