// thermovid-cli/src/main.rs
//
// Entry point for the thermovid CLI: parses arguments, dispatches to the
// requested command, and maps the outcome to a process exit code. Exit code
// 0 means every discovered recording converted; 1 means a fatal setup error
// or at least one failed conversion.

use std::process;

use clap::Parser;
use console::style;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Convert(args) => commands::convert::run_convert(args),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => {
            eprintln!(
                "{} some recordings failed to convert; see the log for details",
                style("Error:").red().bold()
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            process::exit(1);
        }
    }
}
