//! Drivefold CLI Binary
//!
//! Command-line interface for Drive folder-tree aggregation.

use clap::Parser;
use drivefold::error::ApiError;
use drivefold::logging::init_logging;
use drivefold::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Create CLI context
    let context = match CliContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let mut logging = context.config().logging.clone();
    cli.apply_logging_overrides(&mut logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    // Execute command
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    }
}

/// 2 for input the user can correct, 1 for everything else.
fn exit_code(err: &ApiError) -> i32 {
    if err.is_user_error() {
        2
    } else {
        1
    }
}
