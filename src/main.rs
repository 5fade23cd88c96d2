// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-cjs - run CommonJS-style scripts on the Spacey shim
//!
//! This is the main entry point for the spacey-cjs CLI/REPL.
//!
//! ## Features
//!
//! - Runs a file or an inline snippet with `module`, `exports` and `require`
//! - Prints the collected exports on request
//! - Interactive REPL with highlighting, history and multi-line input

mod cli;
mod repl;

use clap::Parser;
use cli::Cli;
use owo_colors::OwoColorize;
use spacey_script::Engine;
use spacey_value::Value;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_filter()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut engine = Engine::new();

    if let Some(path) = &cli.file {
        if !path.exists() {
            eprintln!(
                "{}: file not found '{}'",
                "Error".red().bold(),
                path.display().cyan()
            );
            return ExitCode::FAILURE;
        }
        if let Err(e) = engine.eval_file(path) {
            repl::print_error(&e);
            return ExitCode::FAILURE;
        }
    }

    if let Some(code) = &cli.eval {
        match engine.eval(code) {
            Ok(Value::Undefined) => {}
            Ok(value) => println!("{}", value.inspect()),
            Err(e) => {
                repl::print_error(&e);
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.print_exports {
        match engine.environment().module().exported() {
            Ok(snapshot) => println!("{}", Value::Object(snapshot).inspect()),
            Err(e) => {
                repl::print_error(&spacey_value::Error::from(e));
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.wants_repl() {
        return run_repl(engine);
    }

    ExitCode::SUCCESS
}

/// Start the interactive REPL on `engine`
fn run_repl(engine: Engine) -> ExitCode {
    match repl::Repl::with_engine(engine) {
        Ok(mut repl) => {
            if let Err(e) = repl.run() {
                eprintln!("{}: {:?}", "REPL Error".red().bold(), e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}: Failed to initialize REPL: {:?}",
                "Error".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}
