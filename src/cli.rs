// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command line arguments for spacey-cjs.

use clap::Parser;
use std::path::PathBuf;

/// spacey-cjs - run CommonJS-style scripts with module, exports and require
#[derive(Parser, Debug)]
#[command(name = "spacey-cjs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JavaScript file to execute
    pub file: Option<PathBuf>,

    /// Evaluate JavaScript code
    #[arg(short, long, value_name = "CODE", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Start the REPL after running FILE or CODE
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the collected exports after running
    #[arg(long)]
    pub print_exports: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether the REPL should run
    pub fn wants_repl(&self) -> bool {
        self.interactive || (self.file.is_none() && self.eval.is_none())
    }

    /// The log filter used when `RUST_LOG` is unset
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "spacey_cjs=debug,spacey_commonjs=debug,spacey_script=debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("spacey-cjs").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_no_arguments_starts_repl() {
        let cli = parse(&[]);
        assert!(cli.wants_repl());
        assert_eq!(cli.default_filter(), "warn");
    }

    #[test]
    fn test_file_argument() {
        let cli = parse(&["lib.js", "--print-exports"]);
        assert_eq!(cli.file, Some(PathBuf::from("lib.js")));
        assert!(cli.print_exports);
        assert!(!cli.wants_repl());
    }

    #[test]
    fn test_eval_with_interactive() {
        let cli = parse(&["-e", "exports.a = 1", "-i", "--verbose"]);
        assert_eq!(cli.eval.as_deref(), Some("exports.a = 1"));
        assert!(cli.wants_repl());
        assert!(cli.default_filter().contains("spacey_commonjs=debug"));
    }

    #[test]
    fn test_eval_conflicts_with_file() {
        let result = Cli::try_parse_from(["spacey-cjs", "lib.js", "-e", "1"]);
        assert!(result.is_err());
    }
}
