// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Tests for the spacey-cjs binary.

use spacey_macros::assert_ok;
use std::io::Write;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    assert_ok!(
        Command::new(env!("CARGO_BIN_EXE_spacey-cjs"))
            .args(args)
            .env_remove("RUST_LOG")
            .output()
    )
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_eval_prints_the_result() {
    let output = run(&["-e", "exports.greet = () => 'hi'; exports.greet()"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "'hi'");
}

#[test]
fn test_eval_undefined_prints_nothing() {
    let output = run(&["-e", "exports.a = 1; undefined"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_print_exports_after_file() {
    let mut file = assert_ok!(tempfile::NamedTempFile::new());
    assert_ok!(writeln!(
        file,
        "exports.foo = 1\nexports.foo = 2\nmodule.exports = function bar () {{}}"
    ));
    let path = file.path().to_string_lossy().to_string();

    let output = run(&[&path, "--print-exports"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "{ foo: 1, foo_1: 2, bar: [Function: bar] }");
}

#[test]
fn test_script_error_fails() {
    let output = run(&["-e", "require('fs')"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Can't require fs: require is not implemented"));
}

#[test]
fn test_missing_file_fails() {
    let output = run(&["/nonexistent/script.js"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));
}
