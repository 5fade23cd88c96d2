// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL (Read-Eval-Print Loop) for spacey-cjs.

use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config, Editor, Helper};
use spacey_script::Engine;
use spacey_value::{Error, Value};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// REPL configuration constants
const HISTORY_FILE: &str = ".spacey_cjs_history";
const MAX_HISTORY_SIZE: usize = 1000;

const KEYWORDS: &[&str] = &[
    "const", "else", "function", "if", "let", "return", "typeof", "var",
];

const LITERALS: &[&str] = &[
    "true",
    "false",
    "null",
    "undefined",
    "NaN",
    "Infinity",
    "this",
];

const GLOBALS: &[&str] = &[
    "module", "exports", "require", "Object", "Symbol", "console", "globalThis",
];

/// Completion candidates beyond the bare keywords
const MEMBERS: &[&str] = &[
    "module.exports",
    "module.exported",
    "module.require",
    "Object.defineProperty",
    "Object.getOwnPropertyDescriptor",
    "Object.keys",
    "Object.values",
    "Object.entries",
    "Object.is",
    "Object.preventExtensions",
    "Object.isExtensible",
    "Object.setPrototypeOf",
    "console.log",
    "console.error",
    "console.warn",
];

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Exports,
    Reset,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let rest = input.trim().strip_prefix('.')?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "version" | "v" => Some((ReplCommand::Version, arg)),
            "load" | "l" => Some((ReplCommand::Load, arg)),
            "exports" | "x" => Some((ReplCommand::Exports, arg)),
            "reset" => Some((ReplCommand::Reset, arg)),
            _ => None,
        }
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Load and execute a JavaScript file"),
            (".exports", "Show the collected exports"),
            (".reset", "Start over with a fresh module"),
        ]
    }
}

/// Helper struct for rustyline that provides completion, hints, and validation
struct CjsHelper {
    /// Keywords and built-in identifiers for completion
    candidates: Vec<String>,
}

impl CjsHelper {
    fn new() -> Self {
        let commands = ReplCommand::all_commands()
            .iter()
            .map(|&(cmd, _)| cmd.split_whitespace().next().unwrap_or(cmd));

        let candidates = KEYWORDS
            .iter()
            .chain(LITERALS)
            .chain(GLOBALS)
            .chain(MEMBERS)
            .copied()
            .chain(commands)
            .map(String::from)
            .collect();

        Self { candidates }
    }

    fn matches<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.candidates
            .iter()
            .filter(move |candidate| candidate.starts_with(word) && candidate.len() > word.len())
    }
}

/// Start of the word ending at `pos`
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .rfind(|c: char| !c.is_alphanumeric() && c != '_' && c != '.')
        .map(|i| i + 1)
        .unwrap_or(0)
}

impl Completer for CjsHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = &line[word_start(line, pos)..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches = self
            .matches(word)
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for CjsHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let word = &line[word_start(line, pos)..];
        if word.len() < 2 {
            return None;
        }

        self.matches(word)
            .next()
            .map(|candidate| candidate[word.len()..].to_string().dimmed().to_string())
    }
}

impl Highlighter for CjsHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let mut result = String::with_capacity(line.len() * 2);
        let mut current_word = String::new();

        for c in line.chars() {
            if c.is_alphanumeric() || c == '_' {
                current_word.push(c);
                continue;
            }
            if !current_word.is_empty() {
                result.push_str(&highlight_word(&current_word));
                current_word.clear();
            }
            let colored = match c {
                '(' | ')' | '[' | ']' | '{' | '}' => c.yellow().to_string(),
                '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' | '&' | '|' => c.cyan().to_string(),
                '"' | '\'' => c.green().to_string(),
                '.' if line.starts_with('.') => c.magenta().to_string(),
                _ => c.to_string(),
            };
            result.push_str(&colored);
        }

        if !current_word.is_empty() {
            result.push_str(&highlight_word(&current_word));
        }

        Cow::Owned(result)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn highlight_word(word: &str) -> String {
    if KEYWORDS.contains(&word) {
        word.magenta().bold().to_string()
    } else if LITERALS.contains(&word) {
        word.blue().to_string()
    } else if GLOBALS.contains(&word) {
        word.cyan().to_string()
    } else if word.chars().all(|c| c.is_ascii_digit()) {
        word.yellow().to_string()
    } else {
        word.to_string()
    }
}

impl Validator for CjsHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        Ok(validate_input(ctx.input()))
    }
}

/// Decide whether `input` is ready to evaluate or needs another line
fn validate_input(input: &str) -> ValidationResult {
    if !is_balanced(input) {
        return ValidationResult::Incomplete;
    }

    let trimmed = input.trim();
    if trimmed.starts_with('.') {
        return ValidationResult::Valid(None);
    }

    // a trailing operator expects more input
    let continues = ['\\', '+', '-', '*', '/', '=', ',', '{', '(', '[', '|', '&'];
    if trimmed.ends_with(continues) {
        return ValidationResult::Incomplete;
    }

    ValidationResult::Valid(None)
}

/// Check if brackets, braces, and parentheses are balanced
fn is_balanced(input: &str) -> bool {
    let mut stack = Vec::new();
    let mut in_string = None;
    let mut escape_next = false;

    for c in input.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string.is_some() {
            escape_next = true;
            continue;
        }

        match in_string {
            Some(quote) if c == quote => in_string = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => in_string = Some(c),
                '(' => stack.push(')'),
                '[' => stack.push(']'),
                '{' => stack.push('}'),
                ')' | ']' | '}' => {
                    // mismatched closers are left for the parser to report
                    if stack.pop() != Some(c) {
                        return true;
                    }
                }
                _ => {}
            },
        }
    }

    stack.is_empty() && in_string.is_none()
}

impl Helper for CjsHelper {}

/// The interactive REPL hosting one CommonJS module
pub struct Repl {
    engine: Engine,
    editor: Editor<CjsHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Create a REPL on an engine that may already have run a script
    pub fn with_engine(engine: Engine) -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CjsHelper::new()));

        let history_path = history_path();
        if let Some(parent) = history_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("cannot create {}: {}", parent.display(), e);
            }
        }
        if let Err(e) = editor.load_history(&history_path) {
            debug!("no history loaded from {}: {}", history_path.display(), e);
        }

        Ok(Self {
            engine,
            editor,
            history_path,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "cjs>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.eval_and_print(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        if let Err(e) = self.editor.save_history(&self.history_path) {
            warn!("cannot save history to {}: {}", self.history_path.display(), e);
        }

        println!();
        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!(
            "  {} {} {}",
            "spacey-cjs".white().bold(),
            "v".dimmed(),
            env!("CARGO_PKG_VERSION").bright_yellow()
        );
        println!(
            "  {}",
            "module, exports and require for plain scripts".dimmed()
        );
        println!();
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => {
                println!(
                    "{}: {}",
                    "spacey-cjs".bright_cyan().bold(),
                    env!("CARGO_PKG_VERSION").yellow()
                );
                println!("{}: {}", "commonjs".dimmed(), spacey_commonjs::VERSION);
            }
            ReplCommand::Load => match arg {
                Some(path) => self.load_file(Path::new(path)),
                None => eprintln!(
                    "{}: {} {}",
                    "Error".red().bold(),
                    ".load".cyan(),
                    "requires a file path".dimmed()
                ),
            },
            ReplCommand::Exports => match render_exports(&self.engine) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => print_error(&e),
            },
            ReplCommand::Reset => {
                self.engine = Engine::new();
                println!("{}", "Module reset".dimmed());
            }
        }
        CommandResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:16} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!("  {:16} {}", "Ctrl+C".yellow(), "Cancel current input".dimmed());
        println!("  {:16} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:16} {}", "Tab".yellow(), "Autocomplete".dimmed());
        println!();
    }

    fn load_file(&mut self, path: &Path) {
        match self.engine.eval_file(path) {
            Ok(value) => println!("{}", format_value(&value)),
            Err(e) => print_error(&e),
        }
    }

    fn eval_and_print(&mut self, input: &str) {
        match self.engine.eval(input) {
            Ok(value) => println!("{}", format_value(&value)),
            Err(e) => print_error(&e),
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

fn history_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spacey")
        .join(HISTORY_FILE)
}

/// The current `module.exported` snapshot, inspected
fn render_exports(engine: &Engine) -> Result<String, Error> {
    let snapshot = engine.environment().module().exported()?;
    Ok(Value::Object(snapshot).inspect())
}

/// Format a JavaScript value for display with syntax coloring
fn format_value(value: &Value) -> String {
    let rendered = value.inspect();
    match value {
        Value::Undefined => rendered.blue().dimmed().to_string(),
        Value::Null => rendered.blue().to_string(),
        Value::Boolean(_) | Value::Number(_) => rendered.yellow().to_string(),
        Value::String(_) => rendered.green().to_string(),
        Value::Symbol(_) | Value::Function(_) => rendered.magenta().to_string(),
        Value::Object(_) | Value::Array(_) | Value::Exotic(_) => rendered,
    }
}

/// Print a formatted error message
pub fn print_error(error: &Error) {
    let error_str = error.to_string();

    match error_str.split_once(':') {
        Some((error_type, message)) => eprintln!("{}:{}", error_type.red().bold(), message),
        None => eprintln!("{}", error_str.red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacey_macros::assert_ok;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".exit"),
            Some((ReplCommand::Exit, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".load  lib.js "),
            Some((ReplCommand::Load, Some("lib.js")))
        ));
        assert!(matches!(
            ReplCommand::parse(".EXPORTS"),
            Some((ReplCommand::Exports, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".reset"),
            Some((ReplCommand::Reset, None))
        ));
        assert!(ReplCommand::parse(".unknown").is_none());
        assert!(ReplCommand::parse("exports.a = 1").is_none());
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced("(1 + 2)"));
        assert!(is_balanced("{ a: 1 }"));
        assert!(is_balanced("function f() { return 1 }"));
        assert!(!is_balanced("(1 + 2"));
        assert!(!is_balanced("exports.f = () => {"));
        assert!(!is_balanced("'unterminated"));
        assert!(is_balanced("'string with (unbalanced'"));
        assert!(is_balanced("'escaped \\' quote'"));
    }

    #[test]
    fn test_validate_input() {
        assert!(matches!(validate_input("exports.a = 1"), ValidationResult::Valid(None)));
        assert!(matches!(validate_input("exports.a ="), ValidationResult::Incomplete));
        assert!(matches!(validate_input("module.exports = {"), ValidationResult::Incomplete));
        assert!(matches!(validate_input("flag ||"), ValidationResult::Incomplete));
        assert!(matches!(validate_input(".load lib.js"), ValidationResult::Valid(None)));
    }

    #[test]
    fn test_completion_candidates() {
        let helper = CjsHelper::new();
        let found: Vec<&String> = helper.matches("module.ex").collect();
        assert_eq!(found, vec!["module.exports", "module.exported"]);
        assert!(helper.matches(".res").any(|c| c == ".reset"));
        assert_eq!(helper.matches("Object.keys").count(), 0);
    }

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("let x = module.ex", 17), 8);
        assert_eq!(word_start("exports", 7), 0);
    }

    #[test]
    fn test_render_exports() {
        let mut engine = Engine::new();
        assert_ok!(engine.eval("exports.foo = 1; exports.foo = 2"));
        assert_eq!(assert_ok!(render_exports(&engine)), "{ foo: 1, foo_1: 2 }");
    }
}
