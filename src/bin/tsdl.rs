#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::io::IsTerminal;

use tsdl::cli::args::CliArgs;
use tsdl::cli::{driver, reporter::Reporter};

/// tsc exit status codes (matching TypeScript's ExitStatus enum)
const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS_OUTPUTS_SKIPPED: i32 = 1;
const EXIT_DIAGNOSTICS_OUTPUTS_GENERATED: i32 = 2;

fn main() -> Result<()> {
    // Initialize tracing if TSDL_LOG or RUST_LOG is set (zero cost otherwise).
    tsdl::tracing_config::init_tracing();

    // Preprocess args for tsc compatibility:
    // - Convert -v to -V (tsc uses lowercase -v for version, clap uses -V)
    // - Expand @file response files
    let preprocessed = preprocess_args(std::env::args_os().collect());
    let args = CliArgs::parse_from(preprocessed);
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let result = driver::compile(&args, &cwd)?;

    // Handle --listFiles: print all files read during compilation
    if args.list_files {
        for file in &result.files_read {
            println!("{}", file.display());
        }
    }

    // Handle --listEmittedFiles: print emitted file list
    if args.list_emitted_files && !result.emitted_files.is_empty() {
        for file in &result.emitted_files {
            println!("TSFILE: {}", file.display());
        }
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&result.diagnostics)
            .context("failed to serialize diagnostics")?;
        println!("{rendered}");
    } else if !result.diagnostics.is_empty() {
        let pretty = args
            .pretty
            .unwrap_or_else(|| std::io::stderr().is_terminal());
        let mut reporter = Reporter::new(pretty);
        let output = reporter.render(&result.diagnostics);
        if !output.is_empty() {
            // Use eprint (not eprintln) because render() already includes all newlines
            eprint!("{output}");
        }
    }

    let has_errors = result.diagnostics.iter().any(|diag| diag.is_error());

    if has_errors {
        // Match tsc exit codes:
        // tsc uses exit code 2 when there are errors (DiagnosticsPresent_OutputsGenerated)
        // regardless of whether --noEmit is set. Exit code 1 is only for when emit
        // is explicitly skipped due to errors (noEmitOnError).
        if args.no_emit || !result.emitted_files.is_empty() {
            std::process::exit(EXIT_DIAGNOSTICS_OUTPUTS_GENERATED);
        } else {
            std::process::exit(EXIT_DIAGNOSTICS_OUTPUTS_SKIPPED);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Preprocess command-line arguments for tsc compatibility.
///
/// Handles:
/// - `-v` → `-V` conversion (tsc uses lowercase `-v` for version; clap uses `-V`)
/// - `@file` response file expansion (tsc reads args from response files)
fn preprocess_args(args: Vec<OsString>) -> Vec<OsString> {
    let mut result = Vec::with_capacity(args.len());

    for (i, arg) in args.iter().enumerate() {
        let arg_str = arg.to_string_lossy();

        if i == 0 {
            // Always keep the program name as-is
            result.push(arg.clone());
            continue;
        }

        if arg_str == "-v" {
            result.push(OsString::from("-V"));
        } else if arg_str.starts_with('@') && arg_str.len() > 1 {
            // Response file: @path reads arguments from file
            let path = &arg_str[1..];
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    for line in content.lines() {
                        let trimmed = line.trim();
                        // Skip empty lines and comments
                        if !trimmed.is_empty() && !trimmed.starts_with('#') {
                            for part in split_response_line(trimmed) {
                                result.push(OsString::from(part));
                            }
                        }
                    }
                }
                Err(_) => {
                    // If the file can't be read, pass the argument through
                    // (clap will report an unknown argument error)
                    result.push(arg.clone());
                }
            }
        } else {
            result.push(arg.clone());
        }
    }

    result
}

/// Split a response file line into arguments, respecting quoted strings.
///
/// Handles both double (`"`) and single (`'`) quotes. Quotes are stripped
/// from the resulting tokens. Unquoted regions are split on whitespace.
fn split_response_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;

    for ch in line.chars() {
        match in_quote {
            Some(q) if ch == q => {
                // Closing quote ends the quoted region but does not flush:
                // adjacent content concatenates (e.g. foo"bar"baz)
                in_quote = None;
            }
            Some(_) => {
                current.push(ch);
            }
            None if ch == '"' || ch == '\'' => {
                in_quote = Some(ch);
            }
            None if ch.is_ascii_whitespace() => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            None => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}
