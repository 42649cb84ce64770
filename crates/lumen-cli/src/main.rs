//! Lumen CLI
//!
//! Command-line front end for the Lumen parser: parse files, dump trees,
//! and report diagnostics.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lumen_syntax::{ParseOptions, ast, init_tracing, parse_compilation_unit};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Parse Lumen source files and report syntax diagnostics")]
#[command(version = lumen_syntax::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Recognize `#:` ignored-metadata directives
    #[arg(long, global = true)]
    allow_ignored_directives: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its syntax tree
    Parse {
        /// Path to a Lumen source file
        file: PathBuf,
    },
    /// Parse a file and report only its diagnostics
    Check {
        /// Path to a Lumen source file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose > 0 {
        let level = match cli.verbose {
            1 => "lumen=debug",
            _ => "lumen=trace",
        };
        unsafe {
            std::env::set_var("RUST_LOG", level);
        }
    }
    init_tracing();
    match run(&cli) {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let options = ParseOptions {
        allow_ignored_directives: cli.allow_ignored_directives,
    };
    match &cli.command {
        Commands::Parse { file } => {
            let (source, parse) = parse_file(file, &options)?;
            if cli.json {
                print_json(file, &source, &parse)?;
            } else {
                print!("{}", ast::debug_dump(&parse.syntax()));
                print_text_diagnostics(file, &source, &parse);
            }
            Ok(!parse.has_errors())
        }
        Commands::Check { file } => {
            let (source, parse) = parse_file(file, &options)?;
            if cli.json {
                print_json(file, &source, &parse)?;
            } else {
                print_text_diagnostics(file, &source, &parse);
                if !parse.has_errors() {
                    println!("{}: no syntax errors", file.display());
                }
            }
            Ok(!parse.has_errors())
        }
    }
}

fn parse_file(
    file: &Path,
    options: &ParseOptions,
) -> anyhow::Result<(String, lumen_syntax::Parse)> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parse = parse_compilation_unit(&source, options)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    tracing::debug!(
        file = %file.display(),
        diagnostics = parse.diagnostics().len(),
        "parsed"
    );
    Ok((source, parse))
}

fn print_text_diagnostics(file: &Path, source: &str, parse: &lumen_syntax::Parse) {
    for diagnostic in parse.diagnostics() {
        let (line, column) = line_column(source, diagnostic.start);
        eprintln!(
            "{}:{line}:{column}: error: {}",
            file.display(),
            diagnostic.message()
        );
    }
}

fn print_json(file: &Path, source: &str, parse: &lumen_syntax::Parse) -> anyhow::Result<()> {
    let diagnostics: Vec<serde_json::Value> = parse
        .diagnostics()
        .iter()
        .map(|d| {
            let (line, column) = line_column(source, d.start);
            serde_json::json!({
                "code": d.code,
                "message": d.message(),
                "start": d.start,
                "length": d.length,
                "line": line,
                "column": column,
            })
        })
        .collect();
    let report = serde_json::json!({
        "file": file.display().to_string(),
        "diagnostics": diagnostics,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// 1-based line and column for a byte offset. Columns count bytes; good
/// enough for terminal output.
fn line_column(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let before = &source[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = before
        .rfind('\n')
        .map(|nl| offset - nl)
        .unwrap_or(offset + 1);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_counts_from_one() {
        let src = "ab\ncd";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 2), (1, 3));
        assert_eq!(line_column(src, 3), (2, 1));
        assert_eq!(line_column(src, 4), (2, 2));
    }
}
