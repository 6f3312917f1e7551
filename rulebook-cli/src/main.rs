//! Rulebook CLI - validate JSON documents against rule strings.
//!
//! # Commands
//!
//! - `rulebook check --input <file|-> --rule <rule>...` - Validate a document
//!
//! Exit status is 0 when every field passes, 1 when any field fails and 2
//! when the document or the arguments cannot be used.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod error;

use commands::check::{self, CheckOptions};

/// Rulebook CLI - rule-string validation for JSON documents
#[derive(Parser)]
#[command(name = "rulebook")]
#[command(version)]
#[command(about = "Validate JSON documents against rulebook rule strings")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:\n  $ rulebook check --input user.json --rule 'name string required' --rule 'age number between(18,65)'\n  $ cat user.json | rulebook check --input - --rules-file user.rules --locale fa --pretty")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document
    #[command(alias = "c")]
    Check(CheckArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// JSON document to validate, `-` for standard input
    #[arg(short, long)]
    input: PathBuf,

    /// Rule string, one per field (repeatable)
    #[arg(short, long = "rule", value_name = "RULE")]
    rules: Vec<String>,

    /// File with one rule string per line
    #[arg(long, value_name = "FILE")]
    rules_file: Option<PathBuf>,

    /// Message locale
    #[arg(short, long, env = "RULEBOOK_LOCALE", default_value = "en")]
    locale: String,

    /// Directory of `<locale>.json` message overrides
    #[arg(long, env = "RULEBOOK_LOCALES_DIR", value_name = "DIR")]
    locales_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl From<CheckArgs> for CheckOptions {
    fn from(args: CheckArgs) -> Self {
        Self {
            input: args.input,
            rules: args.rules,
            rules_file: args.rules_file,
            locale: args.locale,
            locales_dir: args.locales_dir,
            pretty: args.pretty,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    if cli.verbose {
        rulebook_log::set_debug(true);
    }

    let result = match cli.command {
        Commands::Check(args) => check::run(&args.into()),
    };

    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(e.exit_code());
        }
    }
}
