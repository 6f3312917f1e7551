//! `rulebook check`: validate one JSON document.

use crate::error::{CliError, CliResult};
use rulebook_log::{debug, info};
use rulebook_validation::{ValidateError, Validator, ValidatorConfig, Values};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Result of a completed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every field passed; the values were printed
    Valid,
    /// At least one field failed; the messages were printed
    Invalid,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Valid => 0,
            Outcome::Invalid => 1,
        }
    }
}

/// Options of one check run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub input: PathBuf,
    pub rules: Vec<String>,
    pub rules_file: Option<PathBuf>,
    pub locale: String,
    pub locales_dir: Option<PathBuf>,
    pub pretty: bool,
}

pub fn run(options: &CheckOptions) -> CliResult<Outcome> {
    let rules = collect_rules(&options.rules, options.rules_file.as_deref())?;
    if rules.is_empty() {
        return Err(CliError::InvalidArgument(
            "no rules given; use --rule or --rules-file".to_string(),
        ));
    }

    let mut config = ValidatorConfig::from_env().with_locale(&options.locale);
    if let Some(dir) = &options.locales_dir {
        config = config.with_locales_dir(dir);
    }
    let validator = Validator::from_config(&config)?;

    let raw = read_input(&options.input)?;
    debug!(["rules" => rules.len(), "bytes" => raw.len()], "Checking document");

    let (outcome, output) = match validator.validate(&raw, rules.as_slice()) {
        Ok(values) => (Outcome::Valid, values_json(&values)),
        Err(ValidateError::Failed(errors)) => {
            info!(["failed" => errors.len()], "Document rejected");
            (Outcome::Invalid, errors.to_json())
        }
        Err(ValidateError::MalformedInput(reason)) => return Err(CliError::MalformedInput(reason)),
    };

    let rendered = if options.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(outcome)
}

fn values_json(values: &Values) -> serde_json::Value {
    serde_json::Value::Object(
        values
            .iter()
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect(),
    )
}

/// Rules given on the command line, then one per line of the rules file.
/// Blank lines and lines starting with `#` are skipped.
fn collect_rules(inline: &[String], file: Option<&Path>) -> CliResult<Vec<String>> {
    let mut rules = inline.to_vec();
    if let Some(path) = file {
        let text = fs::read_to_string(path)?;
        rules.extend(parse_rules_file(&text));
    }
    Ok(rules)
}

fn parse_rules_file(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

/// The document text; `-` reads standard input.
fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    Ok(fs::read_to_string(path)?)
}
