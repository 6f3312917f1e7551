//! Rulebook Logging
//!
//! Small structured logger used by the rulebook crates, controlled entirely
//! through environment variables.
//!
//! # Usage
//!
//! ```rust
//! use rulebook_log::{debug, info, trace, warn};
//!
//! info!("Loaded {} rule strings", 3);
//! warn!(target: "rulebook::entry", "Malformed input document");
//!
//! // Structured fields come first, in brackets
//! let field = "age";
//! debug!(["field" => field, "outcome" => "ok"], "Field validated");
//! trace!(["verb" => "required"], "Dispatching verb");
//! ```
//!
//! # Environment Variables
//!
//! - `RULEBOOK_DEBUG=1` - Enable debug logging
//! - `RULEBOOK_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `RULEBOOK_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `RULEBOOK_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `RULEBOOK_LOG_COLOR=1|0` - Color level names in pretty output (`color` feature)

use once_cell::sync::Lazy;
use std::env;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Per-verb dispatch detail
    Trace = 0,
    /// Per-field outcomes
    Debug = 1,
    /// Lifecycle messages
    Info = 2,
    /// Rejected input
    Warn = 3,
    /// Failures
    Error = 4,
    /// Nothing is logged
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Upper-case level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    /// Colored level name.
    #[cfg(feature = "color")]
    pub fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => "TRACE".magenta(),
            Level::Debug => "DEBUG".blue(),
            Level::Info => "INFO".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red().bold(),
            Level::Off => "OFF".white(),
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// Rendering of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `timestamp LEVEL [target] message key=value`
    Pretty,
    /// Single letter level, short timestamp
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(|| {
    let config = LogConfig::from_env();
    DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
    LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
    config
});

/// Logger configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `RULEBOOK_DEBUG` was set
    pub debug: bool,
    /// Minimum level written
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Prefix records with a timestamp
    pub timestamps: bool,
    /// Color level names in pretty output; needs the `color` feature
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Compact,
            timestamps: true,
            color: false,
        }
    }
}

impl LogConfig {
    /// Build the configuration from `RULEBOOK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let debug = env::var("RULEBOOK_DEBUG").map(|v| is_truthy(&v)).unwrap_or(false);

        let level = env::var("RULEBOOK_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("RULEBOOK_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(defaults.format);

        let timestamps = env::var("RULEBOOK_LOG_TIMESTAMPS")
            .map(|v| is_truthy(&v))
            .unwrap_or(defaults.timestamps);

        let color = env::var("RULEBOOK_LOG_COLOR")
            .map(|v| is_truthy(&v))
            .unwrap_or(defaults.color);

        Self {
            debug,
            level,
            format,
            timestamps,
            color,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Force the environment to be read now instead of at the first record.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Whether `RULEBOOK_DEBUG` (or [`set_debug`]) turned debug output on.
#[inline]
pub fn is_debug_enabled() -> bool {
    Lazy::force(&CONFIG);
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether records at `level` are written.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    Lazy::force(&CONFIG);
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Current minimum level.
pub fn current_level() -> Level {
    Lazy::force(&CONFIG);
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    Lazy::force(&CONFIG);
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode at runtime. Enabling it lowers the level to `Debug`.
pub fn set_debug(enabled: bool) {
    Lazy::force(&CONFIG);
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

/// The configuration read from the environment.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Records
// ============================================================================

/// A single log record before rendering.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: Level,
    pub target: &'a str,
    pub message: &'a str,
    pub fields: &'a [(&'a str, String)],
}

/// Write a record to stderr if its level is enabled.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str, fields: &[(&str, String)]) {
    if !is_level_enabled(level) {
        return;
    }

    let record = Record {
        level,
        target,
        message,
        fields,
    };
    eprintln!("{}", render(&record, config()));
}

/// Render a record into a single line without the trailing newline.
pub fn render(record: &Record<'_>, config: &LogConfig) -> String {
    match config.format {
        Format::Pretty => render_pretty(record, config),
        Format::Compact => render_compact(record, config),
        Format::Json => render_json(record, config),
    }
}

fn render_pretty(record: &Record<'_>, config: &LogConfig) -> String {
    let mut line = String::new();
    if config.timestamps {
        let _ = write!(line, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"));
    }
    #[cfg(feature = "color")]
    if config.color {
        let _ = write!(line, "{:5} ", record.level.colored());
    } else {
        let _ = write!(line, "{:5} ", record.level.as_str());
    }

    #[cfg(not(feature = "color"))]
    let _ = write!(line, "{:5} ", record.level.as_str());

    if !record.target.is_empty() {
        let _ = write!(line, "[{}] ", record.target);
    }
    line.push_str(record.message);
    push_pairs(&mut line, record.fields);
    line
}

fn render_compact(record: &Record<'_>, config: &LogConfig) -> String {
    let mut line = String::new();
    if config.timestamps {
        let _ = write!(line, "{} ", chrono::Local::now().format("%H:%M:%S"));
    }
    let initial = record.level.as_str().chars().next().unwrap_or('?');
    let _ = write!(line, "{} ", initial);
    if !record.target.is_empty() {
        let _ = write!(line, "{}: ", record.target);
    }
    line.push_str(record.message);
    push_pairs(&mut line, record.fields);
    line
}

fn push_pairs(line: &mut String, fields: &[(&str, String)]) {
    for (key, value) in fields {
        if value.contains(' ') {
            let _ = write!(line, " {}={:?}", key, value);
        } else {
            let _ = write!(line, " {}={}", key, value);
        }
    }
}

#[cfg(feature = "json")]
fn render_json(record: &Record<'_>, config: &LogConfig) -> String {
    let mut entry = serde_json::Map::new();
    if config.timestamps {
        entry.insert(
            "timestamp".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    entry.insert("level".to_string(), record.level.as_str().into());
    entry.insert("target".to_string(), record.target.into());
    entry.insert("message".to_string(), record.message.into());
    for (key, value) in record.fields {
        entry.insert((*key).to_string(), value.as_str().into());
    }
    serde_json::Value::Object(entry).to_string()
}

#[cfg(not(feature = "json"))]
fn render_json(record: &Record<'_>, config: &LogConfig) -> String {
    let mut line = String::from("{");
    if config.timestamps {
        let _ = write!(line, r#""timestamp":"{}","#, chrono::Utc::now().to_rfc3339());
    }
    let _ = write!(
        line,
        r#""level":"{}","target":"{}","message":"{}""#,
        record.level.as_str(),
        escape_json(record.target),
        escape_json(record.message)
    );
    for (key, value) in record.fields {
        let _ = write!(line, r#","{}":"{}""#, escape_json(key), escape_json(value));
    }
    line.push('}');
    line
}

#[cfg(not(feature = "json"))]
fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result
}

// ============================================================================
// Macros
// ============================================================================

/// Shared expansion for the level macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, target: $target:expr, [$($key:literal => $value:expr),* $(,)?], $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log(
                $level,
                $target,
                &format!($($arg)+),
                &[$(($key, ($value).to_string())),*],
            );
        }
    };
    ($level:expr, target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log($level, $target, &format!($($arg)+), &[]);
        }
    };
    ($level:expr, [$($key:literal => $value:expr),* $(,)?], $($arg:tt)+) => {
        $crate::__log_at!($level, target: module_path!(), [$($key => $value),*], $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::__log_at!($level, target: module_path!(), $($arg)+)
    };
}

/// Log a trace record.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Trace, $($arg)+) };
}

/// Log a debug record.
///
/// Written when `RULEBOOK_DEBUG=1` or `RULEBOOK_LOG_LEVEL` is `debug` or lower.
///
/// ```rust
/// use rulebook_log::debug;
///
/// let field = "email";
/// debug!(["field" => field], "Field failed");
/// debug!(target: "rulebook::engine", "Scanning {} rules", 2);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Debug, $($arg)+) };
}

/// Log an info record.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Info, $($arg)+) };
}

/// Log a warning record.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Warn, $($arg)+) };
}

/// Log an error record.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Error, $($arg)+) };
}
