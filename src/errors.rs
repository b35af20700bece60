//! Error types with rich diagnostics using miette
//!
//! Chart file errors carry source spans for readable messages. Validation
//! errors are raised once, when a chart is built, and never during rendering.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Chart file errors
// ============================================================================

/// Errors that occur while reading a chart configuration file
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(starcharter::parse::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("setting `{key}` appears before any DEFAULTS or CHART heading")]
    #[diagnostic(
        code(starcharter::parse::no_heading),
        help("start the file with a `DEFAULTS` or `CHART` line")
    )]
    SettingOutsideSection {
        key: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("no section is open")]
        span: SourceSpan,
    },

    #[error("unknown setting: {key}")]
    #[diagnostic(code(starcharter::parse::unknown_key))]
    UnknownKey {
        key: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a chart setting")]
        span: SourceSpan,
        #[help]
        suggestion: Option<String>,
    },

    #[error("invalid number for `{key}`: {value}")]
    #[diagnostic(code(starcharter::parse::invalid_number))]
    InvalidNumber {
        key: String,
        value: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a number")]
        span: SourceSpan,
    },

    #[error("invalid value for `{key}`: {value}")]
    #[diagnostic(code(starcharter::parse::invalid_choice))]
    InvalidChoice {
        key: String,
        value: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not one of the accepted values")]
        span: SourceSpan,
        #[help]
        expected: String,
    },
}

// ============================================================================
// Validation errors
// ============================================================================

/// A chart configuration that cannot be rendered
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid {field}: {source}")]
    #[diagnostic(code(starcharter::config::invalid_value))]
    InvalidValue {
        field: &'static str,
        #[source]
        source: NumericError,
    },

    #[error("angular width {width_deg}° is too wide for the {projection} projection (limit {max_deg}°)")]
    #[diagnostic(
        code(starcharter::config::too_wide),
        help("reduce angular_width or pick the stereographic projection")
    )]
    TooWide {
        projection: &'static str,
        width_deg: f64,
        max_deg: f64,
    },

    #[error("{what} requires an observer location and time")]
    #[diagnostic(
        code(starcharter::config::missing_observer),
        help("set horizon_latitude, horizon_longitude and julian_date")
    )]
    MissingObserver { what: &'static str },

    #[error("the multi-latitude projection needs at least one strip")]
    #[diagnostic(code(starcharter::config::no_strips))]
    NoStrips,
}

/// Errors from reading and validating a whole chart file
#[derive(Error, Diagnostic, Debug)]
pub enum ChartFileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("chart #{index} is invalid")]
    #[diagnostic(code(starcharter::config::invalid_chart))]
    Invalid {
        index: usize,
        #[source]
        #[diagnostic_source]
        source: ConfigError,
    },
}

// ============================================================================
// Calendar errors
// ============================================================================

/// A calendar date that cannot be turned into a Julian date
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("{field} {value} is out of range ({range})")]
    #[diagnostic(code(starcharter::time::out_of_range))]
    OutOfRange {
        field: &'static str,
        value: i64,
        range: &'static str,
    },

    #[error("{year}-{month:02}-{day:02} never happened: it was skipped in the switch to the Gregorian calendar")]
    #[diagnostic(code(starcharter::time::lost_day))]
    LostDay { year: i32, month: u32, day: u32 },
}
