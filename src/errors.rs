//! Error types for database loading and run orchestration.
//!
//! Parsing is strict: the verification engine assumes every fingerprint
//! handed to it is internally consistent, so anything questionable in a
//! database file must be rejected here rather than surfacing as a
//! confusing mismatch later.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a single fingerprint database file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reading file: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    #[error("invalid TOML: {source}")]
    Toml {
        #[source]
        source: toml::de::Error,
    },

    #[error("fingerprint '{name}': invalid pattern: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("fingerprint '{name}': unknown regex flag '{flag}'")]
    Flag { name: String, flag: char },

    #[error("fingerprint '{name}': param '{param}': {reason}")]
    Param {
        name: String,
        param: String,
        reason: String,
    },

    #[error("fingerprint '{name}': example {index}: {reason}")]
    Example {
        name: String,
        index: usize,
        reason: String,
    },

    #[error("fingerprint '{name}': example file '{file}': {source}")]
    ExampleFile {
        name: String,
        file: String,
        #[source]
        source: io::Error,
    },
}

/// Fatal conditions that abort a verification run. Everything here
/// maps to exit status 255 except [`RunError::NoMatches`], which is a
/// usage error.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("processing pattern '{pattern}': {source}")]
    Walk {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("pattern '{pattern}' matched no files")]
    NoMatches { pattern: String },

    #[error("parsing fingerprint file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("writing report: {source}")]
    Output {
        #[from]
        source: anyhow::Error,
    },
}
