// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for request handling.
//!
//! Parse errors ("bad shape") and configuration errors ("bad value") are kept
//! apart so a caller can tell which one it hit. Both are raised before any
//! enumeration starts. Timeouts, cancellation and early exit are normal
//! terminal states of the driver, not errors.

use std::num::ParseIntError;
use std::path::PathBuf;

use strum_macros::EnumCount as EnumCountMacro;

/// A request that parsed but cannot be searched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, EnumCountMacro)]
pub enum ConfigError {
    #[error("Requested number of frequencies value too small ({requested})")]
    SetSizeTooSmall { requested: i64 },

    #[error(
        "Too many values in mandatory-frequency set ({mandatory}); must be less than \
         requested number of frequencies in generated sets ({requested})"
    )]
    TooManyMandatory { mandatory: usize, requested: usize },

    #[error("Mandatory-frequency value too low ({0})")]
    MandatoryTooLow(i32),

    #[error("Mandatory-frequency value too high ({0})")]
    MandatoryTooHigh(i32),

    #[error("Mandatory-frequency spacing too tight (minimum separation {min_separation})")]
    MandatorySpacingTooTight { min_separation: i32 },

    #[error("Too many possible frequencies ({count}, max={max})")]
    TooManyCandidates { count: usize, max: usize },

    #[error("Too few possible frequencies")]
    TooFewCandidates,

    #[error("Possible-frequency value too low ({0})")]
    CandidateTooLow(i32),

    #[error("Possible-frequency value too high ({0})")]
    CandidateTooHigh(i32),

    #[error(
        "Requested number of frequencies too large ({requested}); must be smaller than \
         the number of available frequency values ({available})"
    )]
    SetSizeTooLarge { requested: usize, available: usize },

    #[error("Maximum run time must be from 0 to {max} seconds (got {requested})")]
    RunTimeOutOfRange { requested: u64, max: u64 },

    #[error(
        "Too many generator processes are currently running ({running}, limit {limit}); \
         please try again later"
    )]
    TooManyInstances { running: usize, limit: usize },
}

/// Malformed input from an upstream caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid number \"{token}\": {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("unrecognized option \"{0}\"")]
    UnknownOption(String),

    #[error("malformed request file {path}: {detail}")]
    MalformedRequest { path: PathBuf, detail: String },
}

/// Umbrella error for the library and the binary.
#[derive(Debug, thiserror::Error)]
pub enum FreqSetError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not install signal listener: {0}")]
    Signal(#[source] std::io::Error),

    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FreqSetError {
    /// Status line published to the result sink for this error.
    pub fn status_message(&self) -> String {
        match self {
            FreqSetError::Parse(err) => format!("Error parsing numeric input:  {err}"),
            other => format!("Error:  {other}"),
        }
    }
}

pub type FreqSetResult<T> = Result<T, FreqSetError>;
