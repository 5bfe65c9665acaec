//! Error types for simulation log parsing

use thiserror::Error;

/// Errors during log line parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing timestamp segment at line {line_number}")]
    MissingTimestamp { line_number: u64 },

    #[error("invalid timestamp at line {line_number}: {segment}")]
    InvalidTimestamp { line_number: u64, segment: String },

    #[error("missing source segment at line {line_number}")]
    MissingSource { line_number: u64 },
}
