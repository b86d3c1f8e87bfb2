//! Error types for the temperature-log reader.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TempLogError>;

/// All failure modes of loading, querying, and rendering the log.
///
/// Load-time variants carry the 1-based line number of the offending line in
/// the raw file, so a broken log can be fixed by hand.
#[derive(Debug, Error)]
pub enum TempLogError {
    /// The log file could not be opened or read.
    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    /// A retained data line does not have exactly 18 whitespace-separated
    /// fields. The trailer line is exempt; it is dropped before this check.
    #[error("line {line}: expected 18 whitespace-separated fields, found {found}")]
    SchemaMismatch { line: usize, found: usize },

    /// The first field of a retained data line is not a valid timestamp.
    #[error("line {line}: timestamp '{value}' does not match %Y-%m-%dT%H:%M:%S")]
    Timestamp { line: usize, value: String },

    /// A caller-supplied timestamp string is not in the log's format.
    #[error("invalid timestamp '{0}', expected %Y-%m-%dT%H:%M:%S")]
    InvalidTimestamp(String),

    /// A channel field of a retained data line is not a number.
    #[error("line {line}: column '{column}' is not numeric")]
    NumericField { line: usize, column: &'static str },

    /// Sensor name outside the supported PLL set.
    #[error("unsupported sensor name '{0}', expected one of b3_pll/b6_pll/b7_pll")]
    UnknownSensor(String),

    /// A min/max summary was requested over a window with no records.
    #[error("no records in window {start} .. {end}")]
    EmptySelection {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Histogram requested with zero buckets.
    #[error("histogram bin count must be greater than zero")]
    InvalidBins,

    /// The plotting backend failed; the message carries backend context.
    #[error("render error: {0}")]
    Render(String),
}
