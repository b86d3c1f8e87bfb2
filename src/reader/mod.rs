//! Log loading and the main `LogReader` type.
//!
//! This module defines the reader struct and its construction; the time-range
//! query operations live in the `temporal` submodule.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{Result, TempLogError};
use crate::schema::{CHANNEL_COUNT, COLUMN_COUNT, COLUMNS};
use crate::types::LogRecord;

mod temporal;

pub use temporal::DEFAULT_HIST_BINS;

/// Timestamp format of the `hst` column, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a timestamp string in the log's one accepted format.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|_| TempLogError::InvalidTimestamp(value.to_string()))
}

/// In-memory view of one temperature log file (single-threaded by design).
///
/// The file is read once at construction and held immutably; query methods
/// are pure computations over the resident dataset and perform no I/O.
/// Records keep the file's own order and are never re-sorted.
///
/// # Examples
///
/// ```rust,no_run
/// use namakanui_templog::{LogReader, parse_timestamp};
///
/// let log = LogReader::open(LogReader::default_path())?;
/// let start = parse_timestamp("2019-10-11T06:10:00")?;
/// let end = parse_timestamp("2019-10-11T20:20:00")?;
/// let (min_c, max_c) = log.pll_temperature_range("b6_pll", start, end, None)?;
/// println!("b6 PLL stayed within {min_c:.2} .. {max_c:.2} °C");
/// # Ok::<(), namakanui_templog::TempLogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LogReader {
    path: PathBuf,
    records: Vec<LogRecord>,
}

impl LogReader {
    /// Conventional name the instrument writes the log under.
    pub fn default_path() -> &'static str {
        "namakanui_temp.log"
    }

    /// Load a log file into memory.
    ///
    /// Lines whose first non-whitespace byte is `#` are comments and
    /// skipped, as are blank lines. The final data line is always dropped
    /// unconditionally: the instrument appends to the log while it is open,
    /// so the last line is a known-incomplete trailer. Every retained line
    /// must then carry exactly 18 whitespace-separated fields, a timestamp
    /// first and 17 numeric channels after it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;

        let mut lines: Vec<(usize, Vec<&str>)> = raw
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let trimmed = line.trim_start();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .map(|(index, line)| (index + 1, line.split_whitespace().collect()))
            .collect();

        // Trailer rule: applied before any field-count validation.
        if let Some((line, _)) = lines.pop() {
            log::debug!("dropped trailer at line {line}");
        }

        let mut records = Vec::with_capacity(lines.len());
        for (line, fields) in lines {
            if fields.len() != COLUMN_COUNT {
                return Err(TempLogError::SchemaMismatch {
                    line,
                    found: fields.len(),
                });
            }

            let hst = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT).map_err(|_| {
                TempLogError::Timestamp {
                    line,
                    value: fields[0].to_string(),
                }
            })?;

            let mut channels = [0.0_f64; CHANNEL_COUNT];
            for (index, field) in fields[1..].iter().enumerate() {
                channels[index] = field.parse().map_err(|_| TempLogError::NumericField {
                    line,
                    column: COLUMNS[index + 1].name,
                })?;
            }

            records.push(LogRecord { hst, channels });
        }

        log::info!("loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Path the log was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in file order.
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last timestamps as stored, `None` for an empty dataset.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.hst, last.hst)),
            _ => None,
        }
    }
}
