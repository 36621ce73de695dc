use std::path::PathBuf;
use thiserror::Error;

/// Data-quality and input failures. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: malformed value: {message}")]
    Malformed { row: usize, message: String },

    #[error("row {row}: {field} = {value} is out of range")]
    OutOfRange {
        row: usize,
        field: &'static str,
        value: f64,
    },

    #[error("no bike rows found in input")]
    Empty,

    #[error("bike '{bike}': cannot complete geometry, {field} is missing")]
    IncompleteGeometry { bike: String, field: &'static str },

    #[error("bike '{bike}': derived {field} is not a finite number")]
    NonFinite { bike: String, field: &'static str },

    #[error("bike '{bike}': cartesian and polar fields disagree by {deviation_mm:.3} mm (tolerance {tolerance_mm} mm)")]
    InconsistentGeometry {
        bike: String,
        deviation_mm: f64,
        tolerance_mm: f64,
    },

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<DataError>,
    },

    #[error("record {index} requested but the table has {len} rows")]
    RecordIndex { index: usize, len: usize },
}

impl DataError {
    /// Attach a 1-based data row number.
    pub fn at_row(self, row: usize) -> Self {
        DataError::Row {
            row,
            source: Box::new(self),
        }
    }
}
