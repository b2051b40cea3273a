use thiserror::Error;

/// Failure to parse a tabular payload.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no header row found")]
    MissingHeader,

    #[error("row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Failure to aggregate a table on a chosen variable.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("no grouping dimension (region, site or country) in dataset")]
    NoGroupingDimension,
}
