use thiserror::Error;

/// Raised when an export cannot be shaped into the canonical three-column table.
#[derive(Debug, Error)]
pub enum MalformedInputError {
    #[error("could not find '{marker}' in the first column; ensure the file is properly formatted")]
    MarkerNotFound { marker: &'static str },

    #[error("header row {row_index} is missing required columns {missing:?}; found columns: {found:?}")]
    MissingColumns {
        row_index: usize,
        missing: Vec<&'static str>,
        found: Vec<String>,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
}

impl From<csv::Error> for MalformedInputError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}
