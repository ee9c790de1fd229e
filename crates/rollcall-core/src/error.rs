// crates/rollcall-core/src/error.rs

use rollcall_parser::MalformedInputError;
use thiserror::Error;

use crate::sink::SinkError;
use crate::threshold::Threshold;

/// A freshly written artifact did not survive read-back.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("missing required columns in the generated file; found columns: {found:?}")]
    MissingColumns { found: Vec<String> },

    #[error("unexpected columns in the generated file; found columns: {found:?}")]
    UnexpectedColumns { found: Vec<String> },

    #[error("row {row} has an 'Average %' of {value}, which is not below the threshold {threshold}")]
    ThresholdViolation {
        row: usize,
        value: f64,
        threshold: Threshold,
    },

    #[error("row {row} has a non-numeric 'Average %' value '{value}'")]
    NonNumericAverage { row: usize, value: String },

    #[error("row {row} is missing an enrollment number or name")]
    IncompleteRow { row: usize },

    #[error("artifact could not be read back: {message}")]
    Unreadable { message: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no input files were supplied")]
    NoInputs,

    #[error("{input}: {source}")]
    MalformedInput {
        input: String,
        #[source]
        source: MalformedInputError,
    },

    #[error("file generation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("artifact storage failed: {0}")]
    Sink(#[from] SinkError),

    #[error("dataframe operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("failed to serialize artifact: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
