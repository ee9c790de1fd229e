use polars::prelude::*;
use rollcall_parser::{rows_from_dataframe, CanonicalRow, AVERAGE_COLUMN};
use tracing::{debug, warn};

use crate::aggregate::AggregatedTable;
use crate::artifact::{artifact_stem, render_artifact, ARTIFACT_EXTENSION};
use crate::error::{PipelineError, Result, ValidationError};
use crate::pipeline::PipelineStage;
use crate::sink::{ArtifactHandle, ArtifactSink, SinkError};
use crate::threshold::Threshold;
use crate::validation::validate_artifact;

/// Rows whose average is strictly below `threshold`, in aggregated order.
pub fn filter_below(table: &AggregatedTable, threshold: Threshold) -> PolarsResult<Vec<CanonicalRow>> {
    let filtered = table
        .to_dataframe()?
        .lazy()
        .filter(col(AVERAGE_COLUMN).lt(lit(threshold.value())))
        .collect()?;
    rows_from_dataframe(&filtered)
}

/// Filters, writes one uniquely named artifact and validates it by reading it
/// back. An artifact that fails validation is deleted before the error is
/// returned, so the caller only ever receives a handle to a valid file.
pub fn filter_and_validate(
    table: &AggregatedTable,
    threshold: Threshold,
    sink: &dyn ArtifactSink,
) -> Result<ArtifactHandle> {
    write_validated(table, threshold, sink).map(|(handle, _)| handle)
}

pub(crate) fn write_validated(
    table: &AggregatedTable,
    threshold: Threshold,
    sink: &dyn ArtifactSink,
) -> Result<(ArtifactHandle, Vec<CanonicalRow>)> {
    debug!(stage = %PipelineStage::Filtering, rows = table.len(), %threshold);
    let kept = filter_below(table, threshold)?;

    let key = sink.unique_key(&artifact_stem(threshold), ARTIFACT_EXTENSION);
    debug!(stage = %PipelineStage::Writing, key = %key, rows = kept.len());
    let bytes = render_artifact(&kept)?;
    if let Err(err) = sink.put_artifact(&key, &bytes) {
        // a failed write may still leave a partial file behind
        if !matches!(err, SinkError::AlreadyExists(_)) {
            discard(sink, &key);
        }
        return Err(err.into());
    }

    debug!(stage = %PipelineStage::Validating, key = %key);
    let validated = sink
        .get_artifact(&key)
        .map_err(|err| ValidationError::Unreadable {
            message: err.to_string(),
        })
        .and_then(|contents| validate_artifact(&contents, threshold));

    match validated {
        Ok(rows) => {
            let location = sink.locate(&key);
            Ok((ArtifactHandle { key, location, rows }, kept))
        }
        Err(err) => {
            debug!(stage = %PipelineStage::Failed, key = %key, error = %err);
            discard(sink, &key);
            Err(PipelineError::Validation(err))
        }
    }
}

fn discard(sink: &dyn ArtifactSink, key: &str) {
    match sink.delete_artifact(key) {
        Ok(()) | Err(SinkError::NotFound(_)) => {}
        Err(err) => warn!(key, error = %err, "failed to delete rejected artifact"),
    }
}
