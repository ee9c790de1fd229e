use std::fmt;

use chrono::{DateTime, Utc};
use rollcall_parser::CanonicalRow;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::aggregate::aggregate;
use crate::error::Result;
use crate::filter::write_validated;
use crate::input::SourceFile;
use crate::sink::{ArtifactHandle, ArtifactSink};
use crate::threshold::Threshold;

/// States of one invocation. Every run moves forward through these and ends
/// in `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Aggregating,
    Filtering,
    Writing,
    Validating,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::Filtering => "filtering",
            PipelineStage::Writing => "writing",
            PipelineStage::Validating => "validating",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub artifact: ArtifactHandle,
    pub threshold: Threshold,
    pub inputs: Vec<String>,
    pub aggregated_rows: usize,
    pub dropped_rows: usize,
    pub kept_rows: usize,
    pub rows: Vec<CanonicalRow>,
    pub generated_at: DateTime<Utc>,
}

/// Runs one batch end to end: aggregate every input, filter by `threshold`,
/// write the artifact through `sink` and validate it.
pub fn run_pipeline(
    inputs: &[SourceFile],
    threshold: Threshold,
    sink: &dyn ArtifactSink,
) -> Result<PipelineSummary> {
    let span = info_span!("pipeline", inputs = inputs.len(), %threshold);
    let _entered = span.enter();

    debug!(stage = %PipelineStage::Aggregating);
    let aggregated = aggregate(inputs).inspect_err(|err| {
        debug!(stage = %PipelineStage::Failed, error = %err);
    })?;

    let (artifact, rows) = write_validated(&aggregated, threshold, sink)?;

    info!(
        stage = %PipelineStage::Done,
        key = %artifact.key,
        aggregated = aggregated.len(),
        kept = rows.len(),
        "artifact validated"
    );

    Ok(PipelineSummary {
        threshold,
        inputs: aggregated.sources,
        aggregated_rows: aggregated.rows.len(),
        dropped_rows: aggregated.dropped_rows,
        kept_rows: rows.len(),
        rows,
        artifact,
        generated_at: Utc::now(),
    })
}
