pub mod aggregate;
pub mod artifact;
pub mod error;
pub mod filter;
pub mod input;
pub mod pipeline;
pub mod sink;
pub mod threshold;
pub mod validation;

pub use aggregate::{aggregate, AggregatedTable};
pub use artifact::format_decimal;
pub use error::{PipelineError, Result, ValidationError};
pub use filter::{filter_and_validate, filter_below};
pub use input::SourceFile;
pub use pipeline::{run_pipeline, PipelineStage, PipelineSummary};
pub use sink::{ArtifactHandle, ArtifactSink, LocalDirSink, MemorySink, SinkError};
pub use threshold::{Threshold, ThresholdError};
pub use validation::validate_artifact;

pub use rollcall_parser::{CanonicalRow, MalformedInputError, CANONICAL_COLUMNS};
