use polars::prelude::{DataFrame, PolarsResult};
use rollcall_parser::{canonical_dataframe, CanonicalRow, CanonicalTable};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::input::SourceFile;

/// Canonical rows from every input, file order first, then row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedTable {
    pub rows: Vec<CanonicalRow>,
    pub dropped_rows: usize,
    pub sources: Vec<String>,
}

impl AggregatedTable {
    pub fn from_rows(rows: Vec<CanonicalRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn push_table(&mut self, source: &str, table: CanonicalTable) {
        self.sources.push(source.to_string());
        self.dropped_rows += table.dropped_rows;
        self.rows.extend(table.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        canonical_dataframe(&self.rows)
    }
}

/// Normalizes each input in order and concatenates the results. The first
/// malformed input aborts the whole batch.
pub fn aggregate(inputs: &[SourceFile]) -> Result<AggregatedTable> {
    if inputs.is_empty() {
        return Err(PipelineError::NoInputs);
    }

    let mut aggregated = AggregatedTable::default();
    for input in inputs {
        let canonical = input
            .normalize()
            .map_err(|source| PipelineError::MalformedInput {
                input: input.name.clone(),
                source,
            })?;
        debug!(
            input = %input.name,
            rows = canonical.len(),
            dropped = canonical.dropped_rows,
            "normalized input"
        );
        aggregated.push_table(&input.name, canonical);
    }
    Ok(aggregated)
}
