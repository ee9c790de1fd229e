// crates/rollcall-core/src/validation.rs

use csv::StringRecord;
use rollcall_parser::{AVERAGE_COLUMN, CANONICAL_COLUMNS, ENROLLMENT_COLUMN, NAME_COLUMN};

use crate::error::ValidationError;
use crate::threshold::Threshold;

/// Re-parses a written artifact and checks it against the canonical layout
/// and the threshold bound. Returns the number of data rows on success.
pub fn validate_artifact(contents: &[u8], threshold: Threshold) -> Result<usize, ValidationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(contents);

    let headers = reader.headers().map_err(unreadable)?.clone();
    let columns = ArtifactColumns::resolve(&headers)?;

    let mut rows = 0usize;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(unreadable)?;
        columns.check_row(&record, idx + 1, threshold)?;
        rows += 1;
    }
    Ok(rows)
}

fn unreadable(err: csv::Error) -> ValidationError {
    ValidationError::Unreadable {
        message: err.to_string(),
    }
}

struct ArtifactColumns {
    enrollment: usize,
    name: usize,
    average: usize,
}

impl ArtifactColumns {
    fn resolve(headers: &StringRecord) -> Result<Self, ValidationError> {
        let found = || headers.iter().map(str::to_string).collect::<Vec<_>>();
        let position = |wanted: &str| headers.iter().position(|header| header == wanted);

        let (Some(enrollment), Some(name), Some(average)) = (
            position(ENROLLMENT_COLUMN),
            position(NAME_COLUMN),
            position(AVERAGE_COLUMN),
        ) else {
            return Err(ValidationError::MissingColumns { found: found() });
        };

        if headers.len() != CANONICAL_COLUMNS.len() {
            return Err(ValidationError::UnexpectedColumns { found: found() });
        }

        Ok(Self {
            enrollment,
            name,
            average,
        })
    }

    fn check_row(
        &self,
        record: &StringRecord,
        row: usize,
        threshold: Threshold,
    ) -> Result<(), ValidationError> {
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        if field(self.enrollment).is_empty() || field(self.name).is_empty() {
            return Err(ValidationError::IncompleteRow { row });
        }

        let raw = field(self.average);
        let value = raw
            .parse::<f64>()
            .map_err(|_| ValidationError::NonNumericAverage {
                row,
                value: raw.to_string(),
            })?;

        if !threshold.admits(value) {
            return Err(ValidationError::ThresholdViolation {
                row,
                value,
                threshold,
            });
        }
        Ok(())
    }
}
