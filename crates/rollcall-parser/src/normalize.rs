use crate::errors::MalformedInputError;
use crate::model::{CanonicalRow, CanonicalTable, RawTable};
use crate::schema::{
    AVERAGE_COLUMN, CANONICAL_COLUMNS, ENROLLMENT_COLUMN, HEADER_MARKER, MISSING_TOKENS,
    NAME_COLUMN,
};

/// Index of the first row whose first cell contains the header marker.
///
/// Exports carry a variable amount of preamble (institution, course, dates)
/// above the real header, so this is the single place that decides where the
/// data region starts. A later row carrying the marker is ignored.
pub fn locate_header_row(table: &RawTable) -> Option<usize> {
    table.rows().iter().position(|row| {
        row.first()
            .is_some_and(|cell| cell.contains(HEADER_MARKER))
    })
}

/// Cuts the data region out of a raw export and reduces it to the canonical
/// three columns. Rows with a missing id, name or non-numeric average are
/// dropped and counted.
pub fn normalize(table: &RawTable) -> Result<CanonicalTable, MalformedInputError> {
    let header_index = locate_header_row(table).ok_or(MalformedInputError::MarkerNotFound {
        marker: HEADER_MARKER,
    })?;
    let rows = table.rows();
    let selection = ColumnSelection::resolve(header_index, &rows[header_index])?;

    let mut canonical = CanonicalTable::default();
    for row in &rows[header_index + 1..] {
        match selection.extract(row) {
            Some(parsed) => canonical.rows.push(parsed),
            None => canonical.dropped_rows += 1,
        }
    }
    Ok(canonical)
}

/// Best-effort numeric reading of an `Average %` cell.
pub fn coerce_average(value: &str) -> Option<f64> {
    let trimmed = present(value)?;
    let number = trimmed
        .strip_suffix('%')
        .map(str::trim_end)
        .unwrap_or(trimmed);
    number.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// True when a cell holds no usable value: blank or a conventional NA token.
pub fn is_missing(value: &str) -> bool {
    present(value).is_none()
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed)
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnSelection {
    enrollment: usize,
    name: usize,
    average: usize,
}

impl ColumnSelection {
    fn resolve(row_index: usize, header: &[String]) -> Result<Self, MalformedInputError> {
        let position = |wanted: &str| header.iter().position(|cell| cell.trim() == wanted);

        match (
            position(ENROLLMENT_COLUMN),
            position(NAME_COLUMN),
            position(AVERAGE_COLUMN),
        ) {
            (Some(enrollment), Some(name), Some(average)) => Ok(Self {
                enrollment,
                name,
                average,
            }),
            _ => Err(MalformedInputError::MissingColumns {
                row_index,
                missing: CANONICAL_COLUMNS
                    .iter()
                    .copied()
                    .filter(|wanted| position(*wanted).is_none())
                    .collect(),
                found: header.iter().map(|cell| cell.trim().to_string()).collect(),
            }),
        }
    }

    fn extract(&self, row: &[String]) -> Option<CanonicalRow> {
        let cell = |index: usize| row.get(index).map(String::as_str);

        let enrollment_id = cell(self.enrollment).and_then(present)?;
        let name = cell(self.name).and_then(present)?;
        let average_percent = cell(self.average).and_then(coerce_average)?;

        Some(CanonicalRow {
            enrollment_id: enrollment_id.to_string(),
            name: name.to_string(),
            average_percent,
        })
    }
}
