use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;

use crate::errors::MalformedInputError;
use crate::schema::canonical_dataframe;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One export as read from disk: every row, no header assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Parses delimited text. Rows may differ in length and invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, MalformedInputError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            );
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    #[serde(rename = "Enrollment No.")]
    pub enrollment_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Average %")]
    pub average_percent: f64,
}

/// Fully populated rows cut from one export, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    pub rows: Vec<CanonicalRow>,
    /// Data rows discarded for a missing or non-numeric field.
    pub dropped_rows: usize,
}

impl CanonicalTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRow> {
        self.rows.iter()
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        canonical_dataframe(&self.rows)
    }
}
