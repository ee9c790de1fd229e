use polars::prelude::*;

use crate::model::CanonicalRow;

pub const HEADER_MARKER: &str = "S.No.";

pub const ENROLLMENT_COLUMN: &str = "Enrollment No.";
pub const NAME_COLUMN: &str = "Name";
pub const AVERAGE_COLUMN: &str = "Average %";

/// Canonical column order, shared by the normalizer, the dataframe view and the artifact header.
pub const CANONICAL_COLUMNS: [&str; 3] = [ENROLLMENT_COLUMN, NAME_COLUMN, AVERAGE_COLUMN];

/// Cell values treated as missing, matching what spreadsheet exports emit for blanks.
pub(crate) const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn canonical_dataframe(rows: &[CanonicalRow]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = rows.iter().map(|row| row.enrollment_id.as_str()).collect();
    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    let averages: Vec<f64> = rows.iter().map(|row| row.average_percent).collect();

    let columns: Vec<Column> = vec![
        Series::new(ENROLLMENT_COLUMN.into(), ids).into(),
        Series::new(NAME_COLUMN.into(), names).into(),
        Series::new(AVERAGE_COLUMN.into(), averages).into(),
    ];
    DataFrame::new(columns)
}

pub fn rows_from_dataframe(df: &DataFrame) -> PolarsResult<Vec<CanonicalRow>> {
    let ids = df.column(ENROLLMENT_COLUMN)?.str()?;
    let names = df.column(NAME_COLUMN)?.str()?;
    let averages = df.column(AVERAGE_COLUMN)?.f64()?;

    let rows = ids
        .into_iter()
        .zip(names.into_iter())
        .zip(averages.into_iter())
        .filter_map(|((id, name), average)| {
            Some(CanonicalRow {
                enrollment_id: id?.to_string(),
                name: name?.to_string(),
                average_percent: average?,
            })
        })
        .collect();
    Ok(rows)
}
