//! Header detection and canonicalisation for attendance/grade spreadsheet exports.

pub mod errors;
pub mod model;
mod normalize;
pub mod schema;

pub use errors::MalformedInputError;
pub use model::{CanonicalRow, CanonicalTable, RawTable};
pub use normalize::{coerce_average, is_missing, locate_header_row, normalize};
pub use schema::{
    canonical_dataframe, rows_from_dataframe, AVERAGE_COLUMN, CANONICAL_COLUMNS,
    ENROLLMENT_COLUMN, HEADER_MARKER, NAME_COLUMN,
};
