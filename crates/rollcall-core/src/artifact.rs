//! Artifact naming and serialization.

use rollcall_parser::{CanonicalRow, CANONICAL_COLUMNS};

use crate::threshold::Threshold;

pub const ARTIFACT_EXTENSION: &str = "csv";

/// Name stem for a result artifact; the sink appends the unique token.
pub fn artifact_stem(threshold: Threshold) -> String {
    format!("students_below_{threshold}_percent")
}

/// Renders rows under the canonical header, averages always carrying a decimal point.
pub fn render_artifact(rows: &[CanonicalRow]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new().from_writer(&mut buffer);
        writer.write_record(CANONICAL_COLUMNS)?;
        for row in rows {
            writer.write_record([
                row.enrollment_id.as_str(),
                row.name.as_str(),
                format_decimal(row.average_percent).as_str(),
            ])?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// Shortest decimal form of `value` that always carries a decimal point or an
/// exponent. Magnitudes from `1e16` up, or below `1e-4`, use exponent form
/// with a signed two-digit exponent (`1e+300`, `1.5e-05`).
pub fn format_decimal(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        value.to_string()
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        exponent_form(value)
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn exponent_form(value: f64) -> String {
    let formatted = format!("{value:e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, average: f64) -> CanonicalRow {
        CanonicalRow {
            enrollment_id: id.to_string(),
            name: name.to_string(),
            average_percent: average,
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let bytes = render_artifact(&[row("E002", "Bob", 55.0), row("E003", "Lee, Ann", 41.25)])
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Enrollment No.,Name,Average %\nE002,Bob,55.0\nE003,\"Lee, Ann\",41.25\n"
        );
    }

    #[test]
    fn renders_header_only_when_empty() {
        let text = String::from_utf8(render_artifact(&[]).unwrap()).unwrap();
        assert_eq!(text, "Enrollment No.,Name,Average %\n");
    }

    #[test]
    fn stem_includes_threshold() {
        let threshold = Threshold::new(60.0).unwrap();
        assert_eq!(artifact_stem(threshold), "students_below_60.0_percent");
    }

    #[test]
    fn decimal_formatting() {
        assert_eq!(format_decimal(55.0), "55.0");
        assert_eq!(format_decimal(72.5), "72.5");
        assert_eq!(format_decimal(-3.0), "-3.0");
        assert_eq!(format_decimal(f64::INFINITY), "inf");
        assert_eq!(format_decimal(0.0), "0.0");
        assert_eq!(format_decimal(0.0001), "0.0001");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_decimal(1e300), "1e+300");
        assert_eq!(format_decimal(1e-300), "1e-300");
        assert_eq!(format_decimal(-2.5e20), "-2.5e+20");
        assert_eq!(format_decimal(1e16), "1e+16");
        assert_eq!(format_decimal(1.5e-5), "1.5e-05");
        assert_eq!(format_decimal(9999999999999998.0), "9999999999999998.0");
    }

    #[test]
    fn stem_stays_short_for_extreme_thresholds() {
        let huge: Threshold = "1e300".parse().unwrap();
        let tiny: Threshold = "1e-300".parse().unwrap();
        assert_eq!(artifact_stem(huge), "students_below_1e+300_percent");
        assert_eq!(artifact_stem(tiny), "students_below_1e-300_percent");
    }
}
