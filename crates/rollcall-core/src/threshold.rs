use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::artifact::format_decimal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("invalid threshold value '{input}'")]
    Invalid { input: String },
}

/// Cutoff for `Average %`; rows strictly below it are kept.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    /// Any float is accepted except NaN, which no average can be compared against.
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if value.is_nan() {
            return Err(ThresholdError::Invalid {
                input: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn admits(self, average: f64) -> bool {
        average < self.0
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ThresholdError::Invalid {
            input: input.to_string(),
        };
        let value = input.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(value).map_err(|_| invalid())
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(self.0))
    }
}
