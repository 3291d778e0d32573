use thiserror::Error;

use crate::model::ReportField;

/// Axis of a geographic coordinate, named in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

impl CoordinateAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateAxis::Latitude => "latitude",
            CoordinateAxis::Longitude => "longitude",
        }
    }
}

impl std::fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by validation, the decision rule and the line codec.
///
/// All variants are synchronous and non-retryable: they point at bad input,
/// not a transient condition. Whether to substitute a fallback value is the
/// caller's call; these functions never do it themselves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrrigaError {
    #[error("invalid {axis} {value}: must be between {min} and {max}")]
    InvalidCoordinate {
        axis: CoordinateAxis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("incomplete weather data: missing {}", join_fields(.missing))]
    IncompleteData { missing: Vec<ReportField> },

    #[error("malformed device line: {line:?}")]
    MalformedLine { line: String },
}

fn join_fields(fields: &[ReportField]) -> String {
    fields.iter().map(ReportField::as_str).collect::<Vec<_>>().join(", ")
}
