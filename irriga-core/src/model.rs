use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoordinateAxis, IrrigaError};

pub const LATITUDE_MIN: f64 = -90.0;
pub const LATITUDE_MAX: f64 = 90.0;
pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;

/// Check that a geographic position is on the globe.
///
/// Runs before any weather data is fetched, so a bad position fails fast
/// instead of producing a forecast for nowhere.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), IrrigaError> {
    if !(LATITUDE_MIN..=LATITUDE_MAX).contains(&latitude) {
        return Err(IrrigaError::InvalidCoordinate {
            axis: CoordinateAxis::Latitude,
            value: latitude,
            min: LATITUDE_MIN,
            max: LATITUDE_MAX,
        });
    }
    if !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&longitude) {
        return Err(IrrigaError::InvalidCoordinate {
            axis: CoordinateAxis::Longitude,
            value: longitude,
            min: LONGITUDE_MIN,
            max: LONGITUDE_MAX,
        });
    }
    Ok(())
}

/// A validated position for the monitored field.
///
/// Construction goes through [`validate_coordinates`], so holding one of
/// these means both axes are in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, IrrigaError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Fields of a [`WeatherReport`], with the stable names used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    Temperature,
    Humidity,
    RainChance,
    TempMax,
    TempMin,
    Condition,
    PrecipitationMm,
}

impl ReportField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportField::Temperature => "temperature",
            ReportField::Humidity => "humidity",
            ReportField::RainChance => "rain_chance",
            ReportField::TempMax => "temp_max",
            ReportField::TempMin => "temp_min",
            ReportField::Condition => "condition",
            ReportField::PrecipitationMm => "precipitation_mm",
        }
    }
}

impl std::fmt::Display for ReportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields the irrigation decision rule cannot work without.
pub const DECISION_REQUIRED_FIELDS: &[ReportField] = &[
    ReportField::Temperature,
    ReportField::Humidity,
    ReportField::RainChance,
];

/// A single weather observation or forecast for the field.
///
/// Sources differ in what they can supply (the device line carries no
/// humidity, for instance), so every field is optional and completeness is
/// checked explicitly against the consumer's required set. Immutable once
/// built, constructed fresh per query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub rain_chance_pct: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub condition: Option<String>,
    pub precipitation_mm: Option<f64>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl WeatherReport {
    pub fn has(&self, field: ReportField) -> bool {
        match field {
            ReportField::Temperature => self.temperature_c.is_some(),
            ReportField::Humidity => self.humidity_pct.is_some(),
            ReportField::RainChance => self.rain_chance_pct.is_some(),
            ReportField::TempMax => self.temp_max_c.is_some(),
            ReportField::TempMin => self.temp_min_c.is_some(),
            ReportField::Condition => self.condition.is_some(),
            ReportField::PrecipitationMm => self.precipitation_mm.is_some(),
        }
    }

    /// Which of `required` are absent, in the order given.
    pub fn missing_fields(&self, required: &[ReportField]) -> Vec<ReportField> {
        required.iter().copied().filter(|field| !self.has(*field)).collect()
    }

    /// Fails with [`IrrigaError::IncompleteData`] naming exactly the absent
    /// fields.
    pub fn validate_required(&self, required: &[ReportField]) -> Result<(), IrrigaError> {
        let missing = self.missing_fields(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IrrigaError::IncompleteData { missing })
        }
    }
}
