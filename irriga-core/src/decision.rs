//! The threshold rule deciding whether the corn field gets water.

use serde::Serialize;
use tracing::debug;

use crate::error::IrrigaError;
use crate::model::{DECISION_REQUIRED_FIELDS, WeatherReport};

/// Rain probability (percent) above which irrigation is suppressed.
pub const RAIN_CHANCE_LIMIT_PCT: f64 = 70.0;
/// Forecast rainfall (mm) above which irrigation is suppressed.
pub const PRECIPITATION_LIMIT_MM: f64 = 5.0;
/// Humidity (percent) above which the soil counts as saturated.
pub const HUMIDITY_SATURATED_PCT: f64 = 80.0;
/// Humidity (percent) below which the soil counts as dry.
pub const HUMIDITY_DRY_PCT: f64 = 60.0;
/// Temperature (°C) above which heat stress calls for water.
pub const TEMPERATURE_HOT_C: f64 = 30.0;

/// The rule branch that settled a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    HighRainChance,
    ForecastPrecipitation,
    SaturatedSoil,
    DrySoil,
    HeatStress,
    NoAction,
}

impl Rule {
    pub fn describe(&self) -> &'static str {
        match self {
            Rule::HighRainChance => "high chance of rain",
            Rule::ForecastPrecipitation => "significant rainfall forecast",
            Rule::SaturatedSoil => "soil humidity already high",
            Rule::DrySoil => "soil too dry",
            Rule::HeatStress => "high temperature",
            Rule::NoAction => "conditions neutral",
        }
    }
}

/// Outcome of evaluating a weather report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub irrigate: bool,
    pub rule: Rule,
}

/// Apply the threshold rule to a report.
///
/// Branch order matters: the three rain/saturation checks suppress
/// irrigation even when the dryness or heat triggers would fire. All
/// comparisons are strict, so a value sitting exactly on a threshold falls
/// through to the next branch. A missing `precipitation_mm` reads as 0.
pub fn evaluate(report: &WeatherReport) -> Result<Decision, IrrigaError> {
    let (Some(temperature), Some(humidity), Some(rain_chance)) =
        (report.temperature_c, report.humidity_pct, report.rain_chance_pct)
    else {
        return Err(IrrigaError::IncompleteData {
            missing: report.missing_fields(DECISION_REQUIRED_FIELDS),
        });
    };
    let precipitation = report.precipitation_mm.unwrap_or(0.0);

    let decision = if rain_chance > RAIN_CHANCE_LIMIT_PCT {
        Decision { irrigate: false, rule: Rule::HighRainChance }
    } else if precipitation > PRECIPITATION_LIMIT_MM {
        Decision { irrigate: false, rule: Rule::ForecastPrecipitation }
    } else if humidity > HUMIDITY_SATURATED_PCT {
        Decision { irrigate: false, rule: Rule::SaturatedSoil }
    } else if humidity < HUMIDITY_DRY_PCT {
        Decision { irrigate: true, rule: Rule::DrySoil }
    } else if temperature > TEMPERATURE_HOT_C {
        Decision { irrigate: true, rule: Rule::HeatStress }
    } else {
        Decision { irrigate: false, rule: Rule::NoAction }
    };

    debug!(
        "evaluated rule: rain {rain_chance}%, humidity {humidity}%, {temperature}°C, \
         {precipitation}mm -> irrigate={} ({})",
        decision.irrigate,
        decision.rule.describe(),
    );
    Ok(decision)
}

/// Verdict-only wrapper around [`evaluate`].
pub fn decide_irrigation(report: &WeatherReport) -> Result<bool, IrrigaError> {
    evaluate(report).map(|decision| decision.irrigate)
}
