use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::model::{Coordinates, WeatherReport};

use super::WeatherSource;

/// Deterministic stand-in for a forecast service.
///
/// Returns a fixed mild-day report so the decision pipeline can run without
/// any upstream dependency. Coordinates are already validated by
/// construction; a bad position never reaches this point.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSource;

impl SimulatedSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WeatherSource for SimulatedSource {
    async fn fetch(&self, coords: &Coordinates) -> Result<WeatherReport> {
        debug!(
            "simulating forecast for {:.4}, {:.4}",
            coords.latitude(),
            coords.longitude()
        );

        Ok(WeatherReport {
            temperature_c: Some(25.0),
            humidity_pct: Some(65.0),
            rain_chance_pct: Some(30.0),
            temp_max_c: Some(28.0),
            temp_min_c: Some(18.0),
            condition: Some("Parcialmente nublado".to_string()),
            precipitation_mm: Some(0.0),
            fetched_at: Some(Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{self, Rule};
    use crate::model::DECISION_REQUIRED_FIELDS;

    #[tokio::test]
    async fn simulated_report_is_complete_for_the_decision_rule() {
        let coords = Coordinates::new(-23.5505, -46.6333).unwrap();
        let report = SimulatedSource::new().fetch(&coords).await.unwrap();

        assert!(report.validate_required(DECISION_REQUIRED_FIELDS).is_ok());
        assert!(report.fetched_at.is_some());
    }

    #[tokio::test]
    async fn simulated_day_needs_no_action() {
        let coords = Coordinates::new(0.0, 0.0).unwrap();
        let report = SimulatedSource::new().fetch(&coords).await.unwrap();

        let decision = decision::evaluate(&report).unwrap();
        assert!(!decision.irrigate);
        assert_eq!(decision.rule, Rule::NoAction);
    }
}
