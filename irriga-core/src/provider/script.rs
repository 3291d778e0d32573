use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::info;

use crate::config::ScriptConfig;
use crate::error::IrrigaError;
use crate::line;
use crate::model::{Coordinates, WeatherReport};

use super::WeatherSource;

/// Runs the external forecast script once and captures whatever it prints.
///
/// The script is an opaque producer: everything we consume from it goes
/// through [`line::extract_line`] on its stdout.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl ScriptRunner {
    pub fn new(
        interpreter: impl Into<String>,
        script_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            script_path: script_path.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &ScriptConfig) -> Self {
        Self::new(
            cfg.interpreter.clone(),
            cfg.path.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    /// Run the script and return its stdout.
    ///
    /// Stdout is decoded lossily; forecast scripts are not trusted to emit
    /// clean UTF-8.
    pub async fn run(&self) -> Result<String> {
        info!(
            "running forecast script: {} {}",
            self.interpreter,
            self.script_path.display()
        );

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.interpreter).arg(&self.script_path).output(),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "forecast script timed out after {}s",
                self.timeout.as_secs()
            )
        })?
        .with_context(|| {
            format!(
                "failed to run '{}', is the interpreter installed?",
                self.interpreter
            )
        })?;

        if !output.status.success() {
            return Err(anyhow!(
                "forecast script exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Weather source backed by the external forecast script.
///
/// The device line carries only the subset the controller needs, so reports
/// built here are partial: temperature and humidity stay absent, and a
/// consumer that requires them gets an incomplete-data error instead of a
/// made-up value.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    runner: ScriptRunner,
}

impl ScriptSource {
    pub fn new(runner: ScriptRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &ScriptRunner {
        &self.runner
    }
}

#[async_trait]
impl WeatherSource for ScriptSource {
    // The script knows its own location; coordinates are validated upstream
    // but not forwarded.
    async fn fetch(&self, _coords: &Coordinates) -> Result<WeatherReport> {
        let raw = self.runner.run().await?;
        let found = line::extract_line(&raw)
            .ok_or_else(|| anyhow!("forecast script output contained no device line"))?;
        Ok(report_from_line(found)?)
    }
}

/// Build the partial report a device line can support.
///
/// Unparsable numeric values leave their field absent rather than failing
/// the whole report.
pub fn report_from_line(device_line: &str) -> Result<WeatherReport, IrrigaError> {
    let fields = line::decode(device_line)?;
    let number = |key: &str| fields.get(key).and_then(|value| value.parse::<f64>().ok());

    Ok(WeatherReport {
        rain_chance_pct: number(line::RAIN_CHANCE_KEY),
        temp_max_c: number(line::TEMP_MAX_KEY),
        temp_min_c: number(line::TEMP_MIN_KEY),
        condition: fields.get(line::CONDITION_KEY).cloned(),
        fetched_at: Some(Utc::now()),
        ..WeatherReport::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision;
    use crate::model::ReportField;

    #[test]
    fn report_from_the_fallback_line_is_partial() {
        let report = report_from_line(line::FALLBACK_LINE).unwrap();

        assert_eq!(report.rain_chance_pct, Some(25.0));
        assert_eq!(report.temp_max_c, Some(28.0));
        assert_eq!(report.temp_min_c, Some(18.0));
        assert_eq!(report.condition.as_deref(), Some("Parcialmente nublado"));
        assert_eq!(report.temperature_c, None);
        assert_eq!(report.humidity_pct, None);
    }

    #[test]
    fn decision_over_a_line_report_refuses_cleanly() {
        let report = report_from_line(line::FALLBACK_LINE).unwrap();
        let err = decision::evaluate(&report).unwrap_err();

        assert_eq!(
            err,
            IrrigaError::IncompleteData {
                missing: vec![ReportField::Temperature, ReportField::Humidity],
            }
        );
    }

    #[test]
    fn unparsable_numbers_leave_the_field_absent() {
        let report =
            report_from_line("CHUVA:wet;TEMP_MAX:28.0;TEMP_MIN:18.0;CONDICAO:Nublado").unwrap();

        assert_eq!(report.rain_chance_pct, None);
        assert_eq!(report.temp_max_c, Some(28.0));
    }

    #[test]
    fn malformed_line_is_rejected() {
        assert!(matches!(
            report_from_line("CHUVA:25.0;TEMP_MAX"),
            Err(IrrigaError::MalformedLine { .. })
        ));
    }

    #[test]
    fn runner_settings_come_from_config() {
        let runner = ScriptRunner::from_config(&ScriptConfig {
            interpreter: "Rscript".to_string(),
            path: "forecast.R".into(),
            timeout_secs: 5,
        });
        assert_eq!(runner.timeout, Duration::from_secs(5));
        assert_eq!(runner.interpreter, "Rscript");
    }
}
