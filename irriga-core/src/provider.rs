use crate::{
    Config, Coordinates, WeatherReport,
    provider::{script::{ScriptRunner, ScriptSource}, simulated::SimulatedSource},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod script;
pub mod simulated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Simulated,
    Script,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Simulated => "simulated",
            SourceId::Script => "script",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::Simulated, SourceId::Script]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "simulated" => Ok(SourceId::Simulated),
            "script" => Ok(SourceId::Script),
            _ => Err(anyhow::anyhow!(
                "Unknown weather source '{value}'. Supported sources: simulated, script."
            )),
        }
    }
}

/// A producer of weather reports for a field position.
///
/// Implementations may return partial reports; callers check completeness
/// against their own required field set.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, coords: &Coordinates) -> anyhow::Result<WeatherReport>;
}

/// Construct a source from config and explicit SourceId.
pub fn source_from_config(id: SourceId, config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let boxed: Box<dyn WeatherSource> = match id {
        SourceId::Simulated => Box::new(SimulatedSource::new()),
        SourceId::Script => {
            let script = config.script.as_ref().ok_or_else(|| {
                anyhow::anyhow!(
                    "No forecast script configured for source 'script'.\n\
                     Hint: run `irriga configure script` and enter the interpreter and script path."
                )
            })?;
            Box::new(ScriptSource::new(ScriptRunner::from_config(script)))
        }
    };

    Ok(boxed)
}

/// Construct the default source from config, using the `default_source` field.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let id = config.default_source_id()?;
    source_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ScriptConfig};

    #[test]
    fn source_id_as_str_roundtrip() {
        for id in SourceId::all() {
            let s = id.as_str();
            let parsed = SourceId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn source_id_parse_is_case_insensitive() {
        assert_eq!(SourceId::try_from("Simulated").unwrap(), SourceId::Simulated);
    }

    #[test]
    fn unknown_source_error() {
        let err = SourceId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown weather source"));
    }

    #[test]
    fn script_source_requires_script_settings() {
        let cfg = Config::default();
        let err = source_from_config(SourceId::Script, &cfg).unwrap_err();
        assert!(err.to_string().contains("No forecast script configured"));
    }

    #[test]
    fn script_source_builds_when_configured() {
        let cfg = Config {
            script: Some(ScriptConfig {
                interpreter: "Rscript".to_string(),
                path: "forecast.R".into(),
                timeout_secs: 30,
            }),
            ..Config::default()
        };
        assert!(source_from_config(SourceId::Script, &cfg).is_ok());
    }

    #[test]
    fn default_source_from_config_errors_when_not_set() {
        let cfg = Config::default();
        let err = default_source_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default weather source configured"));
        assert!(msg.contains("Hint: run `irriga configure"));
    }

    #[test]
    fn default_source_from_config_works_when_set() {
        let mut cfg = Config::default();
        cfg.set_default_source(SourceId::Simulated);

        assert!(default_source_from_config(&cfg).is_ok());
    }
}
