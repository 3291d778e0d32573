use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Text};
use irriga_core::{
    Config, Coordinates, DeviceLine, LocationConfig, ScriptConfig, SourceId, WeatherReport,
    config::DEFAULT_SCRIPT_TIMEOUT_SECS,
    decision, line,
    provider::{self, script::ScriptRunner},
    translate, validate_coordinates,
};
use tracing::warn;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "irriga", version, about = "Irrigation decision helper for the field")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Field latitude in decimal degrees; falls back to the configured default.
    #[arg(long)]
    pub lat: Option<f64>,

    /// Field longitude in decimal degrees; falls back to the configured default.
    #[arg(long)]
    pub lon: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a weather source and the default field location.
    Configure {
        /// Source short name, e.g. "simulated" or "script".
        source: String,
    },

    /// Decide whether the field should be irrigated.
    Decide {
        #[command(flatten)]
        location: LocationArgs,

        /// Weather source to use; defaults to the configured one.
        #[arg(long)]
        source: Option<String>,

        /// Print the decision as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Produce the device line and the instructions for pasting it.
    Relay {
        #[command(flatten)]
        location: LocationArgs,

        /// Weather source to use; defaults to the configured one.
        #[arg(long)]
        source: Option<String>,
    },

    /// Translate a weather condition to Portuguese.
    Translate {
        /// Condition text as reported upstream, e.g. "Partly cloudy".
        condition: String,
    },

    /// List every known condition translation.
    Translations {
        /// Print table statistics instead of the entries.
        #[arg(long)]
        stats: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { source } => configure(&source),
            Command::Decide { location, source, json } => {
                decide(&location, source.as_deref(), json).await
            }
            Command::Relay { location, source } => relay(&location, source.as_deref()).await,
            Command::Translate { condition } => {
                println!("{}", translate::translate(Some(&condition)));
                Ok(())
            }
            Command::Translations { stats } => {
                translations(stats);
                Ok(())
            }
        }
    }
}

/// Explicit flag wins, then the configured default, then the simulated
/// source so a fresh install works out of the box.
fn resolve_source(explicit: Option<&str>, config: &Config) -> Result<SourceId> {
    if let Some(name) = explicit {
        return SourceId::try_from(name);
    }
    if config.default_source.is_some() {
        return config.default_source_id();
    }
    Ok(SourceId::Simulated)
}

fn resolve_coordinates(args: &LocationArgs, config: &Config) -> Result<Coordinates> {
    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)?),
        (None, None) => {
            let location = config.location.ok_or_else(|| {
                anyhow!(
                    "No field location given.\n\
                     Hint: pass --lat/--lon or run `irriga configure <source>` to store a default."
                )
            })?;
            Ok(Coordinates::new(location.latitude, location.longitude)?)
        }
        _ => bail!("--lat and --lon must be given together"),
    }
}

async fn decide(location: &LocationArgs, source: Option<&str>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let coords = resolve_coordinates(location, &config)?;
    let id = resolve_source(source, &config)?;
    let weather_source = provider::source_from_config(id, &config)?;

    let mut report = weather_source.fetch(&coords).await?;
    report.condition = Some(translate::translate(report.condition.as_deref()));

    let decision = decision::evaluate(&report)?;

    if json {
        let payload = serde_json::json!({
            "source": id.as_str(),
            "irrigate": decision.irrigate,
            "rule": decision.rule,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_report(id, &report);
        println!();
        println!(
            "Decision: {} ({})",
            if decision.irrigate { "irrigate" } else { "do not irrigate" },
            decision.rule.describe()
        );
    }

    Ok(())
}

async fn relay(location: &LocationArgs, source: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let coords = resolve_coordinates(location, &config)?;
    let id = resolve_source(source, &config)?;

    // Fallback substitution lives here, not in the core: any failure to
    // obtain a usable line downgrades to the canned example line.
    let device_line = match device_line_for(id, &config, &coords).await {
        Ok(found) => found,
        Err(err) => {
            warn!("falling back to the default device line: {err:#}");
            line::FALLBACK_LINE.to_string()
        }
    };

    let fields = line::decode(&device_line)?;
    let value = |key: &str| fields.get(key).map_or("N/A", String::as_str);

    println!("Processed forecast:");
    println!("  Rain chance: {} %", value(line::RAIN_CHANCE_KEY));
    println!(
        "  Temperature: {} °C to {} °C",
        value(line::TEMP_MIN_KEY),
        value(line::TEMP_MAX_KEY)
    );
    println!("  Condition: {}", value(line::CONDITION_KEY));

    let divider = "=".repeat(50);
    println!();
    println!("{divider}");
    println!("COPY THIS LINE INTO THE CONTROLLER'S SERIAL MONITOR:");
    println!("{divider}");
    println!("{device_line}");
    println!("{divider}");
    println!();
    println!("Controller instructions:");
    println!("1. Open the serial monitor of the simulator");
    println!("2. Copy the line above");
    println!("3. Paste it into the input field");
    println!("4. Press Enter");
    println!();
    println!("The controller parses the values automatically.");

    Ok(())
}

/// Obtain the device line for the chosen source.
///
/// The script path extracts the line from whatever the script prints; the
/// simulated path encodes one from the simulated report.
async fn device_line_for(id: SourceId, config: &Config, coords: &Coordinates) -> Result<String> {
    match id {
        SourceId::Script => {
            let script = config.script.as_ref().ok_or_else(|| {
                anyhow!(
                    "No forecast script configured.\n\
                     Hint: run `irriga configure script` first."
                )
            })?;
            let raw = ScriptRunner::from_config(script).run().await?;
            let found = line::extract_line(&raw)
                .ok_or_else(|| anyhow!("forecast script output contained no device line"))?;
            line::decode(found)?;
            Ok(found.to_string())
        }
        SourceId::Simulated => {
            let weather_source = provider::source_from_config(id, config)?;
            let report = weather_source.fetch(coords).await?;
            Ok(DeviceLine::from_report(&report)?.encode())
        }
    }
}

fn print_report(id: SourceId, report: &WeatherReport) {
    let metric = |value: Option<f64>| value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"));

    println!("Weather report ({id}):");
    if let Some(fetched_at) = report.fetched_at {
        println!("  Fetched at: {}", fetched_at.to_rfc3339());
    }
    println!("  Temperature: {} °C", metric(report.temperature_c));
    println!(
        "  Expected range: {} °C to {} °C",
        metric(report.temp_min_c),
        metric(report.temp_max_c)
    );
    println!("  Humidity: {} %", metric(report.humidity_pct));
    println!("  Rain chance: {} %", metric(report.rain_chance_pct));
    println!("  Precipitation: {} mm", metric(report.precipitation_mm));
    println!("  Condition: {}", report.condition.as_deref().unwrap_or("N/A"));
}

fn configure(source: &str) -> Result<()> {
    let id = SourceId::try_from(source)?;
    let mut config = Config::load()?;

    if id == SourceId::Script {
        let current = config.script.take();
        let interpreter = Text::new("Interpreter command:")
            .with_help_message("e.g. Rscript or python3")
            .with_initial_value(current.as_ref().map_or("", |s| s.interpreter.as_str()))
            .prompt()?;
        let path = Text::new("Forecast script path:")
            .with_initial_value(
                current.as_ref().map_or("", |s| s.path.to_str().unwrap_or("")),
            )
            .prompt()?;
        let timeout_secs = CustomType::<u64>::new("Script timeout in seconds:")
            .with_default(current.as_ref().map_or(DEFAULT_SCRIPT_TIMEOUT_SECS, |s| s.timeout_secs))
            .prompt()?;
        config.script = Some(ScriptConfig { interpreter, path: path.into(), timeout_secs });
    }

    let latitude = CustomType::<f64>::new("Default field latitude:")
        .with_help_message("decimal degrees, -90 to 90")
        .prompt()?;
    let longitude = CustomType::<f64>::new("Default field longitude:")
        .with_help_message("decimal degrees, -180 to 180")
        .prompt()?;
    validate_coordinates(latitude, longitude)?;
    config.location = Some(LocationConfig { latitude, longitude });

    config.set_default_source(id);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn translations(stats: bool) {
    if stats {
        let stats = translate::stats();
        println!("Known conditions: {}", stats.entries);
        println!("Approximate coverage: {} %", stats.approximate_coverage_pct);
    } else {
        for (english, portuguese) in translate::entries() {
            println!("{english:<42} {portuguese}");
        }
    }
}
