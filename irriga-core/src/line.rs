//! Codec for the flat `KEY:VALUE` line handed to the field controller.
//!
//! The wire format is semicolon-delimited, keys in Portuguese, one decimal
//! place for numerics:
//! `CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0;CONDICAO:Parcialmente nublado`

use std::collections::HashMap;

use serde::Serialize;

use crate::error::IrrigaError;
use crate::model::{ReportField, WeatherReport};

pub const RAIN_CHANCE_KEY: &str = "CHUVA";
pub const TEMP_MAX_KEY: &str = "TEMP_MAX";
pub const TEMP_MIN_KEY: &str = "TEMP_MIN";
pub const CONDITION_KEY: &str = "CONDICAO";

/// Minimum number of `;`-separated segments a structurally valid line has.
const MIN_SEGMENTS: usize = 4;

/// Line substituted by the CLI when no usable forecast output is available.
/// Fallback substitution is caller policy; nothing in this module falls back
/// on its own.
pub const FALLBACK_LINE: &str =
    "CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0;CONDICAO:Parcialmente nublado";

/// The report subset the device consumes.
pub const DEVICE_LINE_FIELDS: &[ReportField] = &[
    ReportField::RainChance,
    ReportField::TempMax,
    ReportField::TempMin,
    ReportField::Condition,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceLine {
    pub rain_chance_pct: f64,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub condition: String,
}

impl DeviceLine {
    /// Project a full report down to the device subset.
    pub fn from_report(report: &WeatherReport) -> Result<Self, IrrigaError> {
        let (Some(rain_chance_pct), Some(temp_max_c), Some(temp_min_c), Some(condition)) = (
            report.rain_chance_pct,
            report.temp_max_c,
            report.temp_min_c,
            report.condition.as_deref(),
        ) else {
            return Err(IrrigaError::IncompleteData {
                missing: report.missing_fields(DEVICE_LINE_FIELDS),
            });
        };
        Ok(Self {
            rain_chance_pct,
            temp_max_c,
            temp_min_c,
            condition: condition.to_string(),
        })
    }

    /// Render the wire line. Numeric values get exactly one decimal place.
    /// The condition is embedded verbatim, so a `;` or `:` inside it will
    /// confuse the parser on the far end. Keep conditions to plain phrases.
    pub fn encode(&self) -> String {
        format!(
            "{RAIN_CHANCE_KEY}:{:.1};{TEMP_MAX_KEY}:{:.1};{TEMP_MIN_KEY}:{:.1};{CONDITION_KEY}:{}",
            self.rain_chance_pct, self.temp_max_c, self.temp_min_c, self.condition
        )
    }
}

/// Pick the device line out of free-form forecast output.
///
/// Returns the first trimmed line that starts with the rain-chance key and
/// mentions the other three keys anywhere, or `None` when nothing qualifies.
pub fn extract_line(raw: &str) -> Option<&str> {
    raw.lines().map(str::trim).find(|line| {
        line.starts_with("CHUVA:")
            && line.contains("TEMP_MAX:")
            && line.contains("TEMP_MIN:")
            && line.contains("CONDICAO:")
    })
}

/// Split a line into its key/value pairs.
///
/// Each segment splits once on its first `:`, so colons inside the value
/// survive. Segments without a colon are skipped; a repeated key overwrites
/// the earlier value.
pub fn parse_fields(line: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for segment in line.split(';') {
        if let Some((key, value)) = segment.split_once(':') {
            fields.insert(key.to_string(), value.to_string());
        }
    }
    fields
}

/// Structural check, independent of field names: at least four segments and
/// a colon in every one of them.
pub fn is_well_formed(line: &str) -> bool {
    let segments: Vec<&str> = line.split(';').collect();
    segments.len() >= MIN_SEGMENTS && segments.iter().all(|segment| segment.contains(':'))
}

/// Validate structure, then parse.
pub fn decode(line: &str) -> Result<HashMap<String, String>, IrrigaError> {
    if !is_well_formed(line) {
        return Err(IrrigaError::MalformedLine { line: line.to_string() });
    }
    Ok(parse_fields(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeviceLine {
        DeviceLine {
            rain_chance_pct: 30.0,
            temp_max_c: 28.0,
            temp_min_c: 17.5,
            condition: "Parcialmente nublado".to_string(),
        }
    }

    #[test]
    fn encode_uses_one_decimal_place() {
        assert_eq!(
            sample().encode(),
            "CHUVA:30.0;TEMP_MAX:28.0;TEMP_MIN:17.5;CONDICAO:Parcialmente nublado"
        );
    }

    #[test]
    fn encode_parse_round_trip() {
        let fields = parse_fields(&sample().encode());
        assert_eq!(fields.get(RAIN_CHANCE_KEY).map(String::as_str), Some("30.0"));
        assert_eq!(fields.get(TEMP_MAX_KEY).map(String::as_str), Some("28.0"));
        assert_eq!(fields.get(TEMP_MIN_KEY).map(String::as_str), Some("17.5"));
        assert_eq!(fields.get(CONDITION_KEY).map(String::as_str), Some("Parcialmente nublado"));
    }

    #[test]
    fn from_report_requires_the_device_subset() {
        let report = WeatherReport {
            rain_chance_pct: Some(30.0),
            condition: Some("Nublado".to_string()),
            ..WeatherReport::default()
        };
        let err = DeviceLine::from_report(&report).unwrap_err();
        assert_eq!(
            err,
            IrrigaError::IncompleteData {
                missing: vec![crate::model::ReportField::TempMax, crate::model::ReportField::TempMin],
            }
        );
    }

    #[test]
    fn extract_finds_the_line_among_log_noise() {
        let raw = "\
starting forecast run
some diagnostic output
  CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0;CONDICAO:Chuva leve
done
";
        assert_eq!(
            extract_line(raw),
            Some("CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0;CONDICAO:Chuva leve")
        );
    }

    #[test]
    fn extract_returns_the_first_qualifying_line() {
        let raw = "CHUVA:1.0;TEMP_MAX:2.0;TEMP_MIN:3.0;CONDICAO:A\n\
                   CHUVA:9.0;TEMP_MAX:8.0;TEMP_MIN:7.0;CONDICAO:B";
        assert_eq!(extract_line(raw).unwrap(), "CHUVA:1.0;TEMP_MAX:2.0;TEMP_MIN:3.0;CONDICAO:A");
    }

    #[test]
    fn extract_needs_all_four_keys() {
        assert_eq!(extract_line("CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0"), None);
        // must start with the rain key, not merely contain it
        assert_eq!(
            extract_line("x CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0;CONDICAO:ok"),
            None
        );
        assert_eq!(extract_line(""), None);
    }

    #[test]
    fn parse_skips_segments_without_colon_and_keeps_last_duplicate() {
        let fields = parse_fields("CHUVA:10.0;garbage;CHUVA:20.0;TEMP_MAX:28.0");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(RAIN_CHANCE_KEY).map(String::as_str), Some("20.0"));
    }

    #[test]
    fn parse_splits_on_the_first_colon_only() {
        let fields = parse_fields("CONDICAO:Chuva: forte;A:1;B:2;C:3");
        assert_eq!(fields.get(CONDITION_KEY).map(String::as_str), Some("Chuva: forte"));
    }

    #[test]
    fn well_formed_accepts_the_fallback_line() {
        assert!(is_well_formed(FALLBACK_LINE));
    }

    #[test]
    fn well_formed_rejects_short_or_colonless_lines() {
        assert!(!is_well_formed("CHUVA:25.0;TEMP_MAX"));
        assert!(!is_well_formed("CHUVA:25.0;TEMP_MAX:28.0;TEMP_MIN:18.0"));
        // a stray trailing `;` adds an empty, colonless segment
        assert!(!is_well_formed("A:1;B:2;C:3;D:4;"));
        assert!(!is_well_formed(""));
    }

    #[test]
    fn fallback_line_decodes() {
        let fields = decode(FALLBACK_LINE).unwrap();
        assert_eq!(fields.get(RAIN_CHANCE_KEY).map(String::as_str), Some("25.0"));
        assert_eq!(fields.get(TEMP_MAX_KEY).map(String::as_str), Some("28.0"));
        assert_eq!(fields.get(TEMP_MIN_KEY).map(String::as_str), Some("18.0"));
        assert_eq!(fields.get(CONDITION_KEY).map(String::as_str), Some("Parcialmente nublado"));
    }

    #[test]
    fn decode_refuses_malformed_lines() {
        let err = decode("CHUVA:25.0;TEMP_MAX").unwrap_err();
        assert!(matches!(err, IrrigaError::MalformedLine { .. }));
    }
}
