//! Translation of weather-condition phrases to Brazilian Portuguese.
//!
//! The upstream forecast services report conditions in English; the operator
//! output and the device line use Portuguese. Lookup is exact-match over a
//! fixed table, with pass-through for phrases the table does not know.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use tracing::debug;

/// Placeholder returned for null or blank condition text.
pub const UNKNOWN_CONDITION: &str = "Indefinido";

/// Rough share of upstream condition codes the table covers. A fixed
/// diagnostic figure, not measured against anything.
pub const APPROXIMATE_COVERAGE_PCT: u8 = 95;

/// Exact-match phrases, grouped by meteorological category.
const TRANSLATIONS: &[(&str, &str)] = &[
    // clear skies and cloud cover
    ("Sunny", "Ensolarado"),
    ("Clear", "Limpo"),
    ("Partly cloudy", "Parcialmente nublado"),
    ("Cloudy", "Nublado"),
    ("Overcast", "Encoberto"),
    // mist and fog
    ("Mist", "Névoa"),
    ("Fog", "Nevoeiro"),
    ("Freezing fog", "Nevoeiro congelante"),
    // drizzle
    ("Patchy light drizzle", "Garoa leve esparsa"),
    ("Light drizzle", "Garoa leve"),
    ("Freezing drizzle", "Garoa congelante"),
    ("Heavy freezing drizzle", "Garoa congelante intensa"),
    ("Patchy freezing drizzle possible", "Garoa congelante esparsa possível"),
    // rain
    ("Patchy rain possible", "Chuva esparsa possível"),
    ("Patchy light rain", "Chuva leve esparsa"),
    ("Light rain", "Chuva leve"),
    ("Moderate rain at times", "Chuva moderada às vezes"),
    ("Moderate rain", "Chuva moderada"),
    ("Heavy rain at times", "Chuva forte às vezes"),
    ("Heavy rain", "Chuva forte"),
    // freezing rain
    ("Light freezing rain", "Chuva congelante leve"),
    ("Moderate or heavy freezing rain", "Chuva congelante moderada/forte"),
    // snow
    ("Patchy snow possible", "Neve esparsa possível"),
    ("Blowing snow", "Nevasca"),
    ("Blizzard", "Tempestade de neve"),
    ("Patchy light snow", "Neve leve esparsa"),
    ("Light snow", "Neve leve"),
    ("Patchy moderate snow", "Neve moderada esparsa"),
    ("Moderate snow", "Neve moderada"),
    ("Patchy heavy snow", "Neve forte esparsa"),
    ("Heavy snow", "Neve forte"),
    // sleet and ice pellets
    ("Patchy sleet possible", "Granizo esparso possível"),
    ("Light sleet", "Granizo leve"),
    ("Moderate or heavy sleet", "Granizo moderado/forte"),
    ("Ice pellets", "Granizo"),
    // rain showers
    ("Light rain shower", "Pancada de chuva leve"),
    ("Moderate or heavy rain shower", "Pancada de chuva moderada/forte"),
    ("Torrential rain shower", "Pancada de chuva torrencial"),
    // sleet and ice-pellet showers
    ("Light sleet showers", "Pancadas de granizo leve"),
    ("Moderate or heavy sleet showers", "Pancadas de granizo moderado/forte"),
    ("Light showers of ice pellets", "Pancadas de granizo leve"),
    ("Moderate or heavy showers of ice pellets", "Pancadas de granizo moderado/forte"),
    // snow showers
    ("Light snow showers", "Pancadas de neve leve"),
    ("Moderate or heavy snow showers", "Pancadas de neve moderada/forte"),
    // thunder
    ("Thundery outbreaks possible", "Trovoadas possíveis"),
    ("Patchy light rain with thunder", "Chuva leve com trovoada esparsa"),
    ("Moderate or heavy rain with thunder", "Chuva moderada/forte com trovoada"),
    ("Patchy light snow with thunder", "Neve leve com trovoada esparsa"),
    ("Moderate or heavy snow with thunder", "Neve moderada/forte com trovoada"),
];

static TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| TRANSLATIONS.iter().copied().collect());

/// Translate an English condition phrase.
///
/// Blank input maps to [`UNKNOWN_CONDITION`]. A phrase the table does not
/// know comes back trimmed but otherwise unchanged, since the table is not
/// exhaustive and an untranslated condition is still useful.
pub fn translate(condition: Option<&str>) -> String {
    let Some(raw) = condition else {
        return UNKNOWN_CONDITION.to_string();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNKNOWN_CONDITION.to_string();
    }
    match TABLE.get(trimmed) {
        Some(translated) => {
            debug!("translated condition {trimmed:?} -> {translated:?}");
            (*translated).to_string()
        }
        None => {
            debug!("no translation for {trimmed:?}, keeping original");
            trimmed.to_string()
        }
    }
}

/// Every known (english, portuguese) pair.
pub fn entries() -> &'static [(&'static str, &'static str)] {
    TRANSLATIONS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub entries: usize,
    pub approximate_coverage_pct: u8,
}

pub fn stats() -> TranslationStats {
    TranslationStats {
        entries: TRANSLATIONS.len(),
        approximate_coverage_pct: APPROXIMATE_COVERAGE_PCT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_phrases_are_translated() {
        assert_eq!(translate(Some("Partly cloudy")), "Parcialmente nublado");
        assert_eq!(translate(Some("Heavy rain")), "Chuva forte");
        assert_eq!(translate(Some("Thundery outbreaks possible")), "Trovoadas possíveis");
    }

    #[test]
    fn unknown_phrases_pass_through() {
        assert_eq!(translate(Some("Unknown Condition")), "Unknown Condition");
    }

    #[test]
    fn blank_input_maps_to_placeholder() {
        assert_eq!(translate(None), UNKNOWN_CONDITION);
        assert_eq!(translate(Some("")), UNKNOWN_CONDITION);
        assert_eq!(translate(Some("   \t")), UNKNOWN_CONDITION);
    }

    #[test]
    fn input_is_trimmed_before_lookup() {
        assert_eq!(translate(Some("  Sunny  ")), "Ensolarado");
        assert_eq!(translate(Some("  Never Heard Of It ")), "Never Heard Of It");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        // "sunny" is not in the table; only the exact upstream casing is.
        assert_eq!(translate(Some("sunny")), "sunny");
    }

    #[test]
    fn stats_report_table_size_and_fixed_coverage() {
        let stats = stats();
        assert_eq!(stats.entries, TRANSLATIONS.len());
        assert_eq!(stats.entries, entries().len());
        assert_eq!(stats.approximate_coverage_pct, 95);
    }

    #[test]
    fn table_has_no_duplicate_english_phrases() {
        assert_eq!(TABLE.len(), TRANSLATIONS.len());
    }
}
