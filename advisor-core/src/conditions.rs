//! Keyword-based condition detection.
//!
//! Upstream descriptions are localized free text, so precipitation kinds are
//! detected by matching a small set of lowercase morphological stems. Keeping
//! the stem sets here, away from the scoring logic, lets a different locale be
//! plugged in without touching thresholds.

/// Stems indicating rain ("дождь", "ливень", ...).
pub const RAIN_STEMS: &[&str] = &["дожд", "лив"];

/// Stems indicating snow ("снег", "снежный", "метель", ...).
pub const SNOW_STEMS: &[&str] = &["снег", "снеж", "метел"];

/// Stems indicating a thunderstorm.
pub const THUNDER_STEMS: &[&str] = &["гроза"];

/// Stems indicating fog, smoke or haze.
pub const MIST_STEMS: &[&str] = &["туман", "дым", "мгла"];

fn contains_any(text: &str, stems: &[&str]) -> bool {
    let lower = text.to_lowercase();
    stems.iter().any(|s| lower.contains(s))
}

pub fn mentions_rain(text: &str) -> bool {
    contains_any(text, RAIN_STEMS)
}

pub fn mentions_snow(text: &str) -> bool {
    contains_any(text, SNOW_STEMS)
}

pub fn mentions_thunder(text: &str) -> bool {
    contains_any(text, THUNDER_STEMS)
}

pub fn mentions_mist(text: &str) -> bool {
    contains_any(text, MIST_STEMS)
}

/// Coarse sky state, derived from the provider icon code with the textual
/// description as a tie-breaker (some locales map icon codes oddly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Thunder,
    Snow,
    Mist,
}

impl ConditionKind {
    /// Display glyph for terminal output.
    pub fn glyph(&self, night: bool) -> &'static str {
        match self {
            ConditionKind::Clear => {
                if night {
                    "🌙"
                } else {
                    "☀️"
                }
            }
            ConditionKind::PartlyCloudy => "⛅",
            ConditionKind::Cloudy => "☁️",
            ConditionKind::Rain => "🌧️",
            ConditionKind::Thunder => "⛈️",
            ConditionKind::Snow => "🌨️",
            ConditionKind::Mist => "🌫️",
        }
    }
}

/// Classified sky state plus the day/night flag from the icon suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyState {
    pub kind: ConditionKind,
    pub night: bool,
}

impl SkyState {
    pub fn glyph(&self) -> &'static str {
        self.kind.glyph(self.night)
    }
}

/// Classify an OpenWeather-style icon code (e.g. "10d", "01n") combined with
/// a description. The description wins over the icon hint.
pub fn classify(icon: Option<&str>, desc: &str) -> SkyState {
    let code = icon.unwrap_or("");
    let night = code.ends_with('n');

    let mut kind = match code.get(..2) {
        Some("01") => ConditionKind::Clear,
        Some("02") => ConditionKind::PartlyCloudy,
        Some("03") | Some("04") => ConditionKind::Cloudy,
        Some("09") | Some("10") => ConditionKind::Rain,
        Some("11") => ConditionKind::Thunder,
        Some("13") => ConditionKind::Snow,
        Some("50") => ConditionKind::Mist,
        _ => ConditionKind::Clear,
    };

    if mentions_thunder(desc) {
        kind = ConditionKind::Thunder;
    } else if mentions_snow(desc) {
        kind = ConditionKind::Snow;
    } else if mentions_rain(desc) {
        kind = ConditionKind::Rain;
    } else if mentions_mist(desc) {
        kind = ConditionKind::Mist;
    }

    SkyState { kind, night }
}
