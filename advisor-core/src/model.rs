use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Measurement system of a weather payload.
///
/// Determines the temperature symbol and the wind speed unit label;
/// `Standard` (Kelvin) shares the metric wind label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    /// Temperature symbol appended to rounded temperatures.
    pub fn temp_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    /// Wind speed unit label; metric and standard both report m/s.
    pub fn wind_label(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "м/с",
        }
    }

    /// Wind speed above which conditions count as windy.
    pub fn windy_threshold(&self) -> f64 {
        match self {
            Units::Imperial => 20.0,
            Units::Metric | Units::Standard => 8.0,
        }
    }

    /// Wind speed above which the walk-scoring penalty kicks in.
    pub fn stroll_wind_threshold(&self) -> f64 {
        match self {
            Units::Imperial => 18.0,
            Units::Metric | Units::Standard => 7.0,
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial, standard."
            )),
        }
    }
}

/// Snapshot of current conditions. Every field may be absent: upstream
/// payloads are allowed to omit anything, and consumers must treat a
/// missing value as "unknown", never as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<f64>,
    pub clouds: Option<f64>,
    pub visibility: Option<f64>,
    /// Sunrise/sunset as Unix seconds, UTC.
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    /// Provider icon code, e.g. "10d".
    pub icon: Option<String>,
    /// Localized textual description, e.g. "небольшой дождь".
    pub desc: Option<String>,
}

/// One entry of the 3-hourly forecast sequence, chronological, earliest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastPoint {
    /// Unix seconds, UTC.
    pub dt: Option<i64>,
    pub dt_txt: Option<String>,
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<f64>,
    pub icon: Option<String>,
    pub desc: Option<String>,
    /// Probability of precipitation, fraction in [0, 1].
    pub pop: Option<f64>,
}

/// Geocoded location the payload refers to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Location {
    /// "Москва, RU" when a country is known, otherwise just the name.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Normalized weather payload: the contract between a provider and
/// the advisory engine / renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherReport {
    pub location: Location,
    pub units: Units,
    pub lang: String,
    pub generated_at: Option<i64>,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_as_str_roundtrip() {
        for u in Units::all() {
            let parsed = Units::try_from(u.as_str()).expect("roundtrip should succeed");
            assert_eq!(*u, parsed);
        }
    }

    #[test]
    fn units_parse_is_case_insensitive() {
        assert_eq!(Units::try_from("Imperial").unwrap(), Units::Imperial);
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn wind_label_shared_between_metric_and_standard() {
        assert_eq!(Units::Metric.wind_label(), Units::Standard.wind_label());
        assert_eq!(Units::Imperial.wind_label(), "mph");
    }

    #[test]
    fn report_tolerates_missing_and_null_fields() {
        let json = r#"{
            "location": {"name": "Москва", "country": "RU"},
            "units": "metric",
            "current": {"temp": null, "wind_speed": 3.4},
            "forecast": [{"dt": 1700000000, "pop": 0.2}, {}]
        }"#;

        let report: WeatherReport = serde_json::from_str(json).expect("partial payload parses");
        assert_eq!(report.units, Units::Metric);
        assert!(report.current.temp.is_none());
        assert_eq!(report.current.wind_speed, Some(3.4));
        assert!(report.current.humidity.is_none());
        assert_eq!(report.forecast.len(), 2);
        assert!(report.forecast[1].dt.is_none());
        assert_eq!(report.lang, "");
    }

    #[test]
    fn empty_object_is_a_valid_report() {
        let report: WeatherReport = serde_json::from_str("{}").expect("empty payload parses");
        assert!(report.forecast.is_empty());
        assert_eq!(report.units, Units::Metric);
    }

    #[test]
    fn location_label_with_and_without_country() {
        let with = Location {
            name: "Київ".into(),
            country: "UA".into(),
            ..Location::default()
        };
        assert_eq!(with.label(), "Київ, UA");

        let without = Location {
            name: "Atlantis".into(),
            ..Location::default()
        };
        assert_eq!(without.label(), "Atlantis");
    }
}
