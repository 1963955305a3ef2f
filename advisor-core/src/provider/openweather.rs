use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{CurrentConditions, ForecastPoint, Location, WeatherReport};
use crate::provider::{WeatherProvider, WeatherQuery};

const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// The 5-day/3-hour forecast is normalized down to ~48 hours.
const FORECAST_POINTS: usize = 16;

/// OpenWeather-backed provider: geocodes the city, then fetches current
/// conditions and the 3-hourly forecast, and normalizes both into a
/// [`WeatherReport`].
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn geocode(&self, city: &str) -> Result<Location> {
        let res = self
            .http
            .get(GEO_URL)
            .query(&[
                ("q", city),
                ("limit", "1"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Vec<OwGeoEntry> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        let entry = parsed
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("City not found: '{city}'"))?;

        Ok(Location {
            name: entry.name.unwrap_or_else(|| city.to_string()),
            country: entry.country.unwrap_or_default(),
            lat: Some(entry.lat),
            lon: Some(entry.lon),
        })
    }

    async fn fetch_current(&self, lat: f64, lon: f64, query: &WeatherQuery) -> Result<OwCurrent> {
        let res = self
            .http
            .get(CURRENT_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", query.units.as_str().to_string()),
                ("lang", query.lang.clone()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")
    }

    async fn fetch_forecast(&self, lat: f64, lon: f64, query: &WeatherQuery) -> Result<OwForecast> {
        let res = self
            .http
            .get(FORECAST_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", query.units.as_str().to_string()),
                ("lang", query.lang.clone()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport> {
        let city = query.city.trim();
        if city.is_empty() {
            return Err(anyhow!("City is empty"));
        }

        let location = self.geocode(city).await?;
        // Geocoding always yields coordinates; the lat/lon options exist for
        // payload tolerance on the consumer side.
        let lat = location.lat.unwrap_or_default();
        let lon = location.lon.unwrap_or_default();

        let current = self.fetch_current(lat, lon, query).await?;
        let forecast = self.fetch_forecast(lat, lon, query).await?;

        Ok(WeatherReport {
            location,
            units: query.units,
            lang: query.lang.clone(),
            generated_at: Some(Utc::now().timestamp()),
            current: normalize_current(current),
            forecast: normalize_forecast(forecast),
        })
    }
}

/// Flatten the nested OpenWeather current-weather shape into the model's
/// flat optional-field snapshot.
fn normalize_current(raw: OwCurrent) -> CurrentConditions {
    let main = raw.main.unwrap_or_default();
    let wind = raw.wind.unwrap_or_default();
    let sys = raw.sys.unwrap_or_default();
    let weather = raw.weather.into_iter().next().unwrap_or_default();

    CurrentConditions {
        temp: main.temp,
        feels_like: main.feels_like,
        temp_min: main.temp_min,
        temp_max: main.temp_max,
        humidity: main.humidity,
        pressure: main.pressure,
        wind_speed: wind.speed,
        wind_deg: wind.deg,
        clouds: raw.clouds.and_then(|c| c.all),
        visibility: raw.visibility,
        sunrise: sys.sunrise,
        sunset: sys.sunset,
        icon: weather.icon,
        desc: weather.description,
    }
}

/// Take the first ~48 hours of 3-hourly entries, flattened.
fn normalize_forecast(raw: OwForecast) -> Vec<ForecastPoint> {
    raw.list
        .into_iter()
        .take(FORECAST_POINTS)
        .map(|entry| {
            let main = entry.main.unwrap_or_default();
            let wind = entry.wind.unwrap_or_default();
            let weather = entry.weather.into_iter().next().unwrap_or_default();

            ForecastPoint {
                dt: entry.dt,
                dt_txt: entry.dt_txt,
                temp: main.temp,
                feels_like: main.feels_like,
                humidity: main.humidity,
                wind_speed: wind.speed,
                wind_deg: wind.deg,
                icon: weather.icon,
                desc: weather.description,
                pop: entry.pop,
            }
        })
        .collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    lat: f64,
    lon: f64,
    name: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwWeather {
    icon: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwClouds {
    all: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwCurrent {
    main: Option<OwMain>,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
    sys: Option<OwSys>,
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwForecastEntry {
    dt: Option<i64>,
    dt_txt: Option<String>,
    main: Option<OwMain>,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwForecast {
    list: Vec<OwForecastEntry>,
}
