use crate::{Config, WeatherReport, model::Units, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A weather lookup: which city, in which units, in which language.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
    pub units: Units,
    pub lang: String,
}

/// Upstream weather source producing the normalized report the advisory
/// engine and renderer consume.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> anyhow::Result<WeatherReport>;
}

/// Construct the provider from config (API key from env or file).
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolved_api_key()?;
    Ok(Box::new(OpenWeatherProvider::new(api_key)))
}
