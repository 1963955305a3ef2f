//! Core library for the `advisor` CLI.
//!
//! This crate defines:
//! - The normalized weather payload model (current conditions + forecast)
//! - The advisory engine: clothing/precaution advice and planning insights
//! - Keyword-based condition classification
//! - The OpenWeather provider and configuration handling
//!
//! It is used by `advisor-cli`, but can also be reused by other binaries or
//! services that want the scoring without the terminal frontend.

pub mod advice;
pub mod conditions;
pub mod config;
pub mod model;
pub mod provider;

pub use advice::{Advice, AdviceCard, InsightCard, Insights, compute_advice, compute_insights};
pub use config::Config;
pub use model::{CurrentConditions, ForecastPoint, Location, Units, WeatherReport};
pub use provider::{WeatherProvider, WeatherQuery, provider_from_config};
