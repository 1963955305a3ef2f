use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};

use advisor_core::{Config, Units, WeatherQuery, compute_advice, compute_insights, provider_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "advisor", version, about = "Weather advisor CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively configure the API key and lookup preferences.
    Configure,

    /// Show weather, advice and insights for a city.
    Show {
        /// City name; falls back to the configured default city.
        city: Option<String>,

        /// Unit system: metric, imperial or standard.
        #[arg(long)]
        units: Option<String>,

        /// Description language code, e.g. "ru" or "en".
        #[arg(long)]
        lang: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units, lang } => {
                show(city.as_deref(), units.as_deref(), lang.as_deref()).await
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or(""))
        .prompt()?;

    let default_city = Text::new("Default city:")
        .with_initial_value(config.default_city.as_deref().unwrap_or(""))
        .prompt()?;

    let units = Select::new(
        "Unit system:",
        Units::all().iter().map(|u| u.as_str()).collect::<Vec<_>>(),
    )
    .prompt()?;

    let lang = Text::new("Language code:")
        .with_initial_value(config.lang.as_deref().unwrap_or(advisor_core::config::DEFAULT_LANG))
        .prompt()?;

    config.api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());
    config.default_city = Some(default_city.trim().to_string()).filter(|c| !c.is_empty());
    config.units = Some(units.to_string());
    config.lang = Some(lang.trim().to_string()).filter(|l| !l.is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(city: Option<&str>, units: Option<&str>, lang: Option<&str>) -> Result<()> {
    let config = Config::load()?;

    let query = WeatherQuery {
        city: config.resolved_city(city),
        units: config.resolved_units(units)?,
        lang: config.resolved_lang(lang),
    };

    let provider = provider_from_config(&config)?;
    let report = provider.fetch(&query).await?;

    let advice = compute_advice(&report.current, &report.forecast, report.units);
    let insights = compute_insights(&report.current, &report.forecast, report.units);

    print!("{}", render::render(&report, &advice, &insights));

    Ok(())
}
