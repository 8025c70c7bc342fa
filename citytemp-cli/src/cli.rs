use anyhow::Context;
use chrono::{Local, NaiveDate};
use citytemp_core::{
    City, CityId, CityTable, Config, TemperatureResolver, source::source_from_config,
};
use clap::{Parser, Subcommand};
use inquire::{DateSelect, Select};
use std::fmt;
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citytemp", version, about = "City temperature check")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show max/min temperature for a city on a date.
    Show {
        /// City id, e.g. "elobour" or "october". Defaults to the configured city.
        city: Option<String>,

        /// Calendar date as YYYY-MM-DD; if absent, means today.
        #[arg(long)]
        date: Option<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Pick a city and a date interactively, then show the temperature.
    Pick,

    /// List the known cities.
    Cities,

    /// Choose the default city.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, date, json } => {
                let config = Config::load()?;
                let city = match city {
                    Some(s) => CityId::try_from(s.as_str())?,
                    None => config.default_city_id()?,
                };
                let date = match date {
                    Some(s) => parse_date(&s)?,
                    None => Local::now().date_naive(),
                };
                show(&config, city, date, json).await
            }
            Command::Pick => {
                let config = Config::load()?;
                let table = CityTable::builtin();
                let city = prompt_city(&table, config.default_city_id().ok())?;
                let date = DateSelect::new("Select date:")
                    .with_default(Local::now().date_naive())
                    .prompt()
                    .context("Date selection cancelled")?;
                show(&config, city, date, false).await
            }
            Command::Cities => {
                print!("{}", render::city_list(&CityTable::builtin()));
                Ok(())
            }
            Command::Configure => {
                let mut config = Config::load()?;
                let table = CityTable::builtin();
                let city = prompt_city(&table, config.default_city_id().ok())?;
                config.set_default_city(city);
                config.save()?;
                println!(
                    "Default city set to {city}. Config saved to {}",
                    Config::config_file_path()?.display()
                );
                Ok(())
            }
        }
    }
}

async fn show(config: &Config, city: CityId, date: NaiveDate, json: bool) -> anyhow::Result<()> {
    let source = source_from_config(config)?;
    let resolver = TemperatureResolver::new(CityTable::builtin(), source);
    debug!(%city, %date, "looking up temperature");

    let result = resolver.resolve(city, date).await?;
    let descriptor = resolver
        .cities()
        .get(city)
        .context("City disappeared from the lookup table")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::report(descriptor, date, &result));
    }

    Ok(())
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}'. Expected format YYYY-MM-DD."))
}

/// Select-list entry showing the display name.
struct CityChoice<'a>(&'a City);

impl fmt::Display for CityChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

fn prompt_city(table: &CityTable, current: Option<CityId>) -> anyhow::Result<CityId> {
    let choices: Vec<CityChoice<'_>> = table.iter().map(CityChoice).collect();
    let cursor = current
        .and_then(|id| choices.iter().position(|c| c.0.id == id))
        .unwrap_or(0);

    let picked = Select::new("Select city:", choices)
        .with_starting_cursor(cursor)
        .prompt()
        .context("City selection cancelled")?;

    Ok(picked.0.id)
}
