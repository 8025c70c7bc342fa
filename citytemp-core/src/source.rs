use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    city::Coordinates, config::Config, error::ResolveError, model::DailyExtremes,
    source::open_meteo::OpenMeteoSource,
};

pub mod open_meteo;

/// Remote dataset access used by the resolver. One call performs one request.
#[async_trait]
pub trait TemperatureSource: Send + Sync + Debug {
    /// Hourly temperature samples (°C) observed on `date`, in order.
    async fn hourly_archive(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<Vec<f64>, ResolveError>;

    /// Forecast maximum and minimum (°C) for `date`.
    async fn daily_extremes(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<DailyExtremes, ResolveError>;
}

/// Construct the Open-Meteo source from the `[open_meteo]` section of the config.
pub fn source_from_config(config: &Config) -> Result<Box<dyn TemperatureSource>, ResolveError> {
    let source = OpenMeteoSource::new(config.open_meteo.clone())?;
    Ok(Box::new(source))
}
