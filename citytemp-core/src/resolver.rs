use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::{
    city::{CityId, CityTable},
    error::ResolveError,
    model::{DataSource, DateClass, TemperatureResult, classify_date},
    source::TemperatureSource,
};

/// Maps a (city, date) pair to a temperature result, picking the archive for past
/// dates and the forecast for today onwards.
#[derive(Debug)]
pub struct TemperatureResolver {
    cities: CityTable,
    source: Box<dyn TemperatureSource>,
}

impl TemperatureResolver {
    pub fn new(cities: CityTable, source: Box<dyn TemperatureSource>) -> Self {
        Self { cities, source }
    }

    pub fn cities(&self) -> &CityTable {
        &self.cities
    }

    /// Resolve against the local calendar date.
    pub async fn resolve(
        &self,
        city: CityId,
        date: NaiveDate,
    ) -> Result<TemperatureResult, ResolveError> {
        self.resolve_on(city, date, Local::now().date_naive()).await
    }

    /// Resolve with an explicit "today".
    pub async fn resolve_on(
        &self,
        city: CityId,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<TemperatureResult, ResolveError> {
        let result = self.lookup(city, date, today).await;
        if let Err(err) = &result {
            warn!(%city, %date, error = %err, "temperature lookup failed");
        }
        result
    }

    async fn lookup(
        &self,
        city: CityId,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<TemperatureResult, ResolveError> {
        let descriptor = self.cities.get(city).ok_or(ResolveError::UnknownCity(city))?;
        let at = descriptor.coordinates;
        let class = classify_date(today, date);
        debug!(%city, %date, ?class, "resolving temperature");

        match class {
            DateClass::Past => {
                let samples = self.source.hourly_archive(at, date).await?;
                let (max, min) = extremes(&samples).ok_or(ResolveError::NoHistoricalData)?;
                Ok(TemperatureResult::new(max, min, DataSource::Historical))
            }
            DateClass::Today | DateClass::Future => {
                let daily = self.source.daily_extremes(at, date).await?;
                let source = if class == DateClass::Today {
                    DataSource::CurrentDay
                } else {
                    DataSource::Forecast
                };
                Ok(TemperatureResult::new(daily.max, daily.min, source))
            }
        }
    }
}

fn extremes(samples: &[f64]) -> Option<(f64, f64)> {
    let (first, rest) = samples.split_first()?;
    Some(rest.iter().fold((*first, *first), |(max, min), &t| (max.max(t), min.min(t))))
}
