//! Open-Meteo archive and forecast endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{city::Coordinates, error::ResolveError, model::DailyExtremes};

use super::TemperatureSource;

/// Endpoint configuration, stored under `[open_meteo]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Request timeout in seconds. Unset means the transport default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            archive_base_url: default_archive_base_url(),
            forecast_base_url: default_forecast_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    config: OpenMeteoConfig,
    http: Client,
}

impl OpenMeteoSource {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, ResolveError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ResolveError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    fn archive_url(&self) -> String {
        format!("{}/archive", self.config.archive_base_url.trim_end_matches('/'))
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.forecast_base_url.trim_end_matches('/'))
    }
}

/// `{"error": true, "reason": "..."}`, sent by Open-Meteo for rejected requests.
#[derive(Debug, Deserialize)]
struct OmErrorEnvelope {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    temperature_2m: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct OmArchiveResponse {
    hourly: Option<OmHourly>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: Option<OmDaily>,
}

#[async_trait]
impl TemperatureSource for OpenMeteoSource {
    #[instrument(skip(self), fields(lat = %at.latitude, lon = %at.longitude))]
    async fn hourly_archive(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<Vec<f64>, ResolveError> {
        let url = self.archive_url();
        let day = format_date(date);
        debug!(%url, %day, "requesting hourly archive");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
                ("hourly", "temperature_2m".to_string()),
                ("timeformat", "unixtime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ResolveError::Transport(format!("archive request: {e}")))?;

        let parsed: OmArchiveResponse = read_payload(res).await?;

        let samples = parsed
            .hourly
            .ok_or(ResolveError::MissingField("hourly"))?
            .temperature_2m
            .ok_or(ResolveError::MissingField("hourly.temperature_2m"))?;

        Ok(samples.into_iter().flatten().collect())
    }

    #[instrument(skip(self), fields(lat = %at.latitude, lon = %at.longitude))]
    async fn daily_extremes(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<DailyExtremes, ResolveError> {
        let url = self.forecast_url();
        let day = format_date(date);
        debug!(%url, %day, "requesting daily forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ResolveError::Transport(format!("forecast request: {e}")))?;

        let parsed: OmForecastResponse = read_payload(res).await?;
        let daily = parsed.daily.ok_or(ResolveError::MissingField("daily"))?;

        let max = first_value(daily.temperature_2m_max)
            .ok_or(ResolveError::MissingField("daily.temperature_2m_max[0]"))?;
        let min = first_value(daily.temperature_2m_min)
            .ok_or(ResolveError::MissingField("daily.temperature_2m_min[0]"))?;

        Ok(DailyExtremes { max, min })
    }
}

/// Reads the body and maps it to `T`. An error envelope takes precedence over the
/// HTTP status; Open-Meteo answers rejected requests with 400 plus a reason.
async fn read_payload<T: DeserializeOwned>(res: Response) -> Result<T, ResolveError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| ResolveError::Transport(format!("failed to read response body: {e}")))?;

    let envelope = serde_json::from_str::<OmErrorEnvelope>(&body);
    if let Ok(OmErrorEnvelope { error: true, reason }) = envelope {
        return Err(ResolveError::Upstream(
            reason.unwrap_or_else(|| "Weather service reported an error".to_string()),
        ));
    }

    if !status.is_success() {
        return Err(ResolveError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ResolveError::Parse(e.to_string()))
}

fn first_value(values: Option<Vec<Option<f64>>>) -> Option<f64> {
    values.and_then(|v| v.into_iter().next().flatten())
}

/// `YYYY-MM-DD` of the calendar date itself, without any timezone shift.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
