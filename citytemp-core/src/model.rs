use chrono::NaiveDate;
use serde::Serialize;
use std::{cmp::Ordering, fmt};

/// Which remote dataset a result was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    #[serde(rename = "Historical Data")]
    Historical,
    #[serde(rename = "Current Day Data")]
    CurrentDay,
    #[serde(rename = "Forecast Data")]
    Forecast,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Historical => "Historical Data",
            DataSource::CurrentDay => "Current Day Data",
            DataSource::Forecast => "Forecast Data",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemperatureResult {
    pub max_temp: String,
    pub min_temp: String,
    pub source: DataSource,
}

impl TemperatureResult {
    pub fn new(max: f64, min: f64, source: DataSource) -> Self {
        Self {
            max_temp: format_temperature(max),
            min_temp: format_temperature(min),
            source,
        }
    }
}

/// Daily extremes as reported by the forecast endpoint, in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyExtremes {
    pub max: f64,
    pub min: f64,
}

/// Position of a target date relative to today, at calendar-day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateClass {
    Past,
    Today,
    Future,
}

pub fn classify_date(today: NaiveDate, target: NaiveDate) -> DateClass {
    match target.cmp(&today) {
        Ordering::Less => DateClass::Past,
        Ordering::Equal => DateClass::Today,
        Ordering::Greater => DateClass::Future,
    }
}

/// One fraction digit of the exact binary value; exact ties go to the even digit.
pub fn format_temperature(value: f64) -> String {
    format!("{value:.1}")
}
