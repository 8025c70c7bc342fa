//! Plain-text output for the terminal.

use chrono::NaiveDate;
use citytemp_core::{City, CityTable, TemperatureResult};
use std::fmt::Write;

pub fn report(city: &City, date: NaiveDate, result: &TemperatureResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", city.name);
    let _ = writeln!(out, "{}", date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Max: {}°C", result.max_temp);
    let _ = writeln!(out, "Min: {}°C", result.min_temp);
    let _ = writeln!(out, "{}", result.source);
    out
}

pub fn city_list(table: &CityTable) -> String {
    let mut out = String::new();
    for city in table.iter() {
        let _ = writeln!(
            out,
            "{:<8} {} ({}, {})",
            city.id, city.name, city.coordinates.latitude, city.coordinates.longitude
        );
    }
    out
}
