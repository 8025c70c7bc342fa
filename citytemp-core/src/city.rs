use serde::{Deserialize, Serialize};
use std::{collections::HashMap, convert::TryFrom, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityId {
    Elobour,
    October,
}

impl CityId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityId::Elobour => "elobour",
            CityId::October => "october",
        }
    }

    pub const fn all() -> &'static [CityId] {
        &[CityId::Elobour, CityId::October]
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<&str> for CityId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "elobour" => Ok(CityId::Elobour),
            "october" => Ok(CityId::October),
            _ => Err(anyhow::anyhow!(
                "Unknown city '{value}'. Supported cities: elobour, october."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub coordinates: Coordinates,
}

impl City {
    pub fn new(id: CityId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            coordinates: Coordinates { latitude, longitude },
        }
    }
}

/// Immutable mapping from [`CityId`] to its descriptor.
#[derive(Debug, Clone)]
pub struct CityTable {
    cities: HashMap<CityId, City>,
}

impl CityTable {
    /// Later entries with the same id replace earlier ones.
    pub fn new(cities: impl IntoIterator<Item = City>) -> Self {
        Self {
            cities: cities.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// The two cities the app ships with.
    pub fn builtin() -> Self {
        Self::new([
            City::new(CityId::Elobour, "Al Obour", 30.1933, 31.4603),
            City::new(CityId::October, "Madīnat Sittah Uktūbar", 29.9361, 30.9269),
        ])
    }

    pub fn get(&self, id: CityId) -> Option<&City> {
        self.cities.get(&id)
    }

    /// Cities in [`CityId::all`] order.
    pub fn iter(&self) -> impl Iterator<Item = &City> + '_ {
        CityId::all().iter().filter_map(|id| self.cities.get(id))
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self::builtin()
    }
}
