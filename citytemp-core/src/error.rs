use thiserror::Error;

use crate::city::CityId;

/// Why a resolution could not produce a temperature.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The weather service flagged the request itself; carries its reason verbatim.
    #[error("{0}")]
    Upstream(String),

    #[error("No historical data available")]
    NoHistoricalData,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Weather service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    #[error("City '{0}' is not in the lookup table")]
    UnknownCity(CityId),
}

impl ResolveError {
    /// Message shown to the user in place of a result.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
