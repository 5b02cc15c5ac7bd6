// Error taxonomy for the API client. Every query returns `ApiError`; the
// binary wraps it in `anyhow` and decides the exit status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a readable body (DNS, refused, timeout).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body came back but is not JSON.
    #[error("response from {url} is not valid JSON")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but a field has the wrong type.
    #[error("response has an unexpected shape")]
    Decode(#[source] serde_json::Error),

    #[error("response is missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` has unexpected value {value}")]
    InvalidField { field: String, value: String },

    #[error("no pass prediction returned for this location")]
    NoPassData,

    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid argument: {0}")]
    Argument(String),
}

impl ApiError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        ApiError::MissingField(field.into())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
