// API client module: a small blocking HTTP client for the Open Notify
// endpoints. Each query issues one GET, decodes the JSON body and reshapes
// it into a value from `model`. Nothing is retried and nothing is cached.

use anyhow::Context;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::model::{Coordinate, CrewRoster, LocationReport, PassPrediction};

/// Number of predictions requested from the pass endpoint. Only the first
/// one is ever used.
const PASSES: u32 = 1;

/// Anything that can GET a URL with query parameters and hand back JSON.
pub trait Fetch {
    fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value>;
}

/// `Fetch` backed by a reqwest blocking client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        tracing::debug!(url, ?params, "GET");
        let transport = |source| ApiError::Transport { url: url.to_string(), source };

        let res = self.client.get(url).query(params).send().map_err(transport)?;
        let status = res.status();
        if !status.is_success() {
            // The body is still decoded; a JSON error document surfaces as a missing field.
            tracing::warn!(url, %status, "non-success status");
        }
        let body = res.text().map_err(transport)?;
        tracing::debug!(url, %status, bytes = body.len(), "response received");
        decode_json(url, &body)
    }
}

/// Decode a response body, tagging failures with the URL it came from.
pub fn decode_json(url: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|source| ApiError::Parse { url: url.to_string(), source })
}

/// Client for the three ISS queries. Generic over the transport so the
/// reshaping logic can run against canned bodies.
#[derive(Clone)]
pub struct IssClient<F = HttpFetcher> {
    fetcher: F,
    config: Config,
}

impl IssClient<HttpFetcher> {
    /// Create an HTTP-backed client for the endpoints in `config`.
    pub fn connect(config: Config) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(IssClient { fetcher, config })
    }
}

impl<F: Fetch> IssClient<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        IssClient { fetcher, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Where the ISS is right now.
    pub fn current_location(&self) -> Result<Coordinate> {
        self.current_report().map(|report| report.position)
    }

    /// Current position, as sent, together with the server's timestamp.
    pub fn current_report(&self) -> Result<LocationReport> {
        let body = self.fetcher.get_json(&self.config.position_url, &[])?;
        parse_location(&body)
    }

    /// Next time the ISS rises over (`lat`, `lon`). The coordinate is checked
    /// before anything goes over the wire.
    pub fn next_pass(&self, lat: f64, lon: f64) -> Result<PassPrediction> {
        let target = Coordinate::new(lat, lon)?;
        let params = [
            ("lat", target.latitude.to_string()),
            ("lon", target.longitude.to_string()),
            ("passes", PASSES.to_string()),
        ];
        let body = self.fetcher.get_json(&self.config.pass_url, &params)?;
        parse_pass(&body)
    }

    /// Who is in space, grouped by craft.
    pub fn crew_roster(&self) -> Result<CrewRoster> {
        let body = self.fetcher.get_json(&self.config.astros_url, &[])?;
        parse_roster(&body)
    }
}

/// `iss-now.json`. Every field is optional so absence can be told apart
/// from a type mismatch.
#[derive(Deserialize, Debug)]
struct NowResponse {
    iss_position: Option<RawPosition>,
    timestamp: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct RawPosition {
    latitude: Option<RawNumber>,
    longitude: Option<RawNumber>,
}

/// Positions arrive as strings ("10.1000"); plain numbers are accepted as well.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawNumber {
    Text(String),
    Number(serde_json::Number),
}

impl RawNumber {
    /// The value as sent, plus its numeric reading.
    fn read(self, path: &str) -> Result<(String, f64)> {
        let (text, parsed) = match self {
            RawNumber::Text(s) => {
                let parsed = s.trim().parse::<f64>().ok();
                (s, parsed)
            }
            RawNumber::Number(n) => (n.to_string(), n.as_f64()),
        };
        match parsed {
            Some(value) => Ok((text, value)),
            None => Err(ApiError::InvalidField { field: path.to_string(), value: text }),
        }
    }
}

/// `iss-pass.json`. `reason` is only present on failure documents.
#[derive(Deserialize, Debug)]
struct PassResponse {
    response: Option<Vec<RawPass>>,
    reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawPass {
    risetime: Option<i64>,
    duration: Option<u64>,
}

/// `astros.json`.
#[derive(Deserialize, Debug)]
struct AstrosResponse {
    people: Option<Vec<RawPerson>>,
}

#[derive(Deserialize, Debug)]
struct RawPerson {
    name: Option<String>,
    craft: Option<String>,
}

fn decode<T: DeserializeOwned>(body: &Value) -> Result<T> {
    T::deserialize(body).map_err(ApiError::Decode)
}

pub fn parse_location(body: &Value) -> Result<LocationReport> {
    let resp: NowResponse = decode(body)?;
    let position = resp.iss_position.ok_or_else(|| ApiError::missing("iss_position"))?;
    let (latitude_text, latitude) = position
        .latitude
        .ok_or_else(|| ApiError::missing("iss_position.latitude"))?
        .read("iss_position.latitude")?;
    let (longitude_text, longitude) = position
        .longitude
        .ok_or_else(|| ApiError::missing("iss_position.longitude"))?
        .read("iss_position.longitude")?;
    Ok(LocationReport {
        position: Coordinate::new(latitude, longitude)?,
        latitude_text,
        longitude_text,
        timestamp: resp.timestamp,
    })
}

pub fn parse_pass(body: &Value) -> Result<PassPrediction> {
    let resp: PassResponse = decode(body)?;
    let first = match resp.response.and_then(|list| list.into_iter().next()) {
        Some(first) => first,
        None => {
            if let Some(reason) = resp.reason.as_deref() {
                tracing::debug!(reason, "pass endpoint returned no predictions");
            }
            return Err(ApiError::NoPassData);
        }
    };
    Ok(PassPrediction {
        rise_time: first.risetime.ok_or_else(|| ApiError::missing("response[0].risetime"))?,
        duration: first.duration.ok_or_else(|| ApiError::missing("response[0].duration"))?,
    })
}

pub fn parse_roster(body: &Value) -> Result<CrewRoster> {
    let resp: AstrosResponse = decode(body)?;
    let people = resp.people.ok_or_else(|| ApiError::missing("people"))?;

    let mut roster = CrewRoster::new();
    for (i, person) in people.into_iter().enumerate() {
        let name = person.name.ok_or_else(|| ApiError::missing(format!("people[{}].name", i)))?;
        let craft = person.craft.ok_or_else(|| ApiError::missing(format!("people[{}].craft", i)))?;
        roster.add(name, craft);
    }
    tracing::debug!(crafts = roster.len(), people = roster.total_people(), "roster parsed");
    Ok(roster)
}
