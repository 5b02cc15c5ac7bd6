// Value types returned by the queries in `api`. They are built fresh per
// call and never mutated afterwards.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{ApiError, Result};

/// A point on the ground (or under the station), in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting anything outside [-90, 90] x [-180, 180].
    /// NaN is rejected too.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::InvalidCoordinate { latitude, longitude });
        }
        Ok(Coordinate { latitude, longitude })
    }
}

/// Where the station is, plus the server-side timestamp when the API sent one.
/// The latitude/longitude text is kept exactly as received for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReport {
    pub position: Coordinate,
    pub latitude_text: String,
    pub longitude_text: String,
    /// Epoch seconds.
    pub timestamp: Option<i64>,
}

impl LocationReport {
    /// Time the position was sampled, if the API said so and it is in range.
    pub fn sampled_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
    }
}

/// Next time the station rises over a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPrediction {
    /// Epoch seconds.
    pub rise_time: i64,
    /// Seconds above the horizon.
    pub duration: u64,
}

impl PassPrediction {
    /// Rise time expressed in `tz`. `None` if the timestamp is out of chrono's range.
    pub fn rise_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        DateTime::<Utc>::from_timestamp(self.rise_time, 0).map(|t| t.with_timezone(tz))
    }
}

/// People in space grouped by craft. Crafts keep the order in which they were
/// first seen, and names keep their list order within a craft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewRoster {
    crafts: Vec<(String, Vec<String>)>,
}

impl CrewRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` to `craft`, opening a new group on first sight of the craft.
    pub fn add(&mut self, name: impl Into<String>, craft: impl Into<String>) {
        let craft = craft.into();
        let name = name.into();
        match self.crafts.iter_mut().find(|(c, _)| *c == craft) {
            Some((_, names)) => names.push(name),
            None => self.crafts.push((craft, vec![name])),
        }
    }

    /// Crafts in display order with their occupants.
    pub fn crafts(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.crafts.iter().map(|(c, names)| (c.as_str(), names.as_slice()))
    }

    pub fn get(&self, craft: &str) -> Option<&[String]> {
        self.crafts
            .iter()
            .find(|(c, _)| c == craft)
            .map(|(_, names)| names.as_slice())
    }

    /// Number of distinct crafts.
    pub fn len(&self) -> usize {
        self.crafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crafts.is_empty()
    }

    pub fn total_people(&self) -> usize {
        self.crafts.iter().map(|(_, names)| names.len()).sum()
    }
}

impl<N, C> FromIterator<(N, C)> for CrewRoster
where
    N: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        let mut roster = CrewRoster::new();
        for (name, craft) in iter {
            roster.add(name, craft);
        }
        roster
    }
}
