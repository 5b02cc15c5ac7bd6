// UI layer: turns query results into the one-line reports printed on
// stdout, and runs the requested queries in a fixed order.

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{Fetch, IssClient};
use crate::error::ApiError;
use crate::model::{Coordinate, CrewRoster, LocationReport, PassPrediction};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What the user asked for on the command line. `pass` stays raw until its
/// block runs so a bad value cannot stop the blocks before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub location: bool,
    pub pass: Option<String>,
    pub people: bool,
}

impl Request {
    pub fn is_empty(&self) -> bool {
        !self.location && self.pass.is_none() && !self.people
    }
}

/// A `--pass` argument: the coordinate plus the text the user typed, which
/// is echoed back unchanged in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct PassTarget {
    pub latitude_text: String,
    pub longitude_text: String,
    pub coordinate: Coordinate,
}

impl PassTarget {
    /// Accepts `"<lat> <lon>"` or `"<lat>,<lon>"`: commas are dropped and the
    /// rest is split on whitespace.
    pub fn parse(arg: &str) -> Result<Self, ApiError> {
        let cleaned = arg.replace(',', " ");
        let parts: Vec<&str> = cleaned.split_whitespace().collect();
        let [lat, lon] = parts.as_slice() else {
            return Err(ApiError::Argument(format!(
                "expected \"<lat> <lon>\", got {:?}",
                arg
            )));
        };
        let number = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| ApiError::Argument(format!("{:?} is not a number", s)))
        };
        Ok(PassTarget {
            coordinate: Coordinate::new(number(*lat)?, number(*lon)?)?,
            latitude_text: lat.to_string(),
            longitude_text: lon.to_string(),
        })
    }
}

/// Latitude and longitude are printed exactly as the API sent them.
pub fn format_location(report: &LocationReport, at: DateTime<Utc>) -> String {
    format!(
        "The ISS current location at {} is {}, {}",
        at.format(TIME_FORMAT),
        report.latitude_text,
        report.longitude_text
    )
}

pub fn format_pass<Tz>(target: &PassTarget, pass: &PassPrediction, tz: &Tz) -> Result<String, ApiError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rise = pass.rise_time_in(tz).ok_or_else(|| ApiError::InvalidField {
        field: "response[0].risetime".into(),
        value: pass.rise_time.to_string(),
    })?;
    Ok(format!(
        "The ISS will be overhead {}, {} at {} for {} seconds",
        target.latitude_text,
        target.longitude_text,
        rise.format(TIME_FORMAT),
        pass.duration
    ))
}

/// One line per craft, in roster order.
pub fn format_roster(roster: &CrewRoster) -> Vec<String> {
    roster
        .crafts()
        .map(|(craft, names)| {
            format!(
                "There are {} people aboard the {}. They are {}",
                names.len(),
                craft,
                names.join(", ")
            )
        })
        .collect()
}

/// Run the requested blocks against the live clock and the local time zone.
/// The clock is only read when the position response carries no timestamp.
pub fn run<F: Fetch, W: Write>(client: &IssClient<F>, request: &Request, out: &mut W) -> Result<()> {
    run_in(client, request, &Local, Utc::now, out)
}

/// Location, then pass, then people. Each block is written out as soon as it
/// is done; the first failure ends the run.
pub fn run_in<F, Tz, W>(
    client: &IssClient<F>,
    request: &Request,
    tz: &Tz,
    now: impl Fn() -> DateTime<Utc>,
    out: &mut W,
) -> Result<()>
where
    F: Fetch,
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    if request.location {
        let report = with_spinner("Locating the ISS...", || client.current_report())
            .context("Failed to get the current ISS location")?;
        // Prefer the server's sample time; fall back to our clock.
        let at = report.sampled_at().unwrap_or_else(|| now());
        writeln!(out, "{}", format_location(&report, at))?;
        out.flush()?;
    }

    if let Some(arg) = &request.pass {
        let target = PassTarget::parse(arg).context("Invalid --pass value")?;
        let pass = with_spinner("Predicting next pass...", || {
            client.next_pass(target.coordinate.latitude, target.coordinate.longitude)
        })
        .with_context(|| format!("Failed to predict the next pass over {}", arg))?;
        writeln!(out, "{}", format_pass(&target, &pass, tz)?)?;
        out.flush()?;
    }

    if request.people {
        let roster = with_spinner("Counting people in space...", || client.crew_roster())
            .context("Failed to get the crew roster")?;
        for line in format_roster(&roster) {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
    }

    Ok(())
}

/// Show a spinner on stderr while `f` runs. indicatif hides it when stderr
/// is not a terminal.
fn with_spinner<T>(msg: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}
