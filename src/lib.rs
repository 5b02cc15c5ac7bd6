// Library root
// -----------
// Client for the Open Notify ISS API. The binary (`main.rs`) parses flags
// and hands a `ui::Request` to `ui::run`.
//
// Module responsibilities:
// - `api`: HTTP fetch adapter and the three queries (position, next pass,
//   crew roster).
// - `model`: the values those queries return.
// - `ui`: one-line report formatting and the ordered run of requested blocks.
// - `config`: endpoint URLs and timeout.
// - `error`: the error type shared by all of the above.
// - `logging`: tracing subscriber setup for the binary.
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod ui;

pub use api::{Fetch, HttpFetcher, IssClient};
pub use config::Config;
pub use error::ApiError;
pub use model::{Coordinate, CrewRoster, LocationReport, PassPrediction};
