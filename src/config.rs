// Endpoint configuration. Built once at startup and only read afterwards.
// The binary always uses the defaults; tests point it elsewhere with
// `Config::with_base_url`.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://api.open-notify.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Full URLs of the three Open Notify endpoints plus the request timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub position_url: String,
    pub pass_url: String,
    pub astros_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config::with_base_url(DEFAULT_BASE_URL)
    }
}

impl Config {
    /// Point every endpoint at `base_url` (a trailing slash is tolerated).
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Config {
            position_url: format!("{}/iss-now.json", base),
            pass_url: format!("{}/iss-pass.json", base),
            astros_url: format!("{}/astros.json", base),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
