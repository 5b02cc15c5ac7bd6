// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, build an API client, hand both to `ui::run`.
// - Returns `anyhow::Result` so a failed query prints its error chain and
//   exits with a non-zero status.

use clap::{CommandFactory, Parser};
use iss_tracker::{logging, ui, Config, IssClient};

/// Real-time ISS telemetry from the Open Notify API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Print the current location of the ISS
    #[arg(long)]
    loc: bool,

    /// Print when the ISS will pass over a location given as "lat, lon"
    #[arg(long, value_name = "LAT LON", allow_hyphen_values = true)]
    pass: Option<String>,

    /// Print the people currently in space, grouped by craft
    #[arg(long)]
    people: bool,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Only fails if a subscriber is already set, which cannot happen here.
    logging::init(cli.verbose).ok();

    let request = ui::Request {
        location: cli.loc,
        pass: cli.pass,
        people: cli.people,
    };
    if request.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let client = IssClient::connect(Config::default())?;
    tracing::info!(config = ?client.config(), "client ready");

    let stdout = std::io::stdout();
    ui::run(&client, &request, &mut stdout.lock())
}
