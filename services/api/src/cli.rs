use crate::demo::{run_demo, run_leaderboard_report, DemoArgs, LeaderboardReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use merit_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Employee Recognition Service",
    about = "Run the recognition engine and its leaderboard service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a leaderboard preview over the bundled sample dataset
    Leaderboard(LeaderboardReportArgs),
    /// Run an end-to-end CLI demo covering ratings, overrides, and winners
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leaderboard(args) => run_leaderboard_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
