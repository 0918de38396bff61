use crate::report::{run_price_report, PriceReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exed_clearance::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ExEd Clearance",
    about = "Serve and print elective clearance prices from the validated exports",
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
    /// Print the clearance table for one course, or every course
    Prices(PriceReportArgs),
}

/// Data export overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct DataArgs {
    /// Course catalog CSV (overrides EXED_COURSES_CSV)
    #[arg(long)]
    pub(crate) courses: Option<PathBuf>,
    /// Validated student profile CSV (overrides EXED_PROFILES_CSV)
    #[arg(long)]
    pub(crate) profiles: Option<PathBuf>,
    /// Bid roster CSV (overrides EXED_ROSTER_CSV)
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Prices(args) => run_price_report(args),
    }
}
