use crate::commands::{run_analyze, run_report, AnalyzeArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use workload_insight::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Workload Insight",
    about = "Analyse team timesheets and produce workload reports from the command line",
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
    /// Analyse a timesheet and print the workload digest
    Analyze(AnalyzeArgs),
    /// Render the three-sheet workload report to an .xlsx file
    Report(ReportArgs),
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
        Command::Analyze(args) => run_analyze(args).await,
        Command::Report(args) => run_report(args),
    }
}
