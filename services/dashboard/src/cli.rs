use crate::commands::{run_options, run_summary, SummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use health_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "City Health & Pollution Insights",
    about = "Serve the city health & pollution dashboard or print its insights from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP dashboard (default command)
    Serve(ServeArgs),
    /// Print the summary insight for one selection
    Summary(SummaryArgs),
    /// List the years, cities and diagnosis groups available for selection
    Options,
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
        Command::Summary(args) => run_summary(args).await,
        Command::Options => run_options().await,
    }
}
