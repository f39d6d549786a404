use crate::commands::{run_brief, run_classify, run_routes, BriefArgs, ClassifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use inquiry_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Inquiry Desk",
    about = "Route microsite inquiries to the office inbox and draft meeting briefs",
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
    /// Print the default category to subject routing table
    Routes,
    /// Show the subject and attachment decision for a category
    Classify(ClassifyArgs),
    /// Write a meeting brief without sending any email
    Brief(BriefArgs),
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
        Command::Routes => run_routes(),
        Command::Classify(args) => run_classify(args),
        Command::Brief(args) => run_brief(args),
    }
}
