use crate::commands::{
    run_analyze, run_demo, run_normalize, run_prompt, AnalyzeArgs, NormalizeArgs, PromptArgs,
};
use crate::server;
use ab_quiz::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "A/B Quiz Analyzer",
    about = "Score A/B quiz answers against characteristic pairs with a language model",
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
    /// Score a request file through the configured model deployment
    Analyze(AnalyzeArgs),
    /// Normalize raw model output offline
    Normalize(NormalizeArgs),
    /// Print the scoring instruction a request file would send
    Prompt(PromptArgs),
    /// Run the end-to-end example with a canned model reply
    Demo,
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
        Command::Normalize(args) => run_normalize(args).await,
        Command::Prompt(args) => run_prompt(args).await,
        Command::Demo => run_demo().await,
    }
}
