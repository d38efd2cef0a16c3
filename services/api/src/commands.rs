use crate::infra::{load_request, read_input, CannedGenerator};
use ab_quiz::config::{AppConfig, ModelConfig};
use ab_quiz::error::AppError;
use ab_quiz::scoring::{
    normalize, prompt, AzureChatClient, CharacteristicPair, GenerationParams, Question, ScoreMap,
    ScoringError, ScoringService,
};
use ab_quiz::telemetry;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

const DEMO_REPLY: &str = "```json\n{\"Independent\": 20, \"Collaborative\": 80}\n```";

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file with `questions`, `answers` and optional `characteristics` (`-` for stdin)
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// File holding raw model output (`-` for stdin)
    #[arg(long)]
    pub(crate) raw: PathBuf,
    /// Characteristic pair such as "Cautious vs Bold"; repeat for several pairs
    #[arg(long = "characteristic", required = true)]
    pub(crate) characteristics: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct PromptArgs {
    /// JSON file with `questions`, `answers` and optional `characteristics` (`-` for stdin)
    #[arg(long)]
    pub(crate) input: PathBuf,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let request = load_request(&args.input).await?;
    let client = AzureChatClient::from_config(&config.model)?;
    let service = ScoringService::new(
        client,
        config.model.system_prompt.clone(),
        config.model.generation_params(),
    );

    let answers = request.answers();
    let characteristics = request.characteristics();
    let scores = service
        .score(&request.questions, &answers, &characteristics)
        .await?;
    print_scores(&scores)
}

pub(crate) async fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let raw = read_input(&args.raw).await?;
    let pairs = CharacteristicPair::parse_all(&args.characteristics).map_err(ScoringError::from)?;
    let scores = normalize(&raw, &pairs).map_err(ScoringError::from)?;
    print_scores(&scores)
}

pub(crate) async fn run_prompt(args: PromptArgs) -> Result<(), AppError> {
    let request = load_request(&args.input).await?;
    let answers = request.answers();
    let characteristics = request.characteristics();
    let built = prompt::build(&request.questions, &answers, &characteristics)
        .map_err(ScoringError::from)?;
    println!("{}", built.instruction);
    Ok(())
}

/// Scores a one-question quiz against a fenced canned reply; never touches the network.
pub(crate) async fn run_demo() -> Result<(), AppError> {
    let service = ScoringService::new(
        CannedGenerator::new(DEMO_REPLY),
        ModelConfig::default().system_prompt,
        GenerationParams::default(),
    );
    let question = Question::new(
        "1",
        "Would you rather work alone or in a team?",
        "alone",
        "in a team",
    );

    let scores = service
        .score(&[question], &["in a team"], &["Independent vs Collaborative"])
        .await?;
    info!(labels = scores.len(), "demo scoring complete");
    print_scores(&scores)
}

fn print_scores(scores: &ScoreMap) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(scores)?);
    Ok(())
}
