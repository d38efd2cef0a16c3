use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::client::ScoreGenerator;
use super::domain::{Question, ScoreMap, DEFAULT_CHARACTERISTIC_PAIRS};
use super::service::ScoringService;
use crate::error::AppError;

/// Body accepted by the analyze endpoint and the CLI request files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub questions: Vec<Question>,
    /// Omitted means each question's selected option supplies the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<String>>,
    /// Omitted means the default characteristic pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Vec<String>>,
}

impl AnalyzeRequest {
    pub fn answers(&self) -> Vec<String> {
        match &self.answers {
            Some(answers) => answers.clone(),
            None => self
                .questions
                .iter()
                .map(Question::selected_answer)
                .collect(),
        }
    }

    pub fn characteristics(&self) -> Vec<String> {
        match &self.characteristics {
            Some(names) => names.clone(),
            None => default_characteristics(),
        }
    }
}

pub fn default_characteristics() -> Vec<String> {
    DEFAULT_CHARACTERISTIC_PAIRS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Router exposing the scoring endpoints.
pub fn scoring_router<G>(service: Arc<ScoringService<G>>) -> Router
where
    G: ScoreGenerator + 'static,
{
    Router::new()
        .route("/api/v1/analyze", post(analyze_handler::<G>))
        .route("/api/v1/characteristics", get(characteristics_handler))
        .with_state(service)
}

pub(crate) async fn analyze_handler<G>(
    State(service): State<Arc<ScoringService<G>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ScoreMap>, AppError>
where
    G: ScoreGenerator + 'static,
{
    let answers = request.answers();
    let characteristics = request.characteristics();
    let scores = service
        .score(&request.questions, &answers, &characteristics)
        .await?;
    Ok(Json(scores))
}

pub(crate) async fn characteristics_handler() -> Json<Vec<String>> {
    Json(default_characteristics())
}
