use tracing::{info, warn};

use super::client::{GenerationParams, ScoreGenerator};
use super::domain::{Question, ScoreMap};
use super::error::ScoringError;
use super::normalizer::normalize;
use super::prompt::build;

/// Service chaining the prompt builder, the injected generator, and the normalizer.
///
/// Holds no mutable state, so one instance can serve any number of concurrent requests.
pub struct ScoringService<G> {
    generator: G,
    system_prompt: String,
    params: GenerationParams,
}

impl<G> ScoringService<G>
where
    G: ScoreGenerator,
{
    pub fn new(generator: G, system_prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            generator,
            system_prompt: system_prompt.into(),
            params,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Score the answers against every requested characteristic pair.
    ///
    /// Exactly one generation call is made; failures of any stage are returned as-is and
    /// the caller decides whether to retry the round trip.
    pub async fn score<A, C>(
        &self,
        questions: &[Question],
        answers: &[A],
        characteristics: &[C],
    ) -> Result<ScoreMap, ScoringError>
    where
        A: AsRef<str> + Sync,
        C: AsRef<str> + Sync,
    {
        let request = build(questions, answers, characteristics)?;
        info!(
            questions = questions.len(),
            pairs = request.pairs.len(),
            "requesting characteristic scores"
        );

        let raw = match self
            .generator
            .generate(&self.system_prompt, &request.instruction, &self.params)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "scoring request failed");
                return Err(err.into());
            }
        };

        let scores = normalize(&raw, &request.pairs)?;
        info!(labels = scores.len(), "characteristic scores normalized");
        Ok(scores)
    }
}
