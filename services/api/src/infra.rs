use ab_quiz::error::AppError;
use ab_quiz::scoring::{AnalyzeRequest, GenerationParams, ScoreGenerator, ServiceError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Generator that always answers with the same text, for offline demos.
#[derive(Debug, Clone)]
pub(crate) struct CannedGenerator {
    reply: String,
}

impl CannedGenerator {
    pub(crate) fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl ScoreGenerator for CannedGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ServiceError> {
        Ok(self.reply.clone())
    }
}

/// Read a file, or stdin when the path is `-`.
pub(crate) async fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        return Ok(buffer);
    }
    tokio::fs::read_to_string(path).await
}

pub(crate) async fn load_request(path: &Path) -> Result<AnalyzeRequest, AppError> {
    let raw = read_input(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
