/// Malformed scoring input. These are caller bugs and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("length mismatch: {questions} questions but {answers} answers")]
    LengthMismatch { questions: usize, answers: usize },
    #[error("no characteristics requested")]
    NoCharacteristics,
    #[error("characteristic {0:?} is not of the form \"Left vs Right\"")]
    MalformedCharacteristic(String),
}

/// Failure talking to the text-generation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("analysis failed: model service returned {status}")]
    Status { status: u16 },
    #[error("analysis failed: {0}")]
    Transport(String),
    #[error("analysis failed: unreadable service response: {0}")]
    Decode(String),
    #[error("analysis failed: response carried no generated text")]
    MissingContent,
}

/// Model output that could not be coerced into a score object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no JSON object found")]
    NoJsonObject,
    #[error("invalid score shape: key {key:?} is not a number")]
    InvalidShape { key: String },
}

/// Tagged result of a single scoring round trip.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
