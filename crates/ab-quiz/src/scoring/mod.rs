//! Characteristic scoring: prompt construction, model round trip, and output normalization.

mod client;
pub mod domain;
pub mod error;
pub mod normalizer;
mod parser;
pub mod prompt;
pub mod router;
pub mod service;

pub use client::{AzureChatClient, GenerationParams, ScoreGenerator};
pub use domain::{
    CharacteristicPair, Question, ScoreMap, Selection, DEFAULT_CHARACTERISTIC_PAIRS, NO_ANSWER,
};
pub use error::{ParseError, ScoringError, ServiceError, ValidationError};
pub use normalizer::normalize;
pub use prompt::{build, ScoreRequest};
pub use router::{default_characteristics, scoring_router, AnalyzeRequest};
pub use service::ScoringService;
