//! Characteristic scoring for A/B question quizzes.
//!
//! The [`scoring`] module turns question/answer pairs into a prompt for a language model and
//! normalizes whatever text comes back into balanced percentage pairs. [`config`], [`error`]
//! and [`telemetry`] carry the runtime plumbing shared with the HTTP service.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
