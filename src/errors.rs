//! Typed error hierarchy for the timeline.
//!
//! `TimelineError` covers every failure the library reports. The CLI and the
//! config loader wrap it in `anyhow::Error` at the boundary.

use thiserror::Error;

use crate::stage::Stage;

/// Errors from the timeline store, route resolution and access gating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("Timeline accessed outside a mounted provider (missing provider)")]
    MissingProvider,

    #[error("Invalid stage '{value}'. Valid stages: {}", valid_stage_keys())]
    InvalidStage { value: String },

    #[error("No stage is mapped to route '{path}'")]
    UnknownRoute { path: String },

    #[error("Stage {stage} is locked (furthest unlocked: {})", unlocked_key(.unlocked))]
    StageLocked {
        stage: Stage,
        unlocked: Option<Stage>,
    },

    #[error("Timeline store written from inside a subscriber notification")]
    ReentrantWrite,
}

fn unlocked_key(unlocked: &Option<Stage>) -> &'static str {
    unlocked.map(|s| s.key()).unwrap_or("none")
}

fn valid_stage_keys() -> String {
    Stage::ALL
        .iter()
        .map(|s| s.key())
        .collect::<Vec<_>>()
        .join(", ")
}
