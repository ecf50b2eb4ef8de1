//! Internship lifecycle stages.
//!
//! This module provides:
//! - `Stage`, the fixed and totally ordered set of internship stages
//! - `StageStatus`, the per-stage status derived from the active stage
//!
//! The declaration order of `Stage` is the lifecycle order. `Ord` is derived,
//! so `Stage::TeamFormation < Stage::Hearing` holds.

use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

/// One discrete step of the internship lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Students form their internship team
    TeamFormation,
    /// Cover letter request and approval
    CoverLetter,
    /// Internship underway: logbook and field assessment
    InProgress,
    /// Final report submission
    Submission,
    /// Post-internship evaluation
    PostInternship,
    /// Response letter from the host company
    ResponseLetter,
    /// Final hearing
    Hearing,
}

impl Stage {
    /// All stages in lifecycle order.
    pub const ALL: [Stage; 7] = [
        Stage::TeamFormation,
        Stage::CoverLetter,
        Stage::InProgress,
        Stage::Submission,
        Stage::PostInternship,
        Stage::ResponseLetter,
        Stage::Hearing,
    ];

    /// Number of stages.
    pub const COUNT: usize = Self::ALL.len();

    /// 0-based position in the lifecycle.
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Look up a stage by ordinal, rejecting values outside the stage set.
    pub fn from_ordinal(ordinal: usize) -> Result<Self, TimelineError> {
        Self::ALL
            .get(ordinal)
            .copied()
            .ok_or_else(|| TimelineError::InvalidStage {
                value: ordinal.to_string(),
            })
    }

    /// Stable key used in config files, JSON and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Stage::TeamFormation => "TEAM_FORMATION",
            Stage::CoverLetter => "COVER_LETTER",
            Stage::InProgress => "IN_PROGRESS",
            Stage::Submission => "SUBMISSION",
            Stage::PostInternship => "POST_INTERNSHIP",
            Stage::ResponseLetter => "RESPONSE_LETTER",
            Stage::Hearing => "HEARING",
        }
    }

    /// Human-readable title shown by the renderer.
    pub fn title(self) -> &'static str {
        match self {
            Stage::TeamFormation => "Team formation",
            Stage::CoverLetter => "Cover letter",
            Stage::InProgress => "In progress (logbook & assessment)",
            Stage::Submission => "Submission",
            Stage::PostInternship => "Post-internship evaluation",
            Stage::ResponseLetter => "Response letter",
            Stage::Hearing => "Hearing",
        }
    }

    /// The stage after this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.ordinal() + 1).copied()
    }

    /// The stage before this one, if any.
    pub fn previous(self) -> Option<Self> {
        self.ordinal()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn is_last(self) -> bool {
        self == Stage::Hearing
    }

    /// Status of this stage relative to the active stage.
    ///
    /// With no active stage every stage is upcoming.
    pub fn status_relative_to(self, active: Option<Stage>) -> StageStatus {
        match active {
            None => StageStatus::Upcoming,
            Some(active) => match self.cmp(&active) {
                std::cmp::Ordering::Less => StageStatus::Completed,
                std::cmp::Ordering::Equal => StageStatus::Active,
                std::cmp::Ordering::Greater => StageStatus::Upcoming,
            },
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Stage {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.key() == normalized)
            .ok_or_else(|| TimelineError::InvalidStage {
                value: s.to_string(),
            })
    }
}

/// Status of a stage relative to the active stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Ordinal below the active stage
    Completed,
    /// The active stage itself
    Active,
    /// Ordinal above the active stage, or no active stage yet
    Upcoming,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::Active => write!(f, "active"),
            StageStatus::Upcoming => write!(f, "upcoming"),
        }
    }
}
