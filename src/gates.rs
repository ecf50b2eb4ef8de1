//! Stage access gating.
//!
//! Which stages a student may open is decided by backend submission status,
//! which lives outside this crate. [`ProgressSource`] is the seam for it.

use crate::errors::TimelineError;
use crate::stage::Stage;

/// Reports how far a student is allowed to go.
pub trait ProgressSource {
    /// The furthest stage the student may open, or `None` if nothing is unlocked.
    fn furthest_unlocked(&self) -> Option<Stage>;
}

/// A fixed unlock level, for the CLI and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProgress(pub Option<Stage>);

impl ProgressSource for StaticProgress {
    fn furthest_unlocked(&self) -> Option<Stage> {
        self.0
    }
}

/// Decides whether navigation to a stage is allowed.
pub struct AccessGate {
    source: Option<Box<dyn ProgressSource>>,
}

impl AccessGate {
    /// A gate that allows every stage.
    pub fn open() -> Self {
        Self { source: None }
    }

    pub fn new(source: impl ProgressSource + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
        }
    }

    /// `None` for an open gate, otherwise the source's answer.
    pub fn furthest_unlocked(&self) -> Option<Option<Stage>> {
        self.source.as_ref().map(|s| s.furthest_unlocked())
    }

    pub fn allows(&self, stage: Stage) -> bool {
        match self.furthest_unlocked() {
            None => true,
            Some(unlocked) => unlocked.is_some_and(|u| stage <= u),
        }
    }

    pub fn check(&self, stage: Stage) -> Result<(), TimelineError> {
        if self.allows(stage) {
            return Ok(());
        }
        let unlocked = self.furthest_unlocked().flatten();
        tracing::warn!(
            stage = %stage,
            unlocked = ?unlocked.map(|s| s.key()),
            "navigation to locked stage rejected"
        );
        Err(TimelineError::StageLocked { stage, unlocked })
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::open()
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("furthest_unlocked", &self.furthest_unlocked())
            .finish()
    }
}
