//! Timeline view model and renderer.
//!
//! [`TimelineView`] is a pure function of the active stage and the fixed
//! stage order. [`TimelineRenderer`] reads the active stage through a
//! [`TimelineHandle`] and counts the re-renders the store triggers.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::errors::TimelineError;
use crate::stage::{Stage, StageStatus};
use crate::timeline::{SubscriptionId, TimelineHandle};
use crate::ui::icons::status_marker;

/// One row of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageEntry {
    pub stage: Stage,
    /// 1-based position shown to the user
    pub position: usize,
    pub title: &'static str,
    pub status: StageStatus,
}

/// Per-stage statuses for one active stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineView {
    pub active: Option<Stage>,
    pub completed: usize,
    pub total: usize,
    pub entries: Vec<StageEntry>,
}

impl TimelineView {
    /// Derive statuses for every stage. `None` renders all stages as upcoming.
    pub fn from_active(active: Option<Stage>) -> Self {
        let entries: Vec<StageEntry> = Stage::ALL
            .iter()
            .map(|&stage| StageEntry {
                stage,
                position: stage.ordinal() + 1,
                title: stage.title(),
                status: stage.status_relative_to(active),
            })
            .collect();

        let completed = entries
            .iter()
            .filter(|e| e.status == StageStatus::Completed)
            .count();

        Self {
            active,
            completed,
            total: entries.len(),
            entries,
        }
    }

    pub fn statuses(&self) -> Vec<StageStatus> {
        self.entries.iter().map(|e| e.status).collect()
    }

    pub fn status_of(&self, stage: Stage) -> StageStatus {
        self.entries[stage.ordinal()].status
    }

    /// Share of stages already completed, 0-100.
    pub fn progress_percent(&self) -> u8 {
        (self.completed * 100 / self.total) as u8
    }

    /// Stages a user may click back to: completed ones plus the active one.
    ///
    /// Purely presentational. Following one is a navigation, not a store write.
    pub fn navigable_stages(&self) -> Vec<Stage> {
        self.entries
            .iter()
            .filter(|e| e.status != StageStatus::Upcoming)
            .map(|e| e.stage)
            .collect()
    }

    pub fn is_started(&self) -> bool {
        self.active.is_some()
    }
}

/// One styled line per stage.
pub fn render_lines(view: &TimelineView) -> Vec<String> {
    view.entries
        .iter()
        .map(|entry| {
            let title = match entry.status {
                StageStatus::Completed => style(entry.title).green(),
                StageStatus::Active => style(entry.title).yellow().bold(),
                StageStatus::Upcoming => style(entry.title).dim(),
            };
            format!(
                "  {}{}. {} {}",
                status_marker(entry.status),
                entry.position,
                title,
                style(format!("({})", entry.status)).dim()
            )
        })
        .collect()
}

/// Single-line summary, e.g. `[2/7] IN_PROGRESS - In progress (logbook & assessment)`.
pub fn render_minimal(view: &TimelineView) -> String {
    match view.active {
        Some(stage) => format!(
            "[{}/{}] {} - {}",
            view.completed,
            view.total,
            stage.key(),
            stage.title()
        ),
        None => format!("[{}/{}] not started", view.completed, view.total),
    }
}

pub fn render_json(view: &TimelineView) -> Result<String> {
    serde_json::to_string(view).context("Failed to serialize timeline view")
}

/// Reads the active stage through a handle and tracks re-renders.
///
/// Subscribes on construction, so every effective store change counts as one
/// render. Unsubscribes on drop if the scope is still mounted.
pub struct TimelineRenderer {
    handle: TimelineHandle,
    subscription: SubscriptionId,
    renders: Rc<Cell<u64>>,
}

impl TimelineRenderer {
    pub fn new(handle: TimelineHandle) -> Result<Self, TimelineError> {
        let renders = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renders);
        let subscription = handle.subscribe(move |stage| {
            counter.set(counter.get() + 1);
            tracing::trace!(stage = %stage, renders = counter.get(), "timeline re-rendered");
        })?;

        Ok(Self {
            handle,
            subscription,
            renders,
        })
    }

    /// Current view. Fails with `MissingProvider` once the scope is gone.
    pub fn view(&self) -> Result<TimelineView, TimelineError> {
        Ok(TimelineView::from_active(self.handle.active_stage()?))
    }

    /// Re-renders triggered by store changes since construction.
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }
}

impl Drop for TimelineRenderer {
    fn drop(&mut self) {
        // A gone scope already dropped the subscription with the store.
        let _ = self.handle.unsubscribe(self.subscription);
    }
}
