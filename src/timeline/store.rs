use std::rc::Rc;

use crate::stage::Stage;

/// Identifier returned by [`TimelineStore::subscribe`].
pub type SubscriptionId = u64;

/// Callback invoked with the new active stage after an effective change.
pub type Listener = Rc<dyn Fn(Stage)>;

/// Holds the active stage for one provider scope and fans out changes.
///
/// Writes are idempotent: setting the stage the store already holds changes
/// nothing, bumps no revision and notifies nobody.
#[derive(Default)]
pub struct TimelineStore {
    active_stage: Option<Stage>,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active stage, or `None` before the first route has mounted.
    pub fn active_stage(&self) -> Option<Stage> {
        self.active_stage
    }

    /// Number of effective changes since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a listener for stage changes.
    pub fn subscribe(&mut self, listener: impl Fn(Stage) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Set the active stage and notify listeners.
    ///
    /// Returns `true` if the stage changed.
    pub fn set_active_stage(&mut self, stage: Stage) -> bool {
        match self.commit(stage) {
            Some(listeners) => {
                for listener in listeners {
                    listener(stage);
                }
                true
            }
            None => false,
        }
    }

    /// Apply a write without notifying.
    ///
    /// Returns the listeners to notify, or `None` when the write was a no-op.
    /// Shared owners use this to release their borrow before running callbacks.
    pub(crate) fn commit(&mut self, stage: Stage) -> Option<Vec<Listener>> {
        if self.active_stage == Some(stage) {
            tracing::trace!(stage = %stage, "stage unchanged");
            return None;
        }

        tracing::debug!(
            from = ?self.active_stage.map(|s| s.key()),
            to = %stage,
            revision = self.revision + 1,
            "active stage changed"
        );
        self.active_stage = Some(stage);
        self.revision += 1;

        Some(self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect())
    }
}

impl std::fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineStore")
            .field("active_stage", &self.active_stage)
            .field("revision", &self.revision)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}
