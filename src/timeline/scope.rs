use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::errors::TimelineError;
use crate::stage::Stage;
use crate::timeline::store::{SubscriptionId, TimelineStore};

struct Shared {
    store: RefCell<TimelineStore>,
    notifying: Cell<bool>,
    generation: u64,
}

/// Owns one [`TimelineStore`] for the lifetime of a routed subtree.
///
/// Consumers never hold the store directly; they get a [`TimelineHandle`]
/// from [`TimelineScope::handle`]. Handles reference the store weakly, so
/// once the scope is unmounted (or dropped) every handle fails with
/// [`TimelineError::MissingProvider`].
pub struct TimelineScope {
    shared: Rc<Shared>,
}

impl TimelineScope {
    /// Mount a fresh scope with an empty store.
    pub fn mount() -> Self {
        Self::mount_generation(0)
    }

    /// Mount a fresh scope tagged with a generation number for logging.
    pub fn mount_generation(generation: u64) -> Self {
        tracing::info!(generation, "timeline scope mounted");
        Self {
            shared: Rc::new(Shared {
                store: RefCell::new(TimelineStore::new()),
                notifying: Cell::new(false),
                generation,
            }),
        }
    }

    pub fn handle(&self) -> TimelineHandle {
        TimelineHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation
    }

    pub fn active_stage(&self) -> Option<Stage> {
        self.shared.store.borrow().active_stage()
    }

    pub fn revision(&self) -> u64 {
        self.shared.store.borrow().revision()
    }

    /// Tear the scope down. Equivalent to dropping it.
    pub fn unmount(self) {}
}

impl Drop for TimelineScope {
    fn drop(&mut self) {
        tracing::info!(
            generation = self.shared.generation,
            last_stage = ?self.active_stage().map(|s| s.key()),
            "timeline scope unmounted"
        );
    }
}

impl std::fmt::Debug for TimelineScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineScope")
            .field("generation", &self.shared.generation)
            .field("store", &*self.shared.store.borrow())
            .finish()
    }
}

/// Access to the store of a mounted [`TimelineScope`].
///
/// Cheap to clone. A handle made with [`TimelineHandle::detached`] or
/// outliving its scope fails every call with `MissingProvider`.
#[derive(Clone, Default)]
pub struct TimelineHandle {
    shared: Weak<Shared>,
}

impl TimelineHandle {
    /// A handle with no provider behind it.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }

    fn shared(&self) -> Result<Rc<Shared>, TimelineError> {
        self.shared.upgrade().ok_or(TimelineError::MissingProvider)
    }

    pub fn active_stage(&self) -> Result<Option<Stage>, TimelineError> {
        Ok(self.shared()?.store.borrow().active_stage())
    }

    pub fn revision(&self) -> Result<u64, TimelineError> {
        Ok(self.shared()?.store.borrow().revision())
    }

    /// Write the active stage and notify subscribers.
    ///
    /// Returns `Ok(true)` when the stage changed, `Ok(false)` when the store
    /// already held it. Subscribers run after the write is committed and may
    /// read through any handle, but must not write.
    pub fn set_active_stage(&self, stage: Stage) -> Result<bool, TimelineError> {
        let shared = self.shared()?;
        if shared.notifying.get() {
            tracing::warn!(stage = %stage, "rejected write from inside a subscriber");
            return Err(TimelineError::ReentrantWrite);
        }

        let listeners = shared.store.borrow_mut().commit(stage);
        let Some(listeners) = listeners else {
            return Ok(false);
        };

        shared.notifying.set(true);
        for listener in listeners {
            listener(stage);
        }
        shared.notifying.set(false);
        Ok(true)
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(Stage) + 'static,
    ) -> Result<SubscriptionId, TimelineError> {
        Ok(self.shared()?.store.borrow_mut().subscribe(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, TimelineError> {
        Ok(self.shared()?.store.borrow_mut().unsubscribe(id))
    }

    pub fn subscriber_count(&self) -> Result<usize, TimelineError> {
        Ok(self.shared()?.store.borrow().subscriber_count())
    }
}

impl std::fmt::Debug for TimelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
