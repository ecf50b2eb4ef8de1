//! Scoped timeline state.
//!
//! A [`TimelineScope`] is the provider: it owns one [`TimelineStore`] for as
//! long as the timeline subtree is mounted. Route mounts and renderers get a
//! [`TimelineHandle`] passed to them explicitly.

pub mod scope;
pub mod store;

pub use scope::{TimelineHandle, TimelineScope};
pub use store::{Listener, SubscriptionId, TimelineStore};
