pub mod icons;
pub mod progress;
pub mod timeline_view;

pub use progress::{TimelineUI, UiMode};
pub use timeline_view::{StageEntry, TimelineRenderer, TimelineView};
