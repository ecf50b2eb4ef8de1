pub mod config;
pub mod errors;
pub mod gates;
pub mod logging;
pub mod navigator;
pub mod routes;
pub mod stage;
pub mod timeline;
pub mod ui;

pub use errors::TimelineError;
pub use gates::{AccessGate, ProgressSource, StaticProgress};
pub use navigator::{NavigationOutcome, Navigator, RouteMount};
pub use routes::RouteTable;
pub use stage::{Stage, StageStatus};
pub use timeline::{TimelineHandle, TimelineScope, TimelineStore};
pub use ui::{TimelineRenderer, TimelineView};
