//! Batched widget queries: which widgets a role mounts, how the request is
//! built, and how the response reaches each widget.

pub mod api;
pub mod distributor;
pub mod query;
pub mod slot;
pub mod tracker;
pub mod widgets;

pub use api::{spawn_query, WidgetDashboard};
pub use distributor::{distribute, distribute_failure, RendererMap, WidgetInput};
pub use query::build_query;
pub use slot::{SlotStatus, WidgetSlot};
pub use tracker::{BatchTracker, PendingQuery};
pub use widgets::{widgets_for_role, WidgetSet};
