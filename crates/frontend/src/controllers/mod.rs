//! Per-widget state controllers.
//!
//! Plain structs without DOM access: dashboards keep them in signals and feed
//! them responses; views read derived rows and chart specs back.

pub mod achievement_grant;
pub mod cascade;
pub mod dynamics;
pub mod fetch_state;
pub mod generation;
pub mod journal;
pub mod ranking_table;
pub mod roster;
pub mod subject_roster;

pub use fetch_state::{ControlFetch, FetchPhase, FetchPolicy};
pub use generation::{Generation, GenerationCounter};
