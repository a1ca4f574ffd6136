pub mod api;
pub mod approval;
pub mod state;
pub mod ui;
