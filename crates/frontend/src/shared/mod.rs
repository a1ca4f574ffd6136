pub mod api_utils;
pub mod chart;
pub mod components;
pub mod config;
pub mod date_utils;
pub mod download;
pub mod error;
pub mod format;
pub mod icons;
pub mod list_utils;
pub mod modal;
pub mod reference_api;
pub mod reports;
pub mod toast;
pub mod transport;
