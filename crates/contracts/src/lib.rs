pub mod analytics;
pub mod domain;
pub mod system;
