mod dashboard;

pub use dashboard::RectorateDashboard;
