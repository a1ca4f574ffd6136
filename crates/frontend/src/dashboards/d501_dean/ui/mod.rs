mod dashboard;

pub use dashboard::DeanDashboard;
