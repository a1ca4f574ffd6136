mod dashboard;

pub use dashboard::StudentDashboard;
