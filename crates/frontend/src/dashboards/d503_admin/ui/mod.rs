mod approval_modal;
mod dashboard;

pub use dashboard::AdminDashboard;
