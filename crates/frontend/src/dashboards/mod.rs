pub mod d500_student;
pub mod d501_dean;
pub mod d502_teacher;
pub mod d503_admin;
pub mod d504_rectorate;

pub use d500_student::ui::StudentDashboard;
pub use d501_dean::ui::DeanDashboard;
pub use d502_teacher::ui::TeacherDashboard;
pub use d503_admin::ui::AdminDashboard;
pub use d504_rectorate::ui::RectorateDashboard;
