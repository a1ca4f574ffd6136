pub mod api;
pub mod session;
pub mod storage;
