pub mod academic;
pub mod journal;
