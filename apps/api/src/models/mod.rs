pub mod application;
pub mod task;
