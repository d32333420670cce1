pub mod handlers;
pub mod summary;
