pub mod api;
pub mod downloads;
