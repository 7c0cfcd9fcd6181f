pub mod auth;
pub mod timestamp;
