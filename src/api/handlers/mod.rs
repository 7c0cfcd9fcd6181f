pub mod date;
pub mod health;
