pub mod bearer;
pub mod gate;
