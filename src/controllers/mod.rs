pub mod drill;
pub mod health;
