pub mod cost;
pub mod health;
pub mod liability;
pub mod plans;
pub mod procedures;
pub mod providers;
