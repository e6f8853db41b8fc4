pub mod health;
pub mod homepage;
pub mod listings;
pub mod membership;
