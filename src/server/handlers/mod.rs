pub mod health;
pub mod knowledge;
pub mod query;
