pub mod auth;
pub mod breaker;
