pub mod admins;
pub mod auth;
pub mod cart;
pub mod customers;
pub mod orders;
pub mod otp;
pub mod products;
pub mod settings;
pub mod stats;
