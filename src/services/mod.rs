pub mod account_service;
pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod customer_service;
pub mod order_service;
pub mod otp_service;
pub mod product_service;
pub mod settings_service;
pub mod stats_service;
