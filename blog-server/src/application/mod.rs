pub mod auth_guard;
pub mod auth_service;
pub mod post_service;
pub mod user_service;
