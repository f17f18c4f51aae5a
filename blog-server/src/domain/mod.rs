pub mod error;
pub mod post;
pub mod stats;
pub mod user;
