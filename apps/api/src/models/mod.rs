pub mod api;
pub mod message;
pub mod user;
