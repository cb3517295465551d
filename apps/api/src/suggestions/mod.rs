pub mod fallback;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod service;
