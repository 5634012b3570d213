//! Turns YouTube workout videos or free-text descriptions into structured
//! exercise lists with a locally hosted model.

pub mod config;
pub mod export;
pub mod extract;
pub mod models;
pub mod ollama;
pub mod prompt;
pub mod server;
pub mod youtube;
