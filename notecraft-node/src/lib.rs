pub mod api;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod prompts;
pub mod services;
