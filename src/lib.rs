// src/lib.rs

pub mod agents;
pub mod app;
pub mod chat_message;
pub mod chat_view;
pub mod client;
pub mod config;
pub mod errors;
pub mod log_view;
pub mod protocol;
pub mod reducer;
pub mod status_indicator;
pub mod store;

pub use app::App;
