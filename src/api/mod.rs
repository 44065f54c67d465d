//! HTTP handlers

pub mod health;
pub mod webhook;

// Re-export handlers
pub use health::health;
pub use webhook::handle_webhook;
