//! Call session lifecycle
//!
//! Tracks a single voice or video call from initiation through termination
//! and publishes observable state to the presentation layer.

pub mod config;
pub mod controller;
pub mod state;

pub use config::CallConfig;
pub use controller::CallController;
pub use state::{format_elapsed, CallMode, CallState};
