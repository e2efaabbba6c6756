//! Process-wide plumbing shared by the lambda binaries.

pub mod catalog;
pub mod config;
pub mod http;
pub mod state;
pub mod telemetry;

pub use config::{ConfigError, Settings};
pub use state::AppState;
