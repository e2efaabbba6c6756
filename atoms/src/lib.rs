//! Entity atoms for the space imagery catalog.
//!
//! Each entity module follows the same split: `model` (serde types),
//! `service` (DynamoDB access, no HTTP) and `http` (lambda handlers that
//! turn service results into responses).

pub mod assets;
pub mod categories;
pub mod comments;
pub mod error;
pub mod item;
pub mod labels;
pub mod respond;

pub use error::{AtomError, AtomResult};

/// RFC 3339 with fixed microsecond precision so timestamps sort lexically.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
