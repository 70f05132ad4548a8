//! Backend status payloads and the typed status failure
//!
//! A search call can complete at the transport level and still report an
//! application-level failure in its status block. [`Status`] models that block
//! and [`StatusFailure`] is the error raised when `is_success` is false.

mod failure;
mod types;

pub use failure::StatusFailure;
pub use types::{codes, DetailType, Status, StatusDetail};
