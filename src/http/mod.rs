//! HTTP transport
//!
//! JSON POST client with retries, backoff and governor-based rate limiting.
//! Authentication is applied per request through [`crate::auth`].

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
