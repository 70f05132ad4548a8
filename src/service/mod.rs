//! HTTP-backed search executor
//!
//! [`SearchService`] speaks the backend's JSON search protocol and exposes it
//! through the blocking [`SearchExecutor`](crate::search::SearchExecutor)
//! contract, so a [`SearchCursor`](crate::search::SearchCursor) can page
//! through live results:
//!
//! ```rust,ignore
//! let config = ClientConfig::load("client.yaml", &TemplateContext::from_env())?;
//! let service: SearchService<serde_json::Value> = SearchService::new(&config)?;
//! let cursor = SearchCursor::with_page_size(&service, criteria, 200)?;
//! for record in cursor {
//!     println!("{}", record?);
//! }
//! ```

mod client;
mod wire;

pub use client::SearchService;
pub use wire::SearchPreferences;

#[cfg(test)]
mod tests;
