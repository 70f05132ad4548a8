// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # paged-search
//!
//! A lazily paginated cursor over remote search results.
//!
//! The backend answers a search with the first page and a continuation token;
//! [`SearchCursor`] walks the whole result set as one sequence, asking for the
//! next page only when iteration reaches the end of what it holds. Failures
//! the backend reports inside an otherwise successful response surface as a
//! typed [`StatusFailure`] carrying the full diagnostic payload.
//!
//! ## Features
//!
//! - **Lazy Paging**: nothing is fetched before the first access
//! - **Pluggable Transport**: anything implementing [`SearchExecutor`]
//! - **HTTP Executor**: [`SearchService`] with auth, retries and rate limiting
//! - **Typed Failures**: status detail lookup by code
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paged_search::{ClientConfig, SearchCursor, SearchService, TemplateContext};
//!
//! fn main() -> paged_search::Result<()> {
//!     let config = ClientConfig::load("client.yaml", &TemplateContext::from_env())?;
//!     let service: SearchService<serde_json::Value> = SearchService::new(&config)?;
//!
//!     let criteria = serde_json::json!({"type": "customer"});
//!     let mut cursor = SearchCursor::with_page_size(&service, criteria, 100)?;
//!     println!("{} matching records", cursor.total_records()?);
//!
//!     for record in cursor {
//!         println!("{}", record?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SearchCursor: current / advance / is_valid / count      │
//! └─────────────────────────────┬────────────────────────────┘
//!                               │ SearchExecutor
//! ┌───────────┬─────────────────┴──────────┬─────────────────┐
//! │  classify │        SearchService       │  StatusFailure  │
//! ├───────────┼──────────┬────────┬────────┼─────────────────┤
//! │ Envelope  │   Auth   │  HTTP  │ Config │ find by code    │
//! │  → Page   │ OAuth2   │ Retry  │ YAML   │ message render  │
//! │           │ API Key  │ Limit  │ {{ }}  │                 │
//! └───────────┴──────────┴────────┴────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Status blocks and the typed status failure
pub mod status;

/// The paged search cursor and its executor contract
pub mod search;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// HTTP-backed search executor
pub mod service;

/// Client configuration
pub mod config;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use search::{classify, CursorPhase, Envelope, Page, PagingScope, SearchCursor, SearchExecutor};
pub use service::SearchService;
pub use status::{Status, StatusDetail, StatusFailure};
pub use template::TemplateContext;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
