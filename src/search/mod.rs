//! Paged search cursor
//!
//! Presents the full result set of a remote search as one sequence, fetching
//! pages from a [`SearchExecutor`] only when iteration runs past the records
//! already buffered.
//!
//! # Overview
//!
//! ```text
//!  SearchCursor ──execute_search──────────▶ SearchExecutor
//!       │       ──execute_search_page(n)──▶      │
//!       │                                        ▼
//!       └──────────── classify ◀──────── Envelope<Record>
//! ```
//!
//! Every remote call is wrapped in a paging scope: preferences are set before
//! the call and cleared when the scope drops, whatever the outcome.

mod classifier;
mod cursor;
mod envelope;
mod executor;

pub use classifier::{classify, Page};
pub use cursor::{CursorPhase, SearchCursor, DEFAULT_PAGE_SIZE};
pub use envelope::Envelope;
pub use executor::{PagingScope, SearchExecutor};
