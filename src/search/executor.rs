//! Search executor contract

use super::envelope::Envelope;
use crate::error::Result;
use std::sync::Arc;

/// Performs the remote calls a [`SearchCursor`](super::SearchCursor) needs
///
/// Implementations own the transport: connection handling, serialization,
/// authentication and transport-level retries. Errors they return are handed
/// to the caller unchanged.
///
/// Paging preferences are per-session state of the executor. The cursor
/// brackets every call with [`SearchExecutor::set_paging_preferences`] and
/// [`SearchExecutor::clear_paging_preferences`] through a [`PagingScope`].
pub trait SearchExecutor {
    /// Search criteria, passed through untouched
    type Criteria;
    /// Record type decoded from each page
    type Record;

    /// Enable paging with the given page size for subsequent calls
    fn set_paging_preferences(&self, use_paging: bool, page_size: u32);

    /// Drop any paging preferences set earlier
    fn clear_paging_preferences(&self);

    /// Run the initial search
    fn execute_search(&self, criteria: &Self::Criteria) -> Result<Envelope<Self::Record>>;

    /// Fetch page `page_index` of the search identified by `search_id`
    fn execute_search_page(&self, search_id: &str, page_index: u32)
        -> Result<Envelope<Self::Record>>;
}

impl<E: SearchExecutor + ?Sized> SearchExecutor for &E {
    type Criteria = E::Criteria;
    type Record = E::Record;

    fn set_paging_preferences(&self, use_paging: bool, page_size: u32) {
        (**self).set_paging_preferences(use_paging, page_size);
    }

    fn clear_paging_preferences(&self) {
        (**self).clear_paging_preferences();
    }

    fn execute_search(&self, criteria: &Self::Criteria) -> Result<Envelope<Self::Record>> {
        (**self).execute_search(criteria)
    }

    fn execute_search_page(
        &self,
        search_id: &str,
        page_index: u32,
    ) -> Result<Envelope<Self::Record>> {
        (**self).execute_search_page(search_id, page_index)
    }
}

impl<E: SearchExecutor + ?Sized> SearchExecutor for Arc<E> {
    type Criteria = E::Criteria;
    type Record = E::Record;

    fn set_paging_preferences(&self, use_paging: bool, page_size: u32) {
        (**self).set_paging_preferences(use_paging, page_size);
    }

    fn clear_paging_preferences(&self) {
        (**self).clear_paging_preferences();
    }

    fn execute_search(&self, criteria: &Self::Criteria) -> Result<Envelope<Self::Record>> {
        (**self).execute_search(criteria)
    }

    fn execute_search_page(
        &self,
        search_id: &str,
        page_index: u32,
    ) -> Result<Envelope<Self::Record>> {
        (**self).execute_search_page(search_id, page_index)
    }
}

/// Paging preferences held for the lifetime of one remote call
///
/// Entering sets the preferences; dropping clears them, so a failed or
/// panicking call never leaves them behind on the shared executor.
#[must_use = "preferences are cleared as soon as the scope is dropped"]
pub struct PagingScope<'a, E: SearchExecutor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: SearchExecutor + ?Sized> PagingScope<'a, E> {
    /// Set paging preferences on `executor` until the scope drops
    pub fn enter(executor: &'a E, page_size: u32) -> Self {
        executor.set_paging_preferences(true, page_size);
        Self { executor }
    }
}

impl<E: SearchExecutor + ?Sized> Drop for PagingScope<'_, E> {
    fn drop(&mut self) {
        self.executor.clear_paging_preferences();
    }
}
