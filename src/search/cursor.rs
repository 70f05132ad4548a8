//! The paged search cursor state machine

use super::classifier::classify;
use super::envelope::Envelope;
use super::executor::{PagingScope, SearchExecutor};
use crate::error::{Error, Result};
use std::fmt;
use tracing::{debug, warn};

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Observable state of a [`SearchCursor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPhase {
    /// No search has been issued yet
    Uninitialized,
    /// The backend reports pages that have not been fetched
    HasMore,
    /// Every page has been fetched
    Exhausted,
    /// A fetch failed; the cursor will not fetch again
    Failed,
}

/// Search session as last reported by the backend
#[derive(Debug, Clone)]
struct Session {
    search_id: String,
    page: u32,
    max_page: u32,
    total_records: u64,
    /// Set when a follow-up page did not move the page index forward
    stalled: bool,
}

impl Session {
    fn has_more(&self) -> bool {
        !self.stalled && self.page < self.max_page
    }
}

#[derive(Debug)]
enum CursorState {
    Uninitialized,
    Active(Session),
    Failed(Option<Session>),
}

/// Lazily paginated view over the results of one remote search
///
/// Nothing is fetched until the first call to [`current`](Self::current),
/// [`advance`](Self::advance), [`is_valid`](Self::is_valid),
/// [`total_records`](Self::total_records) or iteration. Every one of those may block on a
/// remote call, so each can fail with a transport error or a status failure.
///
/// ```rust,ignore
/// let mut cursor = SearchCursor::with_page_size(&service, criteria, 100)?;
/// println!("{} matches", cursor.total_records()?);
/// for record in cursor {
///     let record = record?;
///     // ...
/// }
/// ```
///
/// The cursor is single-use. [`restart`](Self::restart) only rewinds over the
/// records already fetched; a fresh search needs a new cursor.
pub struct SearchCursor<E: SearchExecutor> {
    executor: E,
    criteria: E::Criteria,
    page_size: u32,
    state: CursorState,
    buffer: Vec<E::Record>,
    position: usize,
    /// The iterator has handed out the record at `position`
    yielded: bool,
}

impl<E: SearchExecutor> SearchCursor<E> {
    /// Create a cursor with the default page size
    pub fn new(executor: E, criteria: E::Criteria) -> Self {
        Self {
            executor,
            criteria,
            page_size: DEFAULT_PAGE_SIZE,
            state: CursorState::Uninitialized,
            buffer: Vec::new(),
            position: 0,
            yielded: false,
        }
    }

    /// Create a cursor requesting `page_size` records per page
    pub fn with_page_size(executor: E, criteria: E::Criteria, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid_value(
                "page_size",
                "must be greater than zero",
            ));
        }
        let mut cursor = Self::new(executor, criteria);
        cursor.page_size = page_size;
        Ok(cursor)
    }

    /// Record at the current position
    ///
    /// Returns `None` once the results are exhausted or the cursor has failed.
    pub fn current(&mut self) -> Result<Option<&E::Record>> {
        self.ensure_started()?;
        if self.is_failed() {
            return Ok(None);
        }
        Ok(self.buffer.get(self.position))
    }

    /// Move to the next record, fetching the next page when the buffer runs out
    pub fn advance(&mut self) -> Result<()> {
        self.ensure_started()?;
        if self.is_failed() {
            return Ok(());
        }
        self.yielded = false;
        if self.position < self.buffer.len() {
            self.position += 1;
        }
        if self.position >= self.buffer.len() {
            self.search_more()?;
        }
        Ok(())
    }

    /// Whether the position refers to a buffered record
    pub fn is_valid(&mut self) -> Result<bool> {
        self.ensure_started()?;
        Ok(!self.is_failed() && self.position < self.buffer.len())
    }

    /// Zero-based index into the buffered sequence
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewind to the first buffered record without searching again
    pub fn restart(&mut self) {
        self.position = 0;
        self.yielded = false;
    }

    /// Total number of records as reported by the backend
    ///
    /// This is the backend's figure, not the number of records buffered. The
    /// two differ whenever the backend's totals disagree with the pages it
    /// actually returns.
    pub fn total_records(&mut self) -> Result<u64> {
        self.ensure_started()?;
        Ok(self.session().map_or(0, |s| s.total_records))
    }

    /// Current state machine phase
    pub fn phase(&self) -> CursorPhase {
        match &self.state {
            CursorState::Uninitialized => CursorPhase::Uninitialized,
            CursorState::Active(session) if session.has_more() => CursorPhase::HasMore,
            CursorState::Active(_) => CursorPhase::Exhausted,
            CursorState::Failed(_) => CursorPhase::Failed,
        }
    }

    /// Last page index fetched (0 before the first fetch)
    pub fn current_page(&self) -> u32 {
        self.session().map_or(0, |s| s.page)
    }

    /// Total pages reported by the backend (0 before the first fetch)
    pub fn total_pages(&self) -> u32 {
        self.session().map_or(0, |s| s.max_page)
    }

    /// Continuation token of the search session, once known
    pub fn search_id(&self) -> Option<&str> {
        self.session().map(|s| s.search_id.as_str())
    }

    /// Page size sent with every request
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Every record fetched so far, in backend order
    pub fn buffered(&self) -> &[E::Record] {
        &self.buffer
    }

    fn is_failed(&self) -> bool {
        matches!(self.state, CursorState::Failed(_))
    }

    fn session(&self) -> Option<&Session> {
        match &self.state {
            CursorState::Uninitialized => None,
            CursorState::Active(session) => Some(session),
            CursorState::Failed(session) => session.as_ref(),
        }
    }

    fn ensure_started(&mut self) -> Result<()> {
        if matches!(self.state, CursorState::Uninitialized) {
            self.initial_search()?;
        }
        Ok(())
    }

    fn initial_search(&mut self) -> Result<()> {
        debug!("Running initial search (page size {})", self.page_size);
        let response = {
            let _scope = PagingScope::enter(&self.executor, self.page_size);
            self.executor.execute_search(&self.criteria)
        };
        self.absorb(response)
    }

    /// Fetch follow-up pages until a record is available or none remain
    fn search_more(&mut self) -> Result<()> {
        loop {
            let (search_id, page_index) = match &self.state {
                CursorState::Active(session) if session.has_more() => {
                    (session.search_id.clone(), session.page + 1)
                }
                _ => return Ok(()),
            };

            debug!("Fetching search page {}", page_index);
            let response = {
                let _scope = PagingScope::enter(&self.executor, self.page_size);
                self.executor.execute_search_page(&search_id, page_index)
            };
            self.absorb(response)?;

            if let CursorState::Active(session) = &mut self.state {
                if session.page < page_index {
                    warn!(
                        "Requested page {} but the backend answered with page {}; stopping pagination",
                        page_index, session.page
                    );
                    session.stalled = true;
                }
            }

            if self.position < self.buffer.len() {
                return Ok(());
            }
        }
    }

    /// Classify a response and fold it into the cursor state
    fn absorb(&mut self, response: Result<Envelope<E::Record>>) -> Result<()> {
        match response.and_then(classify) {
            Ok(page) => {
                debug!(
                    "Search page {}/{} received with {} records ({} total)",
                    page.page_index,
                    page.total_pages,
                    page.records.len(),
                    page.total_records
                );
                self.buffer.extend(page.records);
                self.state = CursorState::Active(Session {
                    search_id: page.search_id,
                    page: page.page_index,
                    max_page: page.total_pages,
                    total_records: page.total_records,
                    stalled: false,
                });
                Ok(())
            }
            Err(e) => {
                let previous = std::mem::replace(&mut self.state, CursorState::Uninitialized);
                self.state = CursorState::Failed(match previous {
                    CursorState::Active(session) => Some(session),
                    CursorState::Failed(session) => session,
                    CursorState::Uninitialized => None,
                });
                Err(e)
            }
        }
    }
}

impl<E> Iterator for SearchCursor<E>
where
    E: SearchExecutor,
    E::Record: Clone,
{
    type Item = Result<E::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded {
            if let Err(e) = self.advance() {
                return Some(Err(e));
            }
        }
        let record = match self.current() {
            Ok(Some(record)) => record.clone(),
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        self.yielded = true;
        Some(Ok(record))
    }
}

impl<E: SearchExecutor> fmt::Debug for SearchCursor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCursor")
            .field("page_size", &self.page_size)
            .field("phase", &self.phase())
            .field("current_page", &self.current_page())
            .field("total_pages", &self.total_pages())
            .field("position", &self.position)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
