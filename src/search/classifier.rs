//! Response classification
//!
//! Turns one [`Envelope`] into either a page of records or an error.

use super::envelope::Envelope;
use crate::error::{Error, Result};
use crate::status::{DetailType, StatusFailure};
use tracing::{error, warn};

/// A successfully classified page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    /// Continuation token reported with this page
    pub search_id: String,
    /// Page index reported by the backend (0 when omitted)
    pub page_index: u32,
    /// Total pages reported by the backend
    pub total_pages: u32,
    /// Total records reported by the backend
    pub total_records: u64,
    /// Records of this page, in backend order
    pub records: Vec<R>,
}

impl<R> Page<R> {
    /// Whether the backend reports pages after this one
    pub fn has_more(&self) -> bool {
        self.page_index < self.total_pages
    }
}

/// Classify a search response
///
/// A failed status becomes [`Error::Status`] carrying the whole status block.
/// A successful status without a search id is a backend defect and becomes
/// [`Error::MissingSearchId`]: paging on without it could re-request the
/// same page forever.
pub fn classify<R>(envelope: Envelope<R>) -> Result<Page<R>> {
    let Envelope {
        status,
        page_index,
        total_pages,
        total_records,
        search_id,
        records,
        ..
    } = envelope;

    if !status.is_success {
        return Err(StatusFailure::new(status).into());
    }

    for detail in &status.status_detail {
        if detail.detail_type != Some(DetailType::Info) {
            warn!(
                "Search succeeded with status detail {}: {}",
                detail.code, detail.message
            );
        }
    }

    let search_id = match search_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            error!("Successful search response without a searchId");
            return Err(Error::MissingSearchId);
        }
    };

    Ok(Page {
        search_id,
        page_index: page_index.unwrap_or(0),
        total_pages,
        total_records,
        records: records.unwrap_or_default(),
    })
}
