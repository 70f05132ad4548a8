//! Search response envelope

use crate::status::Status;
use crate::types::null_as_default;
use serde::{Deserialize, Serialize};

/// Decoded response of one search or page request
///
/// Page metadata is whatever the backend reported; nothing here is computed
/// locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<R> {
    /// Application-level status
    pub status: Status,
    /// 1-based index of this page, when reported
    pub page_index: Option<u32>,
    /// Page size the backend applied
    pub page_size: Option<u32>,
    /// Total number of pages in the result set
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    /// Total number of records in the result set
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_records: u64,
    /// Continuation token for follow-up page requests
    pub search_id: Option<String>,
    /// Records of this page, absent when the page is empty
    pub records: Option<Vec<R>>,
}

impl<R> Envelope<R> {
    /// A successful envelope for page `page_index` of `total_pages`
    pub fn success(
        search_id: impl Into<String>,
        page_index: u32,
        total_pages: u32,
        total_records: u64,
        records: Vec<R>,
    ) -> Self {
        Self {
            status: Status::success(),
            page_index: Some(page_index),
            page_size: None,
            total_pages,
            total_records,
            search_id: Some(search_id.into()),
            records: Some(records),
        }
    }

    /// A failed envelope carrying `status`
    pub fn failure(status: Status) -> Self {
        Self {
            status,
            page_index: None,
            page_size: None,
            total_pages: 0,
            total_records: 0,
            search_id: None,
            records: None,
        }
    }

    /// Replace the record list
    #[must_use]
    pub fn with_records(mut self, records: Option<Vec<R>>) -> Self {
        self.records = records;
        self
    }
}
