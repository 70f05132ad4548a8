//! JSON bodies exchanged with the search endpoints

use crate::search::Envelope;
use crate::status::Status;
use crate::types::null_as_default;
use serde::{Deserialize, Serialize};

/// Paging preferences attached to a request while a paging scope is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    pub body_fields_only: bool,
    pub return_search_columns: bool,
    /// Absent when paging is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Body of the initial search call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchRequest<'a, C> {
    pub search_record: &'a C,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_preferences: Option<SearchPreferences>,
}

/// Body of a follow-up page call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchMoreRequest<'a> {
    pub search_id: &'a str,
    pub page_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_preferences: Option<SearchPreferences>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse<R> {
    pub search_result: SearchResult<R>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResult<R> {
    pub status: Status,
    /// Failed searches often report `null` totals
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_records: u64,
    pub page_size: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    pub page_index: Option<u32>,
    pub search_id: Option<String>,
    // No `default` attribute on generic fields, it would add an `R: Default` bound
    pub record_list: Option<RecordList<R>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordList<R> {
    pub record: Option<Vec<R>>,
}

impl<R> From<SearchResult<R>> for Envelope<R> {
    fn from(result: SearchResult<R>) -> Self {
        Self {
            status: result.status,
            page_index: result.page_index,
            page_size: result.page_size,
            total_pages: result.total_pages,
            total_records: result.total_records,
            search_id: result.search_id,
            records: result.record_list.and_then(|list| list.record),
        }
    }
}

impl<R> From<SearchResponse<R>> for Envelope<R> {
    fn from(response: SearchResponse<R>) -> Self {
        response.search_result.into()
    }
}
