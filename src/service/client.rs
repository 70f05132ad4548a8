//! Blocking search executor over the async HTTP client

use super::wire::{SearchMoreRequest, SearchPreferences, SearchRequest, SearchResponse};
use crate::config::{ClientConfig, SearchConfig};
use crate::error::Result;
use crate::http::HttpClient;
use crate::search::{Envelope, SearchExecutor};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Search executor backed by the remote JSON search API
///
/// Owns a current-thread tokio runtime and blocks on each request, so it must
/// not be called from inside another async runtime.
pub struct SearchService<R> {
    runtime: Runtime,
    http: HttpClient,
    search_url: String,
    search_more_url: String,
    defaults: SearchConfig,
    preferences: Mutex<Option<SearchPreferences>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> SearchService<R> {
    /// Build a service from a validated client config
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let http = HttpClient::with_auth(config.http.to_client_config(), config.auth.clone())?;

        Ok(Self {
            runtime,
            http,
            search_url: config.search_url(),
            search_more_url: config.search_more_url(),
            defaults: config.search.clone(),
            preferences: Mutex::new(None),
            _record: PhantomData,
        })
    }

    /// Page size configured for this client
    pub fn default_page_size(&self) -> u32 {
        self.defaults.page_size
    }

    /// Preferences that the next request will carry
    pub fn preferences(&self) -> Option<SearchPreferences> {
        *self
            .preferences
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_preferences(&self, preferences: Option<SearchPreferences>) {
        *self
            .preferences
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = preferences;
    }

    fn post<B: serde::Serialize>(&self, url: &str, body: &B) -> Result<Envelope<R>> {
        let response: SearchResponse<R> = self.runtime.block_on(self.http.post_json(url, body))?;
        Ok(response.into())
    }
}

impl<R: DeserializeOwned> SearchExecutor for SearchService<R> {
    type Criteria = JsonValue;
    type Record = R;

    fn set_paging_preferences(&self, use_paging: bool, page_size: u32) {
        self.set_preferences(Some(SearchPreferences {
            body_fields_only: self.defaults.body_fields_only,
            return_search_columns: self.defaults.return_search_columns,
            page_size: use_paging.then_some(page_size),
        }));
    }

    fn clear_paging_preferences(&self) {
        self.set_preferences(None);
    }

    fn execute_search(&self, criteria: &JsonValue) -> Result<Envelope<R>> {
        debug!("POST {}", self.search_url);
        let body = SearchRequest {
            search_record: criteria,
            search_preferences: self.preferences(),
        };
        self.post(&self.search_url, &body)
    }

    fn execute_search_page(&self, search_id: &str, page_index: u32) -> Result<Envelope<R>> {
        debug!("POST {} (page {})", self.search_more_url, page_index);
        let body = SearchMoreRequest {
            search_id,
            page_index,
            search_preferences: self.preferences(),
        };
        self.post(&self.search_more_url, &body)
    }
}

impl<R> std::fmt::Debug for SearchService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("search_url", &self.search_url)
            .field("search_more_url", &self.search_more_url)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}
