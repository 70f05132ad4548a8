//! Typed failure for "the call worked, the status says it didn't"

use super::types::{Status, StatusDetail};
use std::fmt;

/// Fixed lead-in of the rendered status details
const DETAIL_PREFIX: &str = "Something went wrong with your request: ";

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Raised when a search response reports `is_success == false`
///
/// The full status block is kept, so callers can inspect individual detail
/// codes with [`StatusFailure::find_detail_by_code`]. The rendered message is
/// any caller-supplied context, one line per [`StatusFailure::add_message`]
/// call, followed by the status details serialized as JSON.
#[derive(Debug)]
pub struct StatusFailure {
    status: Status,
    code: Option<i64>,
    extra: String,
    source: Option<BoxedSource>,
}

impl StatusFailure {
    /// Create a failure from a status block
    pub fn new(status: Status) -> Self {
        Self {
            status,
            code: None,
            extra: String::new(),
            source: None,
        }
    }

    /// Attach a numeric code
    #[must_use]
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a descriptive message
    #[must_use]
    pub fn with_message(mut self, message: impl AsRef<str>) -> Self {
        self.add_message(message);
        self
    }

    /// Attach the lower-level error that led to this failure
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a descriptive message ahead of the status details
    ///
    /// Messages accumulate in call order. Empty messages are ignored.
    pub fn add_message(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if !message.is_empty() {
            self.extra.push_str(message);
            self.extra.push('\n');
        }
    }

    /// The raw status block
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Consume the failure and return the status block
    pub fn into_status(self) -> Status {
        self.status
    }

    /// Numeric code, if one was attached
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// Full rendered message
    pub fn message(&self) -> String {
        format!("{}{DETAIL_PREFIX}{}", self.extra, self.render_details())
    }

    /// First detail entry whose code equals `code`
    pub fn find_detail_by_code(&self, code: &str) -> Option<&StatusDetail> {
        self.status.status_detail.iter().find(|d| d.code == code)
    }

    /// Check whether any detail entry carries `code`
    pub fn contains_code(&self, code: &str) -> bool {
        self.find_detail_by_code(code).is_some()
    }

    fn render_details(&self) -> String {
        // Detail entries only hold strings, bools and enums, so this cannot fail.
        serde_json::to_string(&self.status.status_detail).unwrap_or_else(|_| "[]".to_string())
    }
}

impl fmt::Display for StatusFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for StatusFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
