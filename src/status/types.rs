//! Status payload types

use crate::types::null_as_default;
use serde::{Deserialize, Serialize};

/// Common status detail codes reported by search backends
pub mod codes {
    /// A referenced record or key does not exist
    pub const INVALID_KEY_OR_REF: &str = "INVALID_KEY_OR_REF";
    /// The search ran longer than the backend allows
    pub const ABORT_SEARCH_EXCEEDED_MAX_TIME: &str = "ABORT_SEARCH_EXCEEDED_MAX_TIME";
    /// The caller lacks permission for the searched record type
    pub const INSUFFICIENT_PERMISSION: &str = "INSUFFICIENT_PERMISSION";
    /// Catch-all backend error
    pub const UNEXPECTED_ERROR: &str = "UNEXPECTED_ERROR";
}

/// Severity of a status detail entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetailType {
    Error,
    Warn,
    Info,
}

/// One diagnostic entry of a status block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetail {
    /// Machine-readable code (see [`codes`])
    #[serde(default)]
    pub code: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Severity, when the backend reports one
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<DetailType>,
    /// Whether the failure happened after the record was submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_submit_failed: Option<bool>,
}

impl StatusDetail {
    /// Create a detail without a severity
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Create an error-level detail
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            detail_type: Some(DetailType::Error),
            ..Self::new(code, message)
        }
    }

    /// Create a warning-level detail
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            detail_type: Some(DetailType::Warn),
            ..Self::new(code, message)
        }
    }
}

/// Status block attached to every search response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Whether the backend considers the operation successful
    pub is_success: bool,
    /// Diagnostic entries, in backend order
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_detail: Vec<StatusDetail>,
}

impl Status {
    /// A successful status with no details
    pub fn success() -> Self {
        Self {
            is_success: true,
            status_detail: Vec::new(),
        }
    }

    /// A failed status carrying the given details
    pub fn failure(details: Vec<StatusDetail>) -> Self {
        Self {
            is_success: false,
            status_detail: details,
        }
    }

    /// Append a detail entry
    #[must_use]
    pub fn with_detail(mut self, detail: StatusDetail) -> Self {
        self.status_detail.push(detail);
        self
    }
}
