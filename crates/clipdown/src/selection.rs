//! The selection record handed over by the page-selection collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a selection came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionMetadata {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub domain: String,
    /// Opaque details about the selection range; passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_info: Option<serde_json::Value>,
}

/// A user selection: untrusted HTML, its plain text, and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedContent {
    pub html: String,
    #[serde(default)]
    pub text: String,
    pub metadata: SelectionMetadata,
}
