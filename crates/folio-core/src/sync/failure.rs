//! User-facing failure categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// The one failure message a renderer shows at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncFailure {
    /// Listing failed; the fallback snapshot is on display
    Connectivity,
    Create,
    Update,
    Delete,
}

impl SyncFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Connectivity => "Backend not reachable - showing current local projects.",
            Self::Create => "Create failed. Ensure PHP handles file uploads and CORS.",
            Self::Update => "Update failed. Verify PHP and DB permissions.",
            Self::Delete => "Delete failed. Ensure endpoint exists and uses prepared statements.",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Connectivity => "S001",
            Self::Create => "S002",
            Self::Update => "S003",
            Self::Delete => "S004",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SyncFailure {}
