//! Folio Core Library
//!
//! This crate provides the client side of the portfolio admin panel:
//! - Project records and the bundled fallback snapshot
//! - HTTP client for the PHP record-store endpoints
//! - Record synchronizer (list/create/update/delete with reload-after-write)
//! - Asset URL resolution
//! - Configuration with file persistence

pub mod assets;
pub mod config;
pub mod error;
pub mod project;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use project::{EditValues, ImageUpload, Project, ProjectDraft, ProjectId};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::project::{EditValues, ImageUpload, Project, ProjectDraft, ProjectId};
    pub use crate::store::{HttpProjectStore, ProjectStore};
    pub use crate::sync::{EditState, RecordSynchronizer, SyncFailure};
}
