//! Remote project record store
//!
//! This module provides:
//! - The `ProjectStore` trait the synchronizer is generic over
//! - HTTP client for the PHP endpoints
//! - Listing schema validation at the transport boundary

mod http;
pub mod schema;

pub use crate::config::CreateEncoding;
pub use http::{
    CREATE_PATH, DELETE_PATH, HttpProjectStore, HttpProjectStoreBuilder, LIST_PATH, UPDATE_PATH,
};

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::project::{EditValues, Project, ProjectDraft, ProjectId};

/// The four remote operations on the project list
///
/// Every call is a single attempt. Implementations report any non-success
/// answer as an error; callers decide how to surface it.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch the full project list in backend order
    async fn list(&self) -> Result<Vec<Project>>;

    /// Create a project from the draft; the backend assigns the id
    async fn create(&self, draft: &ProjectDraft) -> Result<()>;

    /// Replace the editable fields of a project
    async fn update(&self, id: &ProjectId, values: &EditValues) -> Result<()>;

    /// Delete a project
    async fn delete(&self, id: &ProjectId) -> Result<()>;
}

#[async_trait]
impl<S: ProjectStore + ?Sized> ProjectStore for Arc<S> {
    async fn list(&self) -> Result<Vec<Project>> {
        (**self).list().await
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<()> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &ProjectId, values: &EditValues) -> Result<()> {
        (**self).update(id, values).await
    }

    async fn delete(&self, id: &ProjectId) -> Result<()> {
        (**self).delete(id).await
    }
}
