//! Record synchronizer
//!
//! Owns the client-side view of the project list and reconciles it with the
//! remote store. The client is a cache of server state: every successful
//! mutation is followed by a full reload, and the list on display is always
//! a whole snapshot (from the last listing, or the bundled fallback).
//!
//! Failures never escape as raw errors. Each operation maps its own failure
//! to one [`SyncFailure`] category, stores it as the active message, and logs
//! the underlying cause.

mod failure;
mod state;

pub use failure::SyncFailure;
pub use state::{EditState, LoadApplied, LoadTicket, SyncSnapshot, SyncState};

use std::sync::Arc;

use tracing::debug;

use crate::project::{EditValues, Project, ProjectDraft, ProjectId};
use crate::store::ProjectStore;

use state::LoadGuard;

/// Drives a [`SyncState`] against a [`ProjectStore`]
///
/// The async operations take `&mut self` and run one request at a time. A
/// driver that needs overlapping requests can clone [`store_handle`] and use
/// the `begin_*`/`finish_*` transitions on [`state_mut`] instead; listing
/// responses are then sequenced by [`LoadTicket`].
///
/// [`store_handle`]: RecordSynchronizer::store_handle
/// [`state_mut`]: RecordSynchronizer::state_mut
pub struct RecordSynchronizer<S: ProjectStore> {
    store: Arc<S>,
    state: SyncState,
}

impl<S: ProjectStore> std::fmt::Debug for RecordSynchronizer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSynchronizer")
            .field("records", &self.state.records().len())
            .field("loading", &self.state.is_loading())
            .field("error", &self.state.error())
            .field("editing", &self.state.editing_id())
            .finish()
    }
}

impl<S: ProjectStore> RecordSynchronizer<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    pub fn with_shared_store(store: Arc<S>) -> Self {
        Self {
            store,
            state: SyncState::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shared handle for issuing requests from other tasks
    pub fn store_handle(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SyncState {
        &mut self.state
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.state.snapshot()
    }

    pub fn records(&self) -> &[Project] {
        self.state.records()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<SyncFailure> {
        self.state.error()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.state.error_message()
    }

    pub fn draft(&self) -> &ProjectDraft {
        self.state.draft()
    }

    pub fn draft_mut(&mut self) -> &mut ProjectDraft {
        self.state.draft_mut()
    }

    pub fn edit_state(&self) -> &EditState {
        self.state.edit_state()
    }

    pub fn editing_id(&self) -> Option<&ProjectId> {
        self.state.editing_id()
    }

    pub fn edit_values(&self) -> Option<&EditValues> {
        self.state.edit_values()
    }

    pub fn edit_values_mut(&mut self) -> Option<&mut EditValues> {
        self.state.edit_values_mut()
    }

    /// Replace the list with a fresh listing, or the fallback on failure
    pub async fn load_all(&mut self) -> Result<(), SyncFailure> {
        let guard = LoadGuard::begin(&mut self.state);
        let result = self.store.list().await;
        match guard.finish(result) {
            LoadApplied::Listed(_) | LoadApplied::Stale => Ok(()),
            LoadApplied::Fallback => Err(SyncFailure::Connectivity),
        }
    }

    /// Submit the creation form
    ///
    /// No client-side validation; the backend decides what it accepts.
    pub async fn create(&mut self) -> Result<(), SyncFailure> {
        self.state.begin_mutation();
        let result = self.store.create(self.state.draft()).await;
        self.state.finish_create(result)?;
        self.reload_after("create").await;
        Ok(())
    }

    /// Open a record's fields for editing; no network call
    pub fn begin_edit(&mut self, id: &ProjectId) -> bool {
        self.state.begin_edit(id)
    }

    /// Discard the editing buffer; no network call
    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// Send the open editing buffer to the backend
    pub async fn commit_edit(&mut self) -> Result<(), SyncFailure> {
        let (id, values) = match self.state.edit_state() {
            EditState::Editing { id, values } => (id.clone(), values.clone()),
            EditState::NotEditing => {
                debug!("No edit buffer open, nothing to commit");
                return Ok(());
            }
        };
        self.commit_edit_with(&id, &values).await
    }

    /// Replace all four editable fields of `id`
    pub async fn commit_edit_with(
        &mut self,
        id: &ProjectId,
        values: &EditValues,
    ) -> Result<(), SyncFailure> {
        self.state.begin_mutation();
        let result = self.store.update(id, values).await;
        self.state.finish_update(id, result)?;
        self.reload_after("update").await;
        Ok(())
    }

    /// Delete a record
    pub async fn remove(&mut self, id: &ProjectId) -> Result<(), SyncFailure> {
        self.state.begin_mutation();
        let result = self.store.delete(id).await;
        self.state.finish_delete(id, result)?;
        self.reload_after("delete").await;
        Ok(())
    }

    /// The mutation already succeeded; a failed reload only leaves its own
    /// connectivity message in the state
    async fn reload_after(&mut self, operation: &'static str) {
        if self.load_all().await.is_err() {
            debug!(operation, "Reload after successful mutation fell back");
        }
    }
}
