//! Synchronizer state and its transitions
//!
//! Every transition here is synchronous. Network calls happen between a
//! `begin_*` and the matching `finish_*`, which lets a driver run requests on
//! other tasks and feed the results back in whatever order they resolve.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::project::{EditValues, Project, ProjectDraft, ProjectId, fallback_projects};

use super::failure::SyncFailure;

/// Which record, if any, is open for inline editing
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    NotEditing,
    Editing { id: ProjectId, values: EditValues },
}

impl EditState {
    pub fn id(&self) -> Option<&ProjectId> {
        match self {
            Self::NotEditing => None,
            Self::Editing { id, .. } => Some(id),
        }
    }

    pub fn is_editing(&self, target: &ProjectId) -> bool {
        self.id() == Some(target)
    }
}

/// Identifies one issued listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// What a finished listing did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadApplied {
    /// Records replaced by the backend's list
    Listed(usize),
    /// Listing failed; records replaced by the fallback snapshot
    Fallback,
    /// A newer listing was issued; this response was dropped
    Stale,
}

/// Read-only copy of the state for renderers and JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSnapshot {
    pub records: Vec<Project>,
    pub loading: bool,
    pub error: Option<SyncFailure>,
    pub editing_id: Option<ProjectId>,
    pub from_fallback: bool,
    pub last_synced: Option<DateTime<Utc>>,
}

/// Client-side view of the project list
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    records: Vec<Project>,
    loading: bool,
    error: Option<SyncFailure>,
    draft: ProjectDraft,
    edit: EditState,
    from_fallback: bool,
    last_synced: Option<DateTime<Utc>>,
    latest_ticket: u64,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Project] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<SyncFailure> {
        self.error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(|e| e.message())
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProjectDraft {
        &mut self.draft
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn editing_id(&self) -> Option<&ProjectId> {
        self.edit.id()
    }

    pub fn edit_values(&self) -> Option<&EditValues> {
        match &self.edit {
            EditState::NotEditing => None,
            EditState::Editing { values, .. } => Some(values),
        }
    }

    pub fn edit_values_mut(&mut self) -> Option<&mut EditValues> {
        match &mut self.edit {
            EditState::NotEditing => None,
            EditState::Editing { values, .. } => Some(values),
        }
    }

    /// True if the records on display are the bundled snapshot
    pub fn is_fallback(&self) -> bool {
        self.from_fallback
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn find(&self, id: &ProjectId) -> Option<&Project> {
        self.records.iter().find(|p| p.id.as_ref() == Some(id))
    }

    /// Find a record by the id as a user typed it
    ///
    /// Matches on the printed form, so `"3"` finds a record whose id arrived
    /// as either `3` or `"3"`. The returned id is the backend's own value.
    pub fn resolve(&self, typed: &str) -> Option<&Project> {
        let typed = typed.trim();
        self.records
            .iter()
            .find(|p| p.id.as_ref().is_some_and(|id| id.to_string() == typed))
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            records: self.records.clone(),
            loading: self.loading,
            error: self.error,
            editing_id: self.edit.id().cloned(),
            from_fallback: self.from_fallback,
            last_synced: self.last_synced,
        }
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// Issue a new listing; any earlier outstanding listing becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.loading = true;
        self.error = None;
        debug!(seq = self.latest_ticket, "Listing issued");
        LoadTicket(self.latest_ticket)
    }

    /// Apply a listing result if it belongs to the latest ticket
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: crate::Result<Vec<Project>>,
    ) -> LoadApplied {
        if ticket.0 != self.latest_ticket {
            debug!(
                seq = ticket.0,
                latest = self.latest_ticket,
                "Dropping stale listing response"
            );
            return LoadApplied::Stale;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.from_fallback = false;
                self.last_synced = Some(Utc::now());
                info!(count, "Project list replaced");
                LoadApplied::Listed(count)
            }
            Err(e) => {
                self.record_failure(SyncFailure::Connectivity, &e);
                self.records = fallback_projects();
                self.from_fallback = true;
                LoadApplied::Fallback
            }
        }
    }

    /// Clear `loading` for a listing that will never report back
    pub fn abandon_load(&mut self, ticket: LoadTicket) {
        if ticket.0 == self.latest_ticket && self.loading {
            warn!(seq = ticket.0, "Listing abandoned before completion");
            self.loading = false;
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Start a create/update/delete; clears the previous message
    pub fn begin_mutation(&mut self) {
        self.error = None;
    }

    /// Reset the creation form on success, keep it on failure
    pub fn finish_create(&mut self, result: crate::Result<()>) -> Result<(), SyncFailure> {
        match result {
            Ok(()) => {
                self.draft = ProjectDraft::default();
                Ok(())
            }
            Err(e) => Err(self.record_failure(SyncFailure::Create, &e)),
        }
    }

    /// Open a record for editing, discarding any other open buffer
    ///
    /// Returns false (and changes nothing) if no listed record has this id.
    pub fn begin_edit(&mut self, id: &ProjectId) -> bool {
        let Some(project) = self.find(id) else {
            debug!(id = %id, "Cannot edit unknown project");
            return false;
        };
        let values = EditValues::from_project(project);
        if let Some(previous) = self.edit.id().filter(|prev| *prev != id) {
            debug!(previous = %previous, id = %id, "Discarding open edit buffer");
        }
        self.edit = EditState::Editing {
            id: id.clone(),
            values,
        };
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::NotEditing;
    }

    /// Close the buffer for `id` on success, keep it open on failure
    pub fn finish_update(
        &mut self,
        id: &ProjectId,
        result: crate::Result<()>,
    ) -> Result<(), SyncFailure> {
        match result {
            Ok(()) => {
                if self.edit.is_editing(id) {
                    self.edit = EditState::NotEditing;
                }
                Ok(())
            }
            Err(e) => Err(self.record_failure(SyncFailure::Update, &e)),
        }
    }

    pub fn finish_delete(
        &mut self,
        id: &ProjectId,
        result: crate::Result<()>,
    ) -> Result<(), SyncFailure> {
        match result {
            Ok(()) => {
                if self.edit.is_editing(id) {
                    self.edit = EditState::NotEditing;
                }
                Ok(())
            }
            Err(e) => Err(self.record_failure(SyncFailure::Delete, &e)),
        }
    }

    fn record_failure(&mut self, failure: SyncFailure, cause: &Error) -> SyncFailure {
        warn!(
            category = failure.as_str(),
            code = cause.code(),
            error = %cause,
            "Record store operation failed"
        );
        self.error = Some(failure);
        failure
    }
}

/// Keeps `loading` honest for an in-flight listing
///
/// Dropping the guard without calling `finish` (the request future was
/// cancelled or unwound) abandons the ticket.
pub(crate) struct LoadGuard<'a> {
    state: &'a mut SyncState,
    ticket: LoadTicket,
    armed: bool,
}

impl<'a> LoadGuard<'a> {
    pub(crate) fn begin(state: &'a mut SyncState) -> Self {
        let ticket = state.begin_load();
        Self {
            state,
            ticket,
            armed: true,
        }
    }

    pub(crate) fn finish(mut self, result: crate::Result<Vec<Project>>) -> LoadApplied {
        self.armed = false;
        self.state.finish_load(self.ticket, result)
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.abandon_load(self.ticket);
        }
    }
}
