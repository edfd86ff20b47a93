//! Admin panel state machine
//!
//! Key presses and finished requests are the only inputs. Both may yield the
//! next request to issue; the event loop runs it on the runtime and feeds the
//! response back through [`App::apply`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use folio_core::project::{EditValues, ImageUpload, Project, ProjectDraft, ProjectId};
use folio_core::store::ProjectStore;
use folio_core::sync::{EditState, LoadApplied, LoadTicket, SyncState};
use tracing::{debug, info};

/// Inline editing fields, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    RepoUrl,
    LiveUrl,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        EditField::Title,
        EditField::Description,
        EditField::RepoUrl,
        EditField::LiveUrl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::RepoUrl => "Repo URL",
            Self::LiveUrl => "Live URL",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::RepoUrl,
            Self::RepoUrl => Self::LiveUrl,
            Self::LiveUrl => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::LiveUrl,
            Self::Description => Self::Title,
            Self::RepoUrl => Self::Description,
            Self::LiveUrl => Self::RepoUrl,
        }
    }

    fn value_mut(self, values: &mut EditValues) -> &mut String {
        match self {
            Self::Title => &mut values.title,
            Self::Description => &mut values.description,
            Self::RepoUrl => &mut values.repo_url,
            Self::LiveUrl => &mut values.live_url,
        }
    }

    pub fn value(self, values: &EditValues) -> &str {
        match self {
            Self::Title => &values.title,
            Self::Description => &values.description,
            Self::RepoUrl => &values.repo_url,
            Self::LiveUrl => &values.live_url,
        }
    }
}

/// Creation form fields, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Image,
}

impl DraftField {
    pub const ALL: [DraftField; 3] = [DraftField::Title, DraftField::Description, DraftField::Image];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Image => "Image file",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Image,
            Self::Image => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Image,
            Self::Description => Self::Title,
            Self::Image => Self::Description,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browsing,
    Editing { field: EditField },
    Creating { field: DraftField },
    ConfirmDelete { id: ProjectId, title: String },
}

/// Work for the background runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    List(LoadTicket),
    Create {
        draft: ProjectDraft,
        image_path: Option<String>,
    },
    Update {
        id: ProjectId,
        values: EditValues,
    },
    Delete(ProjectId),
}

/// A finished [`Request`]
#[derive(Debug)]
pub enum Response {
    Listed(LoadTicket, folio_core::Result<Vec<Project>>),
    Created(folio_core::Result<()>),
    Updated(ProjectId, folio_core::Result<()>),
    Deleted(ProjectId, folio_core::Result<()>),
}

#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    Quit,
    Send(Request),
}

/// Run one request against the store
pub async fn execute<S: ProjectStore + ?Sized>(store: &S, request: Request) -> Response {
    match request {
        Request::List(ticket) => Response::Listed(ticket, store.list().await),
        Request::Create {
            mut draft,
            image_path,
        } => {
            if let Some(path) = image_path {
                match ImageUpload::from_path(&path).await {
                    Ok(image) => draft.image = Some(image),
                    Err(e) => return Response::Created(Err(e)),
                }
            }
            Response::Created(store.create(&draft).await)
        }
        Request::Update { id, values } => {
            let result = store.update(&id, &values).await;
            Response::Updated(id, result)
        }
        Request::Delete(id) => {
            let result = store.delete(&id).await;
            Response::Deleted(id, result)
        }
    }
}

pub struct App {
    state: SyncState,
    mode: Mode,
    selected: usize,
    image_path: String,
    backend_url: String,
    asset_root: String,
}

impl App {
    pub fn new(backend_url: impl Into<String>, asset_root: impl Into<String>) -> Self {
        Self {
            state: SyncState::new(),
            mode: Mode::Browsing,
            selected: 0,
            image_path: String::new(),
            backend_url: backend_url.into(),
            asset_root: asset_root.into(),
        }
    }

    /// Initial listing, issued once on startup
    pub fn start(&mut self) -> Request {
        self.reload()
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.state.records().get(self.selected)
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn asset_root(&self) -> &str {
        &self.asset_root
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.mode.clone() {
            Mode::Browsing => self.browse_key(key.code),
            Mode::Editing { field } => self.edit_key(field, key.code),
            Mode::Creating { field } => self.create_key(field, key.code),
            Mode::ConfirmDelete { id, .. } => self.confirm_key(id, key.code),
        }
    }

    /// Fold a finished request into the state
    ///
    /// Returns the follow-up listing after a successful mutation.
    pub fn apply(&mut self, response: Response) -> Option<Request> {
        match response {
            Response::Listed(ticket, result) => {
                if self.state.finish_load(ticket, result) != LoadApplied::Stale {
                    self.clamp_selection();
                }
                None
            }
            Response::Created(result) => {
                self.state.finish_create(result).ok()?;
                self.image_path.clear();
                if matches!(self.mode, Mode::Creating { .. }) {
                    self.mode = Mode::Browsing;
                }
                info!("Project created");
                Some(self.reload())
            }
            Response::Updated(id, result) => {
                self.state.finish_update(&id, result).ok()?;
                self.leave_closed_edit();
                info!(id = %id, "Project updated");
                Some(self.reload())
            }
            Response::Deleted(id, result) => {
                self.state.finish_delete(&id, result).ok()?;
                self.leave_closed_edit();
                info!(id = %id, "Project deleted");
                Some(self.reload())
            }
        }
    }

    fn reload(&mut self) -> Request {
        Request::List(self.state.begin_load())
    }

    fn leave_closed_edit(&mut self) {
        if matches!(self.mode, Mode::Editing { .. }) && self.state.editing_id().is_none() {
            self.mode = Mode::Browsing;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.state.records().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn selected_id(&self) -> Option<ProjectId> {
        self.selected_project().and_then(|p| p.id.clone())
    }

    fn browse_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.state.records().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => return Action::Send(self.reload()),
            KeyCode::Char('n') => {
                self.mode = Mode::Creating {
                    field: DraftField::Title,
                };
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    if self.state.begin_edit(&id) {
                        self.mode = Mode::Editing {
                            field: EditField::Title,
                        };
                    }
                }
            }
            KeyCode::Char('d') => {
                let target = self
                    .selected_project()
                    .map(|p| (p.id.clone(), p.title.clone()));
                match target {
                    Some((Some(id), title)) => self.mode = Mode::ConfirmDelete { id, title },
                    Some((None, title)) => debug!(title = %title, "Record has no id, cannot delete"),
                    None => {}
                }
            }
            _ => {}
        }
        Action::None
    }

    fn edit_key(&mut self, field: EditField, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => {
                self.state.cancel_edit();
                self.mode = Mode::Browsing;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.mode = Mode::Editing {
                    field: field.next(),
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.mode = Mode::Editing {
                    field: field.prev(),
                };
            }
            KeyCode::Enter => {
                let (id, values) = match self.state.edit_state() {
                    EditState::Editing { id, values } => (id.clone(), values.clone()),
                    EditState::NotEditing => {
                        self.mode = Mode::Browsing;
                        return Action::None;
                    }
                };
                self.state.begin_mutation();
                return Action::Send(Request::Update { id, values });
            }
            KeyCode::Backspace => {
                if let Some(values) = self.state.edit_values_mut() {
                    field.value_mut(values).pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(values) = self.state.edit_values_mut() {
                    field.value_mut(values).push(c);
                }
            }
            _ => {}
        }
        Action::None
    }

    fn create_key(&mut self, field: DraftField, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc => self.mode = Mode::Browsing,
            KeyCode::Tab | KeyCode::Down => {
                self.mode = Mode::Creating {
                    field: field.next(),
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.mode = Mode::Creating {
                    field: field.prev(),
                };
            }
            KeyCode::Enter => {
                let image_path = Some(self.image_path.trim().to_string()).filter(|p| !p.is_empty());
                let draft = self.state.draft().clone();
                self.state.begin_mutation();
                return Action::Send(Request::Create { draft, image_path });
            }
            KeyCode::Backspace => {
                self.draft_input(field).pop();
            }
            KeyCode::Char(c) => self.draft_input(field).push(c),
            _ => {}
        }
        Action::None
    }

    fn draft_input(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.state.draft_mut().title,
            DraftField::Description => &mut self.state.draft_mut().description,
            DraftField::Image => &mut self.image_path,
        }
    }

    fn confirm_key(&mut self, id: ProjectId, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = Mode::Browsing;
                self.state.begin_mutation();
                Action::Send(Request::Delete(id))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Browsing;
                Action::None
            }
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use folio_core::Error;
    use folio_core::project::fallback_projects;
    use folio_core::sync::SyncFailure;
    use std::sync::Mutex;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn rows() -> Vec<Project> {
        vec![
            Project::new("First")
                .with_id(1)
                .with_description("one")
                .with_repo_url("https://github.com/x/first"),
            Project::new("Second").with_id(2),
        ]
    }

    /// App that has already applied one successful listing
    fn loaded_app() -> App {
        let mut app = App::new("http://localhost/portfinal-api", "http://localhost/");
        let Request::List(ticket) = app.start() else {
            panic!("start must issue a listing");
        };
        assert_eq!(app.apply(Response::Listed(ticket, Ok(rows()))), None);
        app
    }

    fn expect_list(action: Option<Request>) -> LoadTicket {
        match action {
            Some(Request::List(ticket)) => ticket,
            other => panic!("expected follow-up listing, got {other:?}"),
        }
    }

    #[test]
    fn test_start_sets_loading() {
        let mut app = App::new("http://a", "http://b");
        assert!(matches!(app.start(), Request::List(_)));
        assert!(app.state().is_loading());
        assert_eq!(app.mode(), &Mode::Browsing);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected(), 0);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected(), 1);
        assert_eq!(app.selected_project().unwrap().title, "Second");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = loaded_app();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(app.handle_key(release), Action::None);
    }

    #[test]
    fn test_reload_key_issues_listing() {
        let mut app = loaded_app();
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('r'))),
            Action::Send(Request::List(_))
        ));
        assert!(app.state().is_loading());
    }

    #[test]
    fn test_edit_cycle_and_save() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(
            app.mode(),
            &Mode::Editing {
                field: EditField::Title
            }
        );
        assert_eq!(app.state().editing_id(), Some(&ProjectId::Int(1)));

        type_text(&mut app, "!");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(
            app.mode(),
            &Mode::Editing {
                field: EditField::LiveUrl
            }
        );
        type_text(&mut app, "https://first.dev");

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Action::Send(Request::Update {
                id: ProjectId::Int(1),
                values: EditValues {
                    title: "First!".to_string(),
                    description: "one".to_string(),
                    repo_url: "https://github.com/x/first".to_string(),
                    live_url: "https://first.dev".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_edit_typing_q_does_not_quit() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.state().edit_values().unwrap().title, "Firstq");
    }

    #[test]
    fn test_edit_escape_discards_buffer() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('e')));
        type_text(&mut app, "xyz");
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.mode(), &Mode::Browsing);
        assert_eq!(app.state().editing_id(), None);
        assert_eq!(app.state().records()[0].title, "First");
    }

    #[test]
    fn test_update_failure_keeps_editing() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('e')));
        type_text(&mut app, "2");
        app.handle_key(key(KeyCode::Enter));

        let next = app.apply(Response::Updated(
            ProjectId::Int(1),
            Err(Error::InvalidResponse("db locked".to_string())),
        ));
        assert_eq!(next, None);
        assert!(matches!(app.mode(), Mode::Editing { .. }));
        assert_eq!(app.state().edit_values().unwrap().title, "First2");
        assert_eq!(app.state().error(), Some(SyncFailure::Update));
    }

    #[test]
    fn test_update_success_closes_and_reloads() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(key(KeyCode::Enter));

        let ticket = expect_list(app.apply(Response::Updated(ProjectId::Int(1), Ok(()))));
        assert_eq!(app.mode(), &Mode::Browsing);
        assert_eq!(app.state().editing_id(), None);
        assert!(app.state().is_loading());

        app.apply(Response::Listed(ticket, Ok(rows())));
        assert!(!app.state().is_loading());
    }

    #[test]
    fn test_create_escape_keeps_draft() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('n')));
        type_text(&mut app, "New");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "Desc");
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.mode(), &Mode::Browsing);
        assert_eq!(app.state().draft(), &ProjectDraft::new("New", "Desc"));

        app.handle_key(key(KeyCode::Char('n')));
        type_text(&mut app, "er");
        assert_eq!(app.state().draft().title, "Newer");
    }

    #[test]
    fn test_create_submit_with_image_path() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('n')));
        type_text(&mut app, "Site");
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(
            app.mode(),
            &Mode::Creating {
                field: DraftField::Image
            }
        );
        type_text(&mut app, " shots/site.png ");

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Action::Send(Request::Create {
                draft: ProjectDraft::new("Site", ""),
                image_path: Some("shots/site.png".to_string()),
            })
        );
    }

    #[test]
    fn test_create_success_resets_form() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('n')));
        type_text(&mut app, "Site");
        app.handle_key(key(KeyCode::Up));
        type_text(&mut app, "a.png");
        app.handle_key(key(KeyCode::Enter));

        expect_list(app.apply(Response::Created(Ok(()))));
        assert!(app.state().draft().is_empty());
        assert_eq!(app.image_path(), "");
        assert_eq!(app.mode(), &Mode::Browsing);
    }

    #[test]
    fn test_create_failure_keeps_form() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('n')));
        type_text(&mut app, "Site");
        app.handle_key(key(KeyCode::Enter));

        let next = app.apply(Response::Created(Err(Error::Status {
            endpoint: "/project-create.php".to_string(),
            status: 500,
        })));
        assert_eq!(next, None);
        assert_eq!(app.state().draft().title, "Site");
        assert!(matches!(app.mode(), Mode::Creating { .. }));
        assert_eq!(
            app.state().error_message(),
            Some("Create failed. Ensure PHP handles file uploads and CORS.")
        );
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            app.mode(),
            &Mode::ConfirmDelete {
                id: ProjectId::Int(2),
                title: "Second".to_string()
            }
        );

        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), Action::None);
        assert_eq!(app.mode(), &Mode::Browsing);

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            app.handle_key(key(KeyCode::Char('y'))),
            Action::Send(Request::Delete(ProjectId::Int(2)))
        );
        assert_eq!(app.mode(), &Mode::Browsing);
    }

    #[test]
    fn test_delete_record_without_id_is_ignored() {
        let mut app = App::new("http://a", "http://b");
        let Request::List(ticket) = app.start() else {
            panic!("start must issue a listing");
        };
        app.apply(Response::Listed(ticket, Ok(vec![Project::new("Anonymous")])));
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.mode(), &Mode::Browsing);
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.mode(), &Mode::Browsing);
    }

    #[test]
    fn test_stale_listing_is_dropped() {
        let mut app = loaded_app();
        let Action::Send(Request::List(first)) = app.handle_key(key(KeyCode::Char('r'))) else {
            panic!("expected listing");
        };
        let Action::Send(Request::List(second)) = app.handle_key(key(KeyCode::Char('r'))) else {
            panic!("expected listing");
        };

        app.apply(Response::Listed(second, Ok(vec![Project::new("Latest").with_id(7)])));
        app.apply(Response::Listed(first, Ok(rows())));
        assert_eq!(app.state().records().len(), 1);
        assert_eq!(app.state().records()[0].title, "Latest");
    }

    #[test]
    fn test_failed_listing_shows_fallback_and_clamps() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Down));
        let Action::Send(Request::List(ticket)) = app.handle_key(key(KeyCode::Char('r'))) else {
            panic!("expected listing");
        };
        app.apply(Response::Listed(
            ticket,
            Err(Error::InvalidResponse("html".to_string())),
        ));

        assert_eq!(app.state().records(), fallback_projects().as_slice());
        assert_eq!(
            app.state().error_message(),
            Some("Backend not reachable - showing current local projects.")
        );
        assert_eq!(app.selected(), 1);

        let Action::Send(Request::List(ticket)) = app.handle_key(key(KeyCode::Char('r'))) else {
            panic!("expected listing");
        };
        app.apply(Response::Listed(ticket, Ok(Vec::new())));
        assert_eq!(app.selected(), 0);
        assert_eq!(app.state().error(), None);
    }

    #[test]
    fn test_field_cycles_wrap() {
        for field in EditField::ALL {
            assert_eq!(field.next().prev(), field);
        }
        for field in DraftField::ALL {
            assert_eq!(field.prev().next(), field);
        }
    }

    /// Store backed by a vector, assigning ids on create
    struct MemoryStore {
        rows: Mutex<Vec<Project>>,
    }

    #[async_trait]
    impl ProjectStore for MemoryStore {
        async fn list(&self) -> folio_core::Result<Vec<Project>> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, draft: &ProjectDraft) -> folio_core::Result<()> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as i64 + 1;
            rows.push(
                Project::new(draft.title.clone())
                    .with_id(id)
                    .with_description(draft.description.clone()),
            );
            Ok(())
        }

        async fn update(&self, id: &ProjectId, values: &EditValues) -> folio_core::Result<()> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|p| p.id.as_ref() == Some(id))
                .ok_or_else(|| Error::InvalidResponse("missing".to_string()))?;
            row.title = values.title.clone();
            Ok(())
        }

        async fn delete(&self, id: &ProjectId) -> folio_core::Result<()> {
            self.rows.lock().unwrap().retain(|p| p.id.as_ref() != Some(id));
            Ok(())
        }
    }

    /// Run a request and any follow-ups it produces to completion
    async fn drain(app: &mut App, store: &MemoryStore, request: Request) {
        let mut pending = Some(request);
        while let Some(request) = pending.take() {
            pending = app.apply(execute(store, request).await);
        }
    }

    #[tokio::test]
    async fn test_round_trip_against_store() {
        let store = MemoryStore {
            rows: Mutex::new(Vec::new()),
        };
        let mut app = App::new("http://a", "http://b");
        let first = app.start();
        drain(&mut app, &store, first).await;
        assert!(app.state().records().is_empty());

        app.handle_key(key(KeyCode::Char('n')));
        type_text(&mut app, "X");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "Y");
        let Action::Send(create) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected create");
        };
        drain(&mut app, &store, create).await;
        assert_eq!(
            app.state().records(),
            &[Project::new("X").with_id(1).with_description("Y")]
        );
        assert!(app.state().draft().is_empty());
        assert!(!app.state().is_loading());

        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "Z");
        let Action::Send(update) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected update");
        };
        drain(&mut app, &store, update).await;
        assert_eq!(app.state().records()[0].title, "XZ");

        app.handle_key(key(KeyCode::Char('d')));
        let Action::Send(delete) = app.handle_key(key(KeyCode::Char('y'))) else {
            panic!("expected delete");
        };
        drain(&mut app, &store, delete).await;
        assert!(app.state().records().is_empty());
        assert_eq!(app.state().error(), None);
    }

    #[tokio::test]
    async fn test_missing_image_file_is_create_failure() {
        let store = MemoryStore {
            rows: Mutex::new(Vec::new()),
        };
        let response = execute(
            &store,
            Request::Create {
                draft: ProjectDraft::new("X", ""),
                image_path: Some("/nonexistent/folio/shot.png".to_string()),
            },
        )
        .await;

        assert!(matches!(response, Response::Created(Err(Error::Io(_)))));
        assert!(store.rows.lock().unwrap().is_empty());
    }
}
