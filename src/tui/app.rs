use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;
use tokio::sync::mpsc;

use crate::api::ApiOp;
use crate::api::client::ApiClient;
use crate::api::worker::{self, ApiCommand, ApiMessage};
use crate::io::session::SessionStore;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::{config_dir, config_io, logging};
use crate::model::{Project, Task, TaskStatus, UiConfig, User, UserDirectory};
use crate::ops::filter::{TaskFilter, compile_search};
use crate::ops::gantt::{DateSpan, GanttLayout, local_today};
use crate::ops::kanban::{AssigneeFilter, Board, EditError, EditForm, FormField, partition};

use super::input;
use super::render;
use super::text_field::TextField;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Board,
    Gantt,
    List,
}

impl View {
    pub const ALL: [View; 3] = [View::Board, View::Gantt, View::List];

    pub fn next(self) -> View {
        match self {
            View::Board => View::Gantt,
            View::Gantt => View::List,
            View::List => View::Board,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Board => "Board",
            View::Gantt => "Gantt",
            View::List => "List",
        }
    }

    /// Name stored in state.json
    pub fn key(self) -> &'static str {
        match self {
            View::Board => "board",
            View::Gantt => "gantt",
            View::List => "list",
        }
    }

    pub fn from_key(key: &str) -> Option<View> {
        View::ALL.into_iter().find(|v| v.key() == key)
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
}

/// Login form shown whenever there is no usable session
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: TextField,
    pub password: TextField,
    pub focus_password: bool,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn with_error(message: impl Into<String>) -> Self {
        LoginForm {
            error: Some(message.into()),
            ..LoginForm::default()
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        if self.focus_password {
            &mut self.password
        } else {
            &mut self.username
        }
    }
}

/// What the task form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(u64),
}

/// Create/edit form state. Text fields are raw input; choice fields cycle.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub target: FormTarget,
    pub title: TextField,
    pub description: TextField,
    pub status: TaskStatus,
    pub assignee: Option<u64>,
    pub project: Option<u64>,
    pub start: TextField,
    pub end: TextField,
    pub focus: FormField,
    /// Local validation failure, shown next to its field
    pub error: Option<EditError>,
    /// Rejection from the server, shown under the form
    pub server_error: Option<String>,
    pub submitting: bool,
}

impl TaskForm {
    pub const FIELDS: [FormField; 7] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Assignee,
        FormField::Project,
        FormField::Start,
        FormField::End,
    ];

    fn from_edit_form(target: FormTarget, form: EditForm) -> Self {
        TaskForm {
            target,
            title: TextField::new(form.title),
            description: TextField::new(form.description),
            status: form.status,
            assignee: form.assignee,
            project: form.project,
            start: TextField::new(form.start_date),
            end: TextField::new(form.end_date),
            focus: FormField::Title,
            error: None,
            server_error: None,
            submitting: false,
        }
    }

    /// Empty form for a new task, in `status` and the filtered project
    pub fn create(status: TaskStatus, project: Option<u64>) -> Self {
        let form = EditForm {
            status,
            project,
            ..EditForm::default()
        };
        TaskForm::from_edit_form(FormTarget::Create, form)
    }

    pub fn edit(task: &Task) -> Self {
        TaskForm::from_edit_form(FormTarget::Edit(task.id), EditForm::from_task(task))
    }

    pub fn to_edit_form(&self) -> EditForm {
        EditForm {
            title: self.title.text.clone(),
            description: self.description.text.clone(),
            status: self.status,
            assignee: self.assignee,
            project: self.project,
            start_date: self.start.text.clone(),
            end_date: self.end.text.clone(),
        }
    }

    pub fn focus_next(&mut self, forward: bool) {
        let i = Self::FIELDS
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        let n = Self::FIELDS.len();
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        self.focus = Self::FIELDS[next];
    }

    /// The focused field if it takes typed text
    pub fn text_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Start => Some(&mut self.start),
            FormField::End => Some(&mut self.end),
            FormField::Status | FormField::Assignee | FormField::Project => None,
        }
    }

    /// Step the focused choice field through its options
    pub fn cycle_choice(&mut self, forward: bool, users: &[User], projects: &[Project]) {
        match self.focus {
            FormField::Status => {
                let i = self.status.column();
                let next = if forward { (i + 1) % 4 } else { (i + 3) % 4 };
                self.status = TaskStatus::ALL[next];
            }
            FormField::Assignee => {
                let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
                self.assignee = cycle_option(self.assignee, &ids, forward);
            }
            FormField::Project => {
                let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
                self.project = cycle_option(self.project, &ids, forward);
            }
            _ => {}
        }
    }
}

/// Step through `[None, ids...]`, wrapping at both ends
fn cycle_option(current: Option<u64>, ids: &[u64], forward: bool) -> Option<u64> {
    let options: Vec<Option<u64>> = std::iter::once(None)
        .chain(ids.iter().copied().map(Some))
        .collect();
    let n = options.len();
    let i = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
    options[next]
}

/// Modal overlays, drawn over the current view and taking all input
#[derive(Debug, Clone)]
pub enum Overlay {
    Login(LoginForm),
    Detail(u64),
    Form(Box<TaskForm>),
    Confirm { id: u64, title: String },
    Help,
}

/// One-line message in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Board selection: column index into `TaskStatus::ALL` and card row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCursor {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GanttState {
    /// Selected task row (across all groups)
    pub row: usize,
    /// First visible body row
    pub scroll_y: usize,
    /// Horizontal scroll of the day grid, in cells
    pub scroll_x: u32,
    /// Date range the grid last scrolled to today for; a new range scrolls again
    pub scrolled_for: Option<DateSpan>,
}

/// Main application state
pub struct App {
    pub view: View,
    pub mode: Mode,
    pub overlay: Option<Overlay>,
    pub should_quit: bool,
    pub theme: Theme,
    pub day_width: u16,
    pub name_width: u16,
    pub today: NaiveDate,

    // Caches, owned here so late replies never land on a dead view
    pub tasks: Vec<Task>,
    /// False until the first task list arrives (loading vs empty)
    pub loaded: bool,
    pub users: UserDirectory,
    pub projects: Vec<Project>,
    pub me: Option<User>,

    pub assignee: AssigneeFilter,
    /// Server-side project filter
    pub project: Option<u64>,
    pub only_mine: bool,
    pub search_input: TextField,
    pub last_search: Option<String>,
    pub sidebar_open: bool,

    /// Commands sent and not yet answered
    pub pending: usize,
    pub status: Option<StatusMessage>,
    /// Commands waiting to go to the worker
    pub outbox: Vec<ApiCommand>,

    pub board_cursor: BoardCursor,
    /// First visible card row per column
    pub board_scroll: [usize; 4],
    pub gantt: GanttState,
    pub list_cursor: usize,
    pub list_scroll: usize,
}

impl App {
    pub fn new(ui: &UiConfig) -> Self {
        App {
            view: View::Board,
            mode: Mode::Navigate,
            overlay: None,
            should_quit: false,
            theme: Theme::from_config(ui),
            day_width: ui.day_width.max(1),
            name_width: ui.name_width.max(8),
            today: local_today(),
            tasks: Vec::new(),
            loaded: false,
            users: UserDirectory::default(),
            projects: Vec::new(),
            me: None,
            assignee: AssigneeFilter::All,
            project: None,
            only_mine: false,
            search_input: TextField::default(),
            last_search: None,
            sidebar_open: true,
            pending: 0,
            status: None,
            outbox: Vec::new(),
            board_cursor: BoardCursor::default(),
            board_scroll: [0; 4],
            gantt: GanttState::default(),
            list_cursor: 0,
            list_scroll: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Worker traffic
    // -----------------------------------------------------------------------

    /// Queue a command for the worker, counting it toward the loading state
    pub fn send(&mut self, cmd: ApiCommand) {
        if cmd.is_tracked() {
            self.pending += 1;
        }
        self.outbox.push(cmd);
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn handle_message(&mut self, msg: ApiMessage) {
        match msg {
            ApiMessage::LoggedIn(_) => {
                if matches!(self.overlay, Some(Overlay::Login(_))) {
                    self.overlay = None;
                }
                self.set_status("logged in");
            }
            ApiMessage::TasksLoaded(tasks) => {
                tracing::debug!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.loaded = true;
                self.clamp_cursors();
            }
            ApiMessage::DirectoryLoaded {
                users,
                projects,
                me,
            } => {
                self.users = UserDirectory::new(users);
                self.projects = projects;
                self.me = me;
            }
            ApiMessage::Saved(text) => {
                if matches!(&self.overlay, Some(Overlay::Form(f)) if f.submitting) {
                    self.overlay = None;
                }
                self.set_status(text);
            }
            ApiMessage::Failed { op, message } => {
                match &mut self.overlay {
                    Some(Overlay::Login(form)) if op == ApiOp::Login => {
                        form.error = Some(message);
                        form.submitting = false;
                    }
                    Some(Overlay::Form(form)) if form.submitting => {
                        form.server_error = Some(message);
                        form.submitting = false;
                    }
                    _ => self.set_error(format!("{} failed: {}", op, message)),
                }
            }
            ApiMessage::Unauthorized => {
                self.pending = 0;
                self.overlay = Some(Overlay::Login(LoginForm::with_error(
                    "session expired or missing; log in again",
                )));
            }
            ApiMessage::Settled => self.pending = self.pending.saturating_sub(1),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    // -----------------------------------------------------------------------
    // Derived view data
    // -----------------------------------------------------------------------

    /// Regex for the list view: the pattern being typed, else the last one.
    /// An invalid pattern is matched literally.
    pub fn search_re(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Search if !self.search_input.is_empty() => self.search_input.as_str(),
            Mode::Navigate => self.last_search.as_deref()?,
            _ => return None,
        };
        compile_search(pattern)
            .or_else(|_| compile_search(&regex::escape(pattern)))
            .ok()
    }

    fn filter(&self, with_search: bool) -> TaskFilter {
        TaskFilter {
            assignee: self.assignee.clone(),
            only_mine: if self.only_mine {
                self.me.as_ref().map(|u| u.id)
            } else {
                None
            },
            search: if with_search { self.search_re() } else { None },
        }
    }

    /// Tasks passing the assignee and only-mine filters
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.filter(false).apply(&self.tasks, &self.users)
    }

    /// Rows of the list view: [`App::visible_tasks`] narrowed by the search
    pub fn list_tasks(&self) -> Vec<Task> {
        self.filter(true).apply(&self.tasks, &self.users)
    }

    pub fn board(&self) -> Board {
        partition(&self.visible_tasks(), &AssigneeFilter::All, &self.users)
    }

    pub fn gantt_layout(&self) -> Option<GanttLayout> {
        GanttLayout::build(&self.visible_tasks())
    }

    /// The task under the cursor in the current view
    pub fn selected_task(&self) -> Option<Task> {
        match self.view {
            View::Board => {
                let status = TaskStatus::ALL[self.board_cursor.column];
                self.board().column(status).get(self.board_cursor.row).cloned()
            }
            View::Gantt => self
                .gantt_layout()?
                .groups
                .into_iter()
                .flat_map(|g| g.rows)
                .nth(self.gantt.row)
                .map(|r| r.task),
            View::List => self.list_tasks().into_iter().nth(self.list_cursor),
        }
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Keep every cursor inside its (possibly shrunken) list
    pub fn clamp_cursors(&mut self) {
        let board = self.board();
        let len = board.column(TaskStatus::ALL[self.board_cursor.column]).len();
        self.board_cursor.row = self.board_cursor.row.min(len.saturating_sub(1));

        let rows = self.gantt_layout().map_or(0, |l| l.row_count());
        self.gantt.row = self.gantt.row.min(rows.saturating_sub(1));

        let rows = self.list_tasks().len();
        self.list_cursor = self.list_cursor.min(rows.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Restore UI preferences from state.json
pub fn restore_ui_state(app: &mut App, dir: &Path) {
    let Some(state) = read_ui_state(dir) else {
        return;
    };
    if let Some(view) = View::from_key(&state.view) {
        app.view = view;
    }
    app.sidebar_open = state.sidebar_open;
    app.assignee = AssigneeFilter::from_option(state.assignee_filter);
    app.project = state.project_filter;
    app.last_search = state.last_search;
}

/// Save UI preferences to state.json
pub fn save_ui_state(app: &App, dir: &Path) {
    let state = UiState {
        sidebar_open: app.sidebar_open,
        view: app.view.key().to_string(),
        assignee_filter: app.assignee.name().map(str::to_string),
        project_filter: app.project,
        last_search: app.last_search.clone(),
    };
    if let Err(e) = write_ui_state(dir, &state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the TUI application
pub async fn run(api_url: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::read_config()?;
    logging::init_tui(&logging::log_path(), config.log.level.as_deref());
    let base_url = config_io::base_url_from_env(api_url, &config);
    tracing::info!(%base_url, "tui start");

    let api = ApiClient::new(base_url)?;
    let store = SessionStore::default_location();
    let state_dir = config_dir();

    let mut app = App::new(&config.ui);
    restore_ui_state(&mut app, &state_dir);
    let (cmd_tx, mut msg_rx, worker_handle) = worker::spawn(api, app.project);

    // Route guard: no session, no board
    match store.load() {
        Ok(Some(session)) => app.send(ApiCommand::Resume(session)),
        Ok(None) => app.overlay = Some(Overlay::Login(LoginForm::default())),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring stored session");
            app.overlay = Some(Overlay::Login(LoginForm::with_error(e.to_string())));
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &store,
        &cmd_tx,
        &mut msg_rx,
        &state_dir,
    )
    .await;

    save_ui_state(&app, &state_dir);
    let _ = cmd_tx.send(ApiCommand::Shutdown).await;
    worker_handle.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &SessionStore,
    cmd_tx: &mpsc::Sender<ApiCommand>,
    msg_rx: &mut mpsc::Receiver<ApiMessage>,
    state_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            match &msg {
                ApiMessage::LoggedIn(session) => {
                    if let Err(e) = store.save(session) {
                        app.set_error(e.to_string());
                    }
                }
                ApiMessage::Unauthorized => {
                    let _ = store.clear();
                }
                _ => {}
            }
            app.handle_message(msg);
        }

        for cmd in std::mem::take(&mut app.outbox) {
            if matches!(cmd, ApiCommand::Logout) {
                store.clear()?;
            }
            cmd_tx
                .send(cmd)
                .await
                .map_err(|_| "api worker stopped unexpectedly")?;
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app, state_dir);
                        save_counter = 0;
                    }
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::board::tests::sample_task;
    use tempfile::TempDir;

    fn app_with(tasks: Vec<Task>) -> App {
        let mut app = App::new(&UiConfig::default());
        app.handle_message(ApiMessage::TasksLoaded(tasks));
        app
    }

    #[test]
    fn test_pending_counts_replies() {
        let mut app = App::new(&UiConfig::default());
        app.send(ApiCommand::Reload);
        app.send(ApiCommand::LoadDirectory);
        assert_eq!(app.pending, 1);
        assert_eq!(app.outbox.len(), 2);
        assert!(app.is_loading());
        app.handle_message(ApiMessage::TasksLoaded(vec![]));
        assert!(app.loaded);
        app.handle_message(ApiMessage::Settled);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_each_command_settles_once() {
        let mut app = app_with(vec![sample_task(1, TaskStatus::Review)]);
        app.send(ApiCommand::Reload);
        app.send(ApiCommand::Save {
            id: 1,
            form: EditForm::default(),
        });
        assert_eq!(app.pending, 2);

        // The reload answers first
        app.handle_message(ApiMessage::TasksLoaded(vec![sample_task(1, TaskStatus::Review)]));
        app.handle_message(ApiMessage::Settled);
        // A failed mutation reloads and reports; the second command is still open
        app.handle_message(ApiMessage::TasksLoaded(vec![sample_task(1, TaskStatus::Review)]));
        app.handle_message(ApiMessage::Failed {
            op: ApiOp::UpdateTask,
            message: "500".into(),
        });
        assert!(app.is_loading());
        app.handle_message(ApiMessage::Settled);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_unauthorized_shows_login() {
        let mut app = app_with(vec![sample_task(1, TaskStatus::Review)]);
        app.send(ApiCommand::Reload);
        app.handle_message(ApiMessage::Unauthorized);
        assert!(matches!(app.overlay, Some(Overlay::Login(_))));
        assert_eq!(app.pending, 0);
    }

    #[test]
    fn test_login_failure_stays_in_form() {
        let mut app = App::new(&UiConfig::default());
        let mut form = LoginForm::default();
        form.submitting = true;
        app.overlay = Some(Overlay::Login(form));
        app.handle_message(ApiMessage::Failed {
            op: ApiOp::Login,
            message: "No active account found with the given credentials".into(),
        });
        let Some(Overlay::Login(form)) = &app.overlay else {
            panic!("login form closed");
        };
        assert!(!form.submitting);
        assert!(form.error.as_deref().unwrap().starts_with("No active account"));

        app.handle_message(ApiMessage::LoggedIn(crate::model::Session::new("a", "r")));
        assert!(app.overlay.is_none());
    }

    #[test]
    fn test_server_rejection_keeps_form_open() {
        let mut app = app_with(vec![sample_task(1, TaskStatus::Review)]);
        let mut form = TaskForm::edit(&app.tasks[0]);
        form.submitting = true;
        app.overlay = Some(Overlay::Form(Box::new(form)));
        app.handle_message(ApiMessage::Failed {
            op: ApiOp::UpdateTask,
            message: "title: too long".into(),
        });
        let Some(Overlay::Form(form)) = &app.overlay else {
            panic!("form closed");
        };
        assert_eq!(form.server_error.as_deref(), Some("title: too long"));

        if let Some(Overlay::Form(form)) = &mut app.overlay {
            form.submitting = true;
        }
        app.handle_message(ApiMessage::Saved("saved #1".into()));
        assert!(app.overlay.is_none());
        assert_eq!(app.status.as_ref().unwrap().text, "saved #1");
    }

    #[test]
    fn test_failure_outside_forms_goes_to_status() {
        let mut app = App::new(&UiConfig::default());
        app.handle_message(ApiMessage::Failed {
            op: ApiOp::FetchTasks,
            message: "connection refused".into(),
        });
        let status = app.status.unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "fetch tasks failed: connection refused");
    }

    #[test]
    fn test_selected_task_per_view() {
        let mut app = app_with(vec![
            sample_task(1, TaskStatus::Review),
            sample_task(2, TaskStatus::Done),
            sample_task(3, TaskStatus::Done),
        ]);
        app.board_cursor = BoardCursor { column: 3, row: 1 };
        assert_eq!(app.selected_task().unwrap().id, 3);

        app.view = View::Gantt;
        app.gantt.row = 0;
        assert_eq!(app.selected_task().unwrap().id, 1);

        app.view = View::List;
        app.last_search = Some("^2$".into());
        assert_eq!(app.selected_task().unwrap().id, 2);
    }

    #[test]
    fn test_clamp_after_reload_shrinks() {
        let mut app = app_with(vec![
            sample_task(1, TaskStatus::Done),
            sample_task(2, TaskStatus::Done),
        ]);
        app.board_cursor = BoardCursor { column: 3, row: 1 };
        app.list_cursor = 1;
        app.handle_message(ApiMessage::TasksLoaded(vec![sample_task(1, TaskStatus::Done)]));
        assert_eq!(app.board_cursor.row, 0);
        assert_eq!(app.list_cursor, 0);
    }

    #[test]
    fn test_only_mine_needs_current_user() {
        let mut mine = sample_task(1, TaskStatus::Done);
        mine.assignee = Some(5);
        let mut app = app_with(vec![mine, sample_task(2, TaskStatus::Done)]);
        app.only_mine = true;
        app.me = Some(User {
            id: 5,
            username: "ana".into(),
            email: None,
            bio: None,
            department: None,
        });
        let ids: Vec<u64> = app.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_form_cycles_choices() {
        let mut form = TaskForm::create(TaskStatus::Done, None);
        form.focus = FormField::Status;
        form.cycle_choice(true, &[], &[]);
        assert_eq!(form.status, TaskStatus::NotStarted);
        form.cycle_choice(false, &[], &[]);
        assert_eq!(form.status, TaskStatus::Done);

        let projects = vec![
            Project { id: 4, name: "Web".into(), description: None },
            Project { id: 9, name: "Ops".into(), description: None },
        ];
        form.focus = FormField::Project;
        form.cycle_choice(true, &[], &projects);
        assert_eq!(form.project, Some(4));
        form.cycle_choice(false, &[], &projects);
        form.cycle_choice(false, &[], &projects);
        assert_eq!(form.project, Some(9));

        form.focus = FormField::End;
        form.focus_next(true);
        assert_eq!(form.focus, FormField::Title);
        form.focus_next(false);
        assert_eq!(form.focus, FormField::End);
    }

    #[test]
    fn test_ui_state_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&UiConfig::default());
        app.view = View::Gantt;
        app.sidebar_open = false;
        app.assignee = AssigneeFilter::Named("ben".into());
        app.project = Some(2);
        app.last_search = Some("deploy".into());
        save_ui_state(&app, dir.path());

        let mut restored = App::new(&UiConfig::default());
        restore_ui_state(&mut restored, dir.path());
        assert_eq!(restored.view, View::Gantt);
        assert!(!restored.sidebar_open);
        assert_eq!(restored.assignee, AssigneeFilter::Named("ben".into()));
        assert_eq!(restored.project, Some(2));
        assert_eq!(restored.last_search.as_deref(), Some("deploy"));
    }
}
