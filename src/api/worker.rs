//! Background task that owns the network side of the TUI.
//!
//! The TUI sends [`ApiCommand`]s and drains [`ApiMessage`]s with `try_recv`
//! between frames, so rendering never waits on a request. Commands are run
//! one at a time, in order; a mutation and its reload finish before the next
//! command starts.

use tokio::sync::mpsc;

use super::client::{ApiClient, AuthedClient};
use super::error::{ApiError, ApiOp};
use crate::model::{Credentials, Project, Session, Task, User};
use crate::ops::board::{BoardError, TaskBoard};
use crate::ops::kanban::{EditForm, ReorderIntent};

/// Requests from the UI to the worker
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Exchange credentials for a session
    Login(Credentials),
    /// Start working with an existing session
    Resume(Session),
    /// Forget the session
    Logout,
    Reload,
    SetProject(Option<u64>),
    Drop(ReorderIntent),
    Save { id: u64, form: EditForm },
    Create(EditForm),
    /// Delete a task; the UI has already asked for confirmation
    Delete(u64),
    /// Fetch users, projects and the current user
    LoadDirectory,
    Shutdown,
}

impl ApiCommand {
    /// Commands the UI counts as loading until their `Settled` reply
    pub fn is_tracked(&self) -> bool {
        matches!(
            self,
            ApiCommand::Login(_)
                | ApiCommand::Resume(_)
                | ApiCommand::Reload
                | ApiCommand::SetProject(_)
                | ApiCommand::Drop(_)
                | ApiCommand::Save { .. }
                | ApiCommand::Create(_)
                | ApiCommand::Delete(_)
        )
    }
}

/// Results sent back to the UI
#[derive(Debug, Clone)]
pub enum ApiMessage {
    LoggedIn(Session),
    TasksLoaded(Vec<Task>),
    DirectoryLoaded {
        users: Vec<User>,
        projects: Vec<Project>,
        me: Option<User>,
    },
    /// A mutation finished; a `TasksLoaded` follows
    Saved(String),
    Failed { op: ApiOp, message: String },
    /// The server rejected the session; the UI should show the login form
    Unauthorized,
    /// Last reply to a tracked command
    Settled,
}

/// Worker state: the client, and the board once logged in
pub struct ApiWorker {
    api: ApiClient,
    board: Option<TaskBoard<AuthedClient>>,
    project: Option<u64>,
    tx: mpsc::Sender<ApiMessage>,
}

impl ApiWorker {
    pub fn new(api: ApiClient, project: Option<u64>, tx: mpsc::Sender<ApiMessage>) -> Self {
        ApiWorker {
            api,
            board: None,
            project,
            tx,
        }
    }

    /// Process commands until `Shutdown` or until the UI hangs up
    pub async fn run(mut self, mut rx: mpsc::Receiver<ApiCommand>) {
        while let Some(cmd) = rx.recv().await {
            if matches!(cmd, ApiCommand::Shutdown) {
                break;
            }
            if !self.handle(cmd).await {
                break;
            }
        }
        tracing::debug!("api worker stopped");
    }

    async fn send(&self, msg: ApiMessage) -> bool {
        self.tx.send(msg).await.is_ok()
    }

    /// Handle one command, then close a tracked one with `Settled`.
    /// Returns `false` once the UI is gone.
    pub async fn handle(&mut self, cmd: ApiCommand) -> bool {
        let tracked = cmd.is_tracked();
        if !self.dispatch(cmd).await {
            return false;
        }
        !tracked || self.send(ApiMessage::Settled).await
    }

    async fn dispatch(&mut self, cmd: ApiCommand) -> bool {
        match cmd {
            ApiCommand::Login(credentials) => match self.api.login(&credentials).await {
                Ok(session) => {
                    self.start(session.clone());
                    self.send(ApiMessage::LoggedIn(session)).await && self.load_all().await
                }
                Err(e) => self.api_failure(e).await,
            },
            ApiCommand::Resume(session) => {
                self.start(session);
                self.load_all().await
            }
            ApiCommand::Logout => {
                self.board = None;
                true
            }
            ApiCommand::Reload => self.reload().await,
            ApiCommand::SetProject(project) => {
                self.project = project;
                if let Some(board) = &mut self.board {
                    board.set_project(project);
                }
                self.reload().await
            }
            ApiCommand::Drop(intent) => {
                let Some(board) = &mut self.board else {
                    return self.send(ApiMessage::Unauthorized).await;
                };
                match board.drop_card(&intent).await {
                    // Answer even a no-op so the optimistic move is confirmed
                    Ok(_) => {
                        let tasks = board.tasks().to_vec();
                        self.send(ApiMessage::TasksLoaded(tasks)).await
                    }
                    Err(e) => {
                        // The board reloaded before returning the error
                        let tasks = board.tasks().to_vec();
                        self.send(ApiMessage::TasksLoaded(tasks)).await
                            && self.board_failure(ApiOp::UpdateTask, e).await
                    }
                }
            }
            ApiCommand::Save { id, form } => {
                let Some(board) = &mut self.board else {
                    return self.send(ApiMessage::Unauthorized).await;
                };
                match board.save_edit(id, &form).await {
                    Ok(task) => {
                        let tasks = board.tasks().to_vec();
                        self.send(ApiMessage::Saved(format!("saved #{}", task.id)))
                            .await
                            && self.send(ApiMessage::TasksLoaded(tasks)).await
                    }
                    Err(e) => self.board_failure(ApiOp::UpdateTask, e).await,
                }
            }
            ApiCommand::Create(form) => {
                let Some(board) = &mut self.board else {
                    return self.send(ApiMessage::Unauthorized).await;
                };
                match board.create(&form).await {
                    Ok(task) => {
                        let tasks = board.tasks().to_vec();
                        self.send(ApiMessage::Saved(format!("created #{}", task.id)))
                            .await
                            && self.send(ApiMessage::TasksLoaded(tasks)).await
                    }
                    Err(e) => self.board_failure(ApiOp::CreateTask, e).await,
                }
            }
            ApiCommand::Delete(id) => {
                let Some(board) = &mut self.board else {
                    return self.send(ApiMessage::Unauthorized).await;
                };
                match board.delete(id, |_| true).await {
                    Ok(_) => {
                        let tasks = board.tasks().to_vec();
                        self.send(ApiMessage::Saved(format!("deleted #{}", id)))
                            .await
                            && self.send(ApiMessage::TasksLoaded(tasks)).await
                    }
                    Err(e) => self.board_failure(ApiOp::DeleteTask, e).await,
                }
            }
            ApiCommand::LoadDirectory => self.load_directory().await,
            ApiCommand::Shutdown => false,
        }
    }

    fn start(&mut self, session: Session) {
        self.board = Some(TaskBoard::new(self.api.authed(session), self.project));
    }

    async fn load_all(&mut self) -> bool {
        self.load_directory().await && self.reload().await
    }

    async fn reload(&mut self) -> bool {
        let Some(board) = &mut self.board else {
            return self.send(ApiMessage::Unauthorized).await;
        };
        let result = board.reload().await.map(<[Task]>::to_vec);
        match result {
            Ok(tasks) => self.send(ApiMessage::TasksLoaded(tasks)).await,
            Err(e) => self.board_failure(ApiOp::FetchTasks, e).await,
        }
    }

    async fn load_directory(&mut self) -> bool {
        let Some(board) = &self.board else {
            return self.send(ApiMessage::Unauthorized).await;
        };
        let client = board.backend().clone();
        let (api, session) = (client.api(), client.session());
        let users = match api.fetch_users(session).await {
            Ok(users) => users,
            Err(e) => return self.api_failure(e).await,
        };
        // Projects and the current user are optional decorations
        let projects = api.fetch_projects(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load projects");
            Vec::new()
        });
        let me = api.fetch_me(session).await.ok();
        self.send(ApiMessage::DirectoryLoaded {
            users,
            projects,
            me,
        })
        .await
    }

    async fn board_failure(&mut self, op: ApiOp, e: BoardError) -> bool {
        match e {
            BoardError::Api(e) => self.api_failure(e).await,
            other => {
                self.send(ApiMessage::Failed {
                    op,
                    message: other.user_message(),
                })
                .await
            }
        }
    }

    async fn api_failure(&mut self, e: ApiError) -> bool {
        if e.is_unauthorized() {
            tracing::info!("session rejected, returning to login");
            self.board = None;
            return self.send(ApiMessage::Unauthorized).await;
        }
        tracing::warn!(error = %e, "request failed");
        self.send(ApiMessage::Failed {
            op: e.op(),
            message: e.user_message(),
        })
        .await
    }
}

/// Spawn the worker on the current runtime
pub fn spawn(
    api: ApiClient,
    project: Option<u64>,
) -> (
    mpsc::Sender<ApiCommand>,
    mpsc::Receiver<ApiMessage>,
    tokio::task::JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(32);
    let (msg_tx, msg_rx) = mpsc::channel::<ApiMessage>(32);
    let worker = ApiWorker::new(api, project, msg_tx);
    let handle = tokio::spawn(worker.run(cmd_rx));
    (cmd_tx, msg_rx, handle)
}
