//! The task cache behind the board, Gantt and list views.
//!
//! Every mutation goes to the backend and is followed by a full reload, so
//! the cache always ends up as the server's view of the tasks.

use std::future::Future;

use super::kanban::{EditError, EditForm, Effect, ReorderIntent, reduce, validate_edit, validate_new};
use crate::api::error::ApiError;
use crate::model::task::{Task, TaskDraft, TaskUpdate};

/// Task endpoints the board needs
pub trait TaskBackend {
    fn fetch_tasks(
        &self,
        project: Option<u64>,
    ) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send;

    fn create_task(&self, draft: &TaskDraft)
    -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn update_task(
        &self,
        id: u64,
        update: &TaskUpdate,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn delete_task(&self, id: u64) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Error type for board operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Invalid(#[from] EditError),
    #[error("task not found: {0}")]
    NotFound(u64),
}

impl BoardError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BoardError::Api(e) if e.is_unauthorized())
    }

    /// Text for the status row or CLI
    pub fn user_message(&self) -> String {
        match self {
            BoardError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Fetched tasks for one project filter, plus the backend to mutate them
#[derive(Debug)]
pub struct TaskBoard<B> {
    backend: B,
    project: Option<u64>,
    tasks: Vec<Task>,
}

impl<B: TaskBackend> TaskBoard<B> {
    pub fn new(backend: B, project: Option<u64>) -> Self {
        TaskBoard {
            backend,
            project,
            tasks: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self) -> Option<u64> {
        self.project
    }

    /// Change the project filter. Takes effect on the next reload.
    pub fn set_project(&mut self, project: Option<u64>) {
        self.project = project;
    }

    /// Replace the cache with the server's tasks
    pub async fn reload(&mut self) -> Result<&[Task], BoardError> {
        self.tasks = self.backend.fetch_tasks(self.project).await?;
        tracing::debug!(count = self.tasks.len(), project = ?self.project, "tasks reloaded");
        Ok(&self.tasks)
    }

    /// Apply a card drop. Returns `false` if the drop changed nothing.
    ///
    /// The move is applied to the cache at once. If the update fails the
    /// error is returned after a reload, which puts the card back.
    pub async fn drop_card(&mut self, intent: &ReorderIntent) -> Result<bool, BoardError> {
        let transition = reduce(&self.tasks, intent);
        let Some(Effect::Update { id, update }) = transition.effect else {
            return Ok(false);
        };
        self.tasks = transition.tasks;
        tracing::info!(id, status = %update.status, "moving task");
        let result = self.backend.update_task(id, &update).await;
        if let Err(e) = &result {
            tracing::warn!(id, error = %e, "move failed, reverting");
        }
        let reloaded = self.reload().await;
        result?;
        reloaded?;
        Ok(true)
    }

    /// Validate and save an edit. Fields the form does not show (the due
    /// date) keep their current value.
    pub async fn save_edit(&mut self, id: u64, form: &EditForm) -> Result<Task, BoardError> {
        let mut update = validate_edit(form).inspect_err(|e| {
            tracing::debug!(id, error = %e, "edit rejected");
        })?;
        let current = self.task(id).ok_or(BoardError::NotFound(id))?;
        update.due_date = current.due_date;
        let saved = self.backend.update_task(id, &update).await?;
        self.reload().await?;
        Ok(saved)
    }

    /// Validate and create a task
    pub async fn create(&mut self, form: &EditForm) -> Result<Task, BoardError> {
        let draft = validate_new(form)?;
        let created = self.backend.create_task(&draft).await?;
        tracing::info!(id = created.id, "task created");
        self.reload().await?;
        Ok(created)
    }

    /// Delete a task once `confirm` agrees. Returns `false` if declined.
    pub async fn delete(
        &mut self,
        id: u64,
        confirm: impl FnOnce(&Task) -> bool,
    ) -> Result<bool, BoardError> {
        let task = self.task(id).ok_or(BoardError::NotFound(id))?;
        if !confirm(task) {
            return Ok(false);
        }
        self.backend.delete_task(id).await?;
        tracing::info!(id, "task deleted");
        self.reload().await?;
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::api::error::ApiOp;
    use crate::model::task::TaskStatus;

    /// In-memory backend recording every request
    #[derive(Debug, Default)]
    pub struct FakeBackend {
        pub tasks: Mutex<Vec<Task>>,
        pub requests: Mutex<Vec<String>>,
        pub fail_updates: bool,
    }

    impl FakeBackend {
        pub fn with(tasks: Vec<Task>) -> Self {
            FakeBackend {
                tasks: Mutex::new(tasks),
                ..Default::default()
            }
        }

        fn log(&self, line: String) {
            self.requests.lock().unwrap().push(line);
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl TaskBackend for FakeBackend {
        async fn fetch_tasks(&self, project: Option<u64>) -> Result<Vec<Task>, ApiError> {
            self.log(format!("GET tasks project={:?}", project));
            let tasks = self.tasks.lock().unwrap();
            Ok(tasks
                .iter()
                .filter(|t| project.is_none() || t.project == project)
                .cloned()
                .collect())
        }

        async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
            self.log(format!("POST tasks {}", draft.title));
            let mut tasks = self.tasks.lock().unwrap();
            let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            let task = Task {
                id,
                title: draft.title.clone(),
                description: draft.description.clone(),
                status: draft.status.unwrap_or_default(),
                assignee: draft.assignee,
                assignee_name: None,
                creator: Some(1),
                start_date: draft.start_date,
                end_date: draft.end_date,
                due_date: None,
                project: draft.project,
                project_name: None,
            };
            tasks.push(task.clone());
            Ok(task)
        }

        async fn update_task(&self, id: u64, update: &TaskUpdate) -> Result<Task, ApiError> {
            self.log(format!("PUT tasks/{} status={}", id, update.status));
            if self.fail_updates {
                return Err(ApiError::Rejected {
                    op: ApiOp::UpdateTask,
                    status: 500,
                    detail: None,
                });
            }
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ApiError::Rejected {
                    op: ApiOp::UpdateTask,
                    status: 404,
                    detail: Some("Not found.".into()),
                })?;
            task.title = update.title.clone();
            task.description = Some(update.description.clone()).filter(|d| !d.is_empty());
            task.status = update.status;
            task.assignee = update.assignee;
            task.start_date = update.start_date;
            task.end_date = update.end_date;
            task.due_date = update.due_date;
            task.project = update.project;
            Ok(task.clone())
        }

        async fn delete_task(&self, id: u64) -> Result<(), ApiError> {
            self.log(format!("DELETE tasks/{}", id));
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }
    }

    pub fn sample_task(id: u64, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: Some("details".into()),
            status,
            assignee: Some(2),
            assignee_name: Some("ben".into()),
            creator: Some(1),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 9),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            project: Some(2),
            project_name: Some("Website".into()),
        }
    }

    async fn loaded(tasks: Vec<Task>) -> TaskBoard<FakeBackend> {
        let mut board = TaskBoard::new(FakeBackend::with(tasks), None);
        board.reload().await.unwrap();
        board
    }

    #[tokio::test]
    async fn test_drop_updates_then_reloads() {
        let mut board = loaded(vec![
            sample_task(3, TaskStatus::Done),
            sample_task(7, TaskStatus::Review),
        ])
        .await;
        let intent = ReorderIntent {
            task_id: 7,
            source: (TaskStatus::Review, 0),
            dest: (TaskStatus::Done, 1),
        };
        assert!(board.drop_card(&intent).await.unwrap());

        assert_eq!(
            board.backend().requests(),
            vec![
                "GET tasks project=None",
                "PUT tasks/7 status=done",
                "GET tasks project=None",
            ]
        );
        let moved = board.task(7).unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(moved.title, "Task 7");
        assert_eq!(moved.assignee, Some(2));
        assert_eq!(moved.due_date, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[tokio::test]
    async fn test_drop_in_place_sends_nothing() {
        let mut board = loaded(vec![sample_task(7, TaskStatus::Review)]).await;
        let intent = ReorderIntent {
            task_id: 7,
            source: (TaskStatus::Review, 0),
            dest: (TaskStatus::Review, 0),
        };
        assert!(!board.drop_card(&intent).await.unwrap());
        assert_eq!(board.backend().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_drop_reverts() {
        let backend = FakeBackend {
            fail_updates: true,
            ..FakeBackend::with(vec![sample_task(7, TaskStatus::Review)])
        };
        let mut board = TaskBoard::new(backend, None);
        board.reload().await.unwrap();
        let intent = ReorderIntent {
            task_id: 7,
            source: (TaskStatus::Review, 0),
            dest: (TaskStatus::Done, 0),
        };
        let err = board.drop_card(&intent).await.unwrap_err();
        assert!(matches!(err, BoardError::Api(ApiError::Rejected { status: 500, .. })));
        assert_eq!(board.task(7).unwrap().status, TaskStatus::Review);
        assert_eq!(board.backend().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_edit_sends_nothing() {
        let mut board = loaded(vec![sample_task(7, TaskStatus::Review)]).await;
        let mut form = EditForm::from_task(board.task(7).unwrap());
        form.start_date = "2024-05-10".into();
        form.end_date = "2024-05-01".into();
        let err = board.save_edit(7, &form).await.unwrap_err();
        assert!(matches!(err, BoardError::Invalid(EditError::StartAfterEnd { .. })));

        form.title = "   ".into();
        form.start_date.clear();
        let err = board.save_edit(7, &form).await.unwrap_err();
        assert!(matches!(err, BoardError::Invalid(EditError::EmptyTitle)));
        assert_eq!(board.backend().requests(), vec!["GET tasks project=None"]);
    }

    #[tokio::test]
    async fn test_save_edit_keeps_due_date() {
        let mut board = loaded(vec![sample_task(7, TaskStatus::Review)]).await;
        let mut form = EditForm::from_task(board.task(7).unwrap());
        form.title = "Renamed".into();
        board.save_edit(7, &form).await.unwrap();
        let task = board.task(7).unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let mut board = loaded(vec![sample_task(1, TaskStatus::Done)]).await;
        let form = EditForm {
            title: "New card".into(),
            ..Default::default()
        };
        let created = board.create(&form).await.unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(board.tasks().len(), 2);

        assert!(!board.delete(2, |_| false).await.unwrap());
        assert_eq!(board.tasks().len(), 2);

        assert!(board.delete(2, |t| t.title == "New card").await.unwrap());
        assert_eq!(board.tasks().len(), 1);
        assert!(matches!(
            board.delete(99, |_| true).await,
            Err(BoardError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_project_filter_forwarded() {
        let mut other = sample_task(5, TaskStatus::Done);
        other.project = Some(9);
        let mut board = loaded(vec![sample_task(1, TaskStatus::Done), other]).await;
        board.set_project(Some(9));
        let tasks = board.reload().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 5);
    }
}
