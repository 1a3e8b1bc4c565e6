use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum title length accepted by the backend
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum description length accepted by the backend
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Task status. Any status may move to any other; the board order is fixed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Column order on the board
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Wire key, as sent to the server
    pub fn key(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    /// Human-readable column heading
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Review => "Review",
            TaskStatus::Done => "Done",
        }
    }

    /// Position in [`TaskStatus::ALL`]
    pub fn column(self) -> usize {
        match self {
            TaskStatus::NotStarted => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Review => 2,
            TaskStatus::Done => 3,
        }
    }

    pub fn from_key(key: &str) -> Option<TaskStatus> {
        TaskStatus::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Neighbouring column, if any (used by the keyboard "drag")
    pub fn left(self) -> Option<TaskStatus> {
        self.column().checked_sub(1).map(|i| TaskStatus::ALL[i])
    }

    pub fn right(self) -> Option<TaskStatus> {
        TaskStatus::ALL.get(self.column() + 1).copied()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A task as returned by `GET /api/tasks/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Assigned user ID
    #[serde(default)]
    pub assignee: Option<u64>,
    /// Assignee username, computed by the server
    #[serde(default)]
    pub assignee_name: Option<String>,
    /// Creating user ID (read-only)
    #[serde(default)]
    pub creator: Option<u64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub project: Option<u64>,
    /// Project name, computed by the server
    #[serde(default)]
    pub project_name: Option<String>,
}

impl Task {
    /// Both dates present: the task can be placed on the Gantt chart
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    /// Full-replacement payload that keeps every field as it is now
    pub fn to_update(&self) -> TaskUpdate {
        TaskUpdate {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            status: self.status,
            assignee: self.assignee,
            start_date: self.start_date,
            end_date: self.end_date,
            due_date: self.due_date,
            project: self.project,
        }
    }
}

/// Body of `PUT /api/tasks/{id}/`. Every field is sent, so a status-only
/// change still carries the task's current title, dates and assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    /// Blank rather than null: the server rejects a null description
    pub description: String,
    pub status: TaskStatus,
    pub assignee: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub project: Option<u64>,
}

/// Body of `POST /api/tasks/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
}

impl From<TaskUpdate> for TaskDraft {
    fn from(u: TaskUpdate) -> Self {
        TaskDraft {
            title: u.title,
            description: Some(u.description).filter(|d| !d.is_empty()),
            status: Some(u.status),
            assignee: u.assignee,
            start_date: u.start_date,
            end_date: u.end_date,
            project: u.project,
        }
    }
}
