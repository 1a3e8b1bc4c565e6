//! Kanban board: partitioning tasks into status columns, the drop reducer,
//! and edit-form validation.

use chrono::NaiveDate;

use crate::model::task::{DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS, Task, TaskDraft, TaskStatus, TaskUpdate};
use crate::model::user::UserDirectory;

/// Error type for edit-form validation. Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("title is required")]
    EmptyTitle,
    #[error("title is too long ({0} characters, at most {max})", max = TITLE_MAX_CHARS)]
    TitleTooLong(usize),
    #[error("description is too long ({0} characters, at most {max})", max = DESCRIPTION_MAX_CHARS)]
    DescriptionTooLong(usize),
    #[error("{field}: invalid date {value:?} (expected YYYY-MM-DD)")]
    BadDate { field: DateField, value: String },
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateField::Start => f.write_str("start date"),
            DateField::End => f.write_str("end date"),
        }
    }
}

/// Form field an error belongs to, for inline display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    Assignee,
    Project,
    Start,
    End,
}

impl EditError {
    pub fn field(&self) -> FormField {
        match self {
            EditError::EmptyTitle | EditError::TitleTooLong(_) => FormField::Title,
            EditError::DescriptionTooLong(_) => FormField::Description,
            EditError::BadDate {
                field: DateField::Start,
                ..
            }
            | EditError::StartAfterEnd { .. } => FormField::Start,
            EditError::BadDate {
                field: DateField::End,
                ..
            } => FormField::End,
        }
    }
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// Which assignee's cards are shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssigneeFilter {
    #[default]
    All,
    Named(String),
}

impl AssigneeFilter {
    pub fn from_option(name: Option<String>) -> Self {
        match name {
            Some(n) => AssigneeFilter::Named(n),
            None => AssigneeFilter::All,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            AssigneeFilter::All => None,
            AssigneeFilter::Named(n) => Some(n),
        }
    }

    pub fn accepts(&self, assignee: Option<&str>) -> bool {
        match self {
            AssigneeFilter::All => true,
            AssigneeFilter::Named(name) => assignee == Some(name.as_str()),
        }
    }

    /// Next filter when cycling: all, then each name in turn, then all again
    pub fn cycle(&self, names: &[String]) -> AssigneeFilter {
        let next = match self {
            AssigneeFilter::All => names.first(),
            AssigneeFilter::Named(current) => names
                .iter()
                .position(|n| n == current)
                .and_then(|i| names.get(i + 1)),
        };
        match next {
            Some(n) => AssigneeFilter::Named(n.clone()),
            None => AssigneeFilter::All,
        }
    }
}

/// Assignee name as displayed: the user directory first, then the name the
/// server computed
pub fn assignee_name<'a>(task: &'a Task, users: &'a UserDirectory) -> Option<&'a str> {
    task.assignee
        .and_then(|id| users.username(id))
        .or(task.assignee_name.as_deref())
        .filter(|name| !name.is_empty())
}

/// Distinct assignee names in first-seen order
pub fn assignees(tasks: &[Task], users: &UserDirectory) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for task in tasks {
        if let Some(name) = assignee_name(task, users)
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    names
}

/// Tasks split into the four status columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub columns: [Vec<Task>; 4],
}

impl Board {
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status.column()]
    }

    /// Column and index of a card
    pub fn position(&self, task_id: u64) -> Option<(TaskStatus, usize)> {
        TaskStatus::ALL.into_iter().find_map(|status| {
            self.column(status)
                .iter()
                .position(|t| t.id == task_id)
                .map(|i| (status, i))
        })
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split tasks into columns, keeping fetch order within each column
pub fn partition(tasks: &[Task], filter: &AssigneeFilter, users: &UserDirectory) -> Board {
    let mut board = Board::default();
    for task in tasks {
        if filter.accepts(assignee_name(task, users)) {
            board.columns[task.status.column()].push(task.clone());
        }
    }
    board
}

// ---------------------------------------------------------------------------
// Drop reducer
// ---------------------------------------------------------------------------

/// A card dropped at `dest` after being picked up at `source`.
/// Slots are `(column, index within the column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderIntent {
    pub task_id: u64,
    pub source: (TaskStatus, usize),
    pub dest: (TaskStatus, usize),
}

impl ReorderIntent {
    /// Move a card to the end of another column, as the keyboard and
    /// `tb mv` do. `None` if the card is not on the board.
    pub fn to_column(board: &Board, task_id: u64, dest: TaskStatus) -> Option<ReorderIntent> {
        let source = board.position(task_id)?;
        let index = if source.0 == dest {
            source.1
        } else {
            board.column(dest).len()
        };
        Some(ReorderIntent {
            task_id,
            source,
            dest: (dest, index),
        })
    }

    pub fn is_noop(&self) -> bool {
        self.source == self.dest
    }
}

/// Side effect requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Update { id: u64, update: TaskUpdate },
}

/// Reducer output: the optimistic task list and the request to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub tasks: Vec<Task>,
    pub effect: Option<Effect>,
}

/// Apply a drop. Dropping a card where it was picked up, or an unknown
/// card, changes nothing and requests nothing.
pub fn reduce(tasks: &[Task], intent: &ReorderIntent) -> Transition {
    let unchanged = || Transition {
        tasks: tasks.to_vec(),
        effect: None,
    };
    if intent.is_noop() {
        return unchanged();
    }
    let Some(current) = tasks.iter().find(|t| t.id == intent.task_id) else {
        return unchanged();
    };

    let status = intent.dest.0;
    let mut update = current.to_update();
    update.status = status;

    let tasks = tasks
        .iter()
        .map(|t| {
            if t.id == intent.task_id {
                Task {
                    status,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect();
    Transition {
        tasks,
        effect: Some(Effect::Update {
            id: intent.task_id,
            update,
        }),
    }
}

// ---------------------------------------------------------------------------
// Edit form
// ---------------------------------------------------------------------------

/// Raw form input, as typed. Dates are `YYYY-MM-DD` or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee: Option<u64>,
    pub project: Option<u64>,
    pub start_date: String,
    pub end_date: String,
}

impl EditForm {
    /// Prefill from an existing task
    pub fn from_task(task: &Task) -> Self {
        EditForm {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            assignee: task.assignee,
            project: task.project,
            start_date: format_date(task.start_date),
            end_date: format_date(task.end_date),
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(field: DateField, value: &str) -> Result<Option<NaiveDate>, EditError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| EditError::BadDate {
            field,
            value: value.to_string(),
        })
}

/// Check the form and build the request body
pub fn validate_edit(form: &EditForm) -> Result<TaskUpdate, EditError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(EditError::EmptyTitle);
    }
    let title_len = title.chars().count();
    if title_len > TITLE_MAX_CHARS {
        return Err(EditError::TitleTooLong(title_len));
    }
    let description_len = form.description.chars().count();
    if description_len > DESCRIPTION_MAX_CHARS {
        return Err(EditError::DescriptionTooLong(description_len));
    }
    let start_date = parse_date(DateField::Start, &form.start_date)?;
    let end_date = parse_date(DateField::End, &form.end_date)?;
    if let (Some(start), Some(end)) = (start_date, end_date)
        && start > end
    {
        return Err(EditError::StartAfterEnd { start, end });
    }

    let description = if form.description.trim().is_empty() {
        String::new()
    } else {
        form.description.clone()
    };
    Ok(TaskUpdate {
        title: title.to_string(),
        description,
        status: form.status,
        assignee: form.assignee,
        start_date,
        end_date,
        due_date: None,
        project: form.project,
    })
}

/// [`validate_edit`] for a new task
pub fn validate_new(form: &EditForm) -> Result<TaskDraft, EditError> {
    validate_edit(form).map(TaskDraft::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::User;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: u64, status: TaskStatus, assignee: Option<u64>) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: Some(format!("about {}", id)),
            status,
            assignee,
            assignee_name: None,
            creator: Some(1),
            start_date: Some(d("2024-01-02")),
            end_date: Some(d("2024-01-09")),
            due_date: None,
            project: Some(2),
            project_name: Some("Website".into()),
        }
    }

    fn users() -> UserDirectory {
        UserDirectory::new(vec![
            User {
                id: 1,
                username: "aiko".into(),
                email: None,
                bio: None,
                department: None,
            },
            User {
                id: 2,
                username: "ben".into(),
                email: None,
                bio: None,
                department: None,
            },
        ])
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, TaskStatus::Done, Some(1)),
            task(2, TaskStatus::NotStarted, Some(2)),
            task(3, TaskStatus::Review, None),
            task(4, TaskStatus::NotStarted, Some(1)),
            task(7, TaskStatus::Review, Some(2)),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_partition_is_stable_cover() {
        let tasks = sample();
        let board = partition(&tasks, &AssigneeFilter::All, &users());
        assert_eq!(ids(board.column(TaskStatus::NotStarted)), vec![2, 4]);
        assert_eq!(ids(board.column(TaskStatus::InProgress)), Vec::<u64>::new());
        assert_eq!(ids(board.column(TaskStatus::Review)), vec![3, 7]);
        assert_eq!(ids(board.column(TaskStatus::Done)), vec![1]);
        assert_eq!(board.len(), tasks.len());
        for t in &tasks {
            let (status, _) = board.position(t.id).unwrap();
            assert_eq!(status, t.status);
        }
    }

    #[test]
    fn test_partition_by_assignee() {
        let board = partition(&sample(), &AssigneeFilter::Named("aiko".into()), &users());
        assert_eq!(board.len(), 2);
        assert_eq!(ids(board.column(TaskStatus::NotStarted)), vec![4]);
        assert_eq!(ids(board.column(TaskStatus::Done)), vec![1]);
    }

    #[test]
    fn test_assignee_name_falls_back_to_server_name() {
        let mut t = task(9, TaskStatus::Done, Some(99));
        t.assignee_name = Some("carol".into());
        assert_eq!(assignee_name(&t, &users()), Some("carol"));
        t.assignee = Some(2);
        assert_eq!(assignee_name(&t, &users()), Some("ben"));
    }

    #[test]
    fn test_assignees_first_seen_and_cycle() {
        let names = assignees(&sample(), &users());
        assert_eq!(names, vec!["aiko".to_string(), "ben".to_string()]);

        let f = AssigneeFilter::All.cycle(&names);
        assert_eq!(f, AssigneeFilter::Named("aiko".into()));
        let f = f.cycle(&names);
        assert_eq!(f, AssigneeFilter::Named("ben".into()));
        assert_eq!(f.cycle(&names), AssigneeFilter::All);
        assert_eq!(AssigneeFilter::Named("gone".into()).cycle(&names), AssigneeFilter::All);
    }

    #[test]
    fn test_move_review_to_done() {
        let tasks = sample();
        let intent = ReorderIntent {
            task_id: 7,
            source: (TaskStatus::Review, 1),
            dest: (TaskStatus::Done, 0),
        };
        let transition = reduce(&tasks, &intent);

        let Some(Effect::Update { id, update }) = transition.effect else {
            panic!("expected an update");
        };
        assert_eq!(id, 7);
        let mut expected = tasks[4].to_update();
        expected.status = TaskStatus::Done;
        assert_eq!(update, expected);
        assert_eq!(update.title, "Task 7");
        assert_eq!(update.assignee, Some(2));
        assert_eq!(update.project, Some(2));

        let board = partition(&transition.tasks, &AssigneeFilter::All, &users());
        assert_eq!(ids(board.column(TaskStatus::Done)), vec![1, 7]);
        assert_eq!(ids(board.column(TaskStatus::Review)), vec![3]);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let tasks = sample();
        let intent = ReorderIntent {
            task_id: 3,
            source: (TaskStatus::Review, 0),
            dest: (TaskStatus::Review, 0),
        };
        let transition = reduce(&tasks, &intent);
        assert!(transition.effect.is_none());
        assert_eq!(transition.tasks, tasks);
    }

    #[test]
    fn test_reorder_within_column_still_updates() {
        let intent = ReorderIntent {
            task_id: 3,
            source: (TaskStatus::Review, 0),
            dest: (TaskStatus::Review, 1),
        };
        let transition = reduce(&sample(), &intent);
        assert!(matches!(
            transition.effect,
            Some(Effect::Update { id: 3, ref update }) if update.status == TaskStatus::Review
        ));
    }

    #[test]
    fn test_unknown_task_is_noop() {
        let intent = ReorderIntent {
            task_id: 404,
            source: (TaskStatus::Review, 0),
            dest: (TaskStatus::Done, 0),
        };
        assert!(reduce(&sample(), &intent).effect.is_none());
    }

    #[test]
    fn test_intent_to_column() {
        let board = partition(&sample(), &AssigneeFilter::All, &users());
        let intent = ReorderIntent::to_column(&board, 2, TaskStatus::Review).unwrap();
        assert_eq!(intent.source, (TaskStatus::NotStarted, 0));
        assert_eq!(intent.dest, (TaskStatus::Review, 2));
        let same = ReorderIntent::to_column(&board, 4, TaskStatus::NotStarted).unwrap();
        assert!(same.is_noop());
        assert!(ReorderIntent::to_column(&board, 404, TaskStatus::Done).is_none());
    }

    fn form() -> EditForm {
        EditForm {
            title: "  Launch  ".into(),
            description: String::new(),
            status: TaskStatus::InProgress,
            assignee: Some(1),
            project: None,
            start_date: "2024-05-01".into(),
            end_date: "2024-05-10".into(),
        }
    }

    #[test]
    fn test_validate_accepts_and_trims() {
        let update = validate_edit(&form()).unwrap();
        assert_eq!(update.title, "Launch");
        assert_eq!(update.description, "");
        assert_eq!(update.start_date, Some(d("2024-05-01")));
        assert_eq!(update.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_edit_of_task_without_description_sends_blank_string() {
        let json = r#"{"id": 5, "title": "Ship", "description": "", "status": "review"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        let mut edit = EditForm::from_task(&task);
        edit.title = "Ship it".into();

        let body = serde_json::to_value(validate_edit(&edit).unwrap()).unwrap();
        assert_eq!(body["title"], "Ship it");
        assert_eq!(body["description"], "");
        assert_eq!(body["status"], "review");
    }

    #[test]
    fn test_validate_rejects_start_after_end() {
        let f = EditForm {
            start_date: "2024-05-10".into(),
            end_date: "2024-05-01".into(),
            ..form()
        };
        let err = validate_edit(&f).unwrap_err();
        assert_eq!(
            err,
            EditError::StartAfterEnd {
                start: d("2024-05-10"),
                end: d("2024-05-01"),
            }
        );
        assert_eq!(err.field(), FormField::Start);
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let f = EditForm {
            title: "   ".into(),
            ..form()
        };
        assert_eq!(validate_edit(&f), Err(EditError::EmptyTitle));
    }

    #[test]
    fn test_validate_lengths() {
        let f = EditForm {
            title: "x".repeat(201),
            ..form()
        };
        assert_eq!(validate_edit(&f), Err(EditError::TitleTooLong(201)));
        let f = EditForm {
            title: "é".repeat(200),
            description: "d".repeat(1001),
            ..form()
        };
        assert_eq!(validate_edit(&f), Err(EditError::DescriptionTooLong(1001)));
    }

    #[test]
    fn test_validate_bad_date() {
        let f = EditForm {
            end_date: "2024-13-01".into(),
            ..form()
        };
        let err = validate_edit(&f).unwrap_err();
        assert_eq!(err.field(), FormField::End);
        assert_eq!(
            err.to_string(),
            "end date: invalid date \"2024-13-01\" (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_one_sided_dates_allowed() {
        let f = EditForm {
            start_date: String::new(),
            ..form()
        };
        let update = validate_edit(&f).unwrap();
        assert_eq!(update.start_date, None);
        assert_eq!(update.end_date, Some(d("2024-05-10")));
    }

    #[test]
    fn test_form_from_task_round_trips() {
        let t = task(5, TaskStatus::Review, Some(2));
        let update = validate_edit(&EditForm::from_task(&t)).unwrap();
        assert_eq!(update, t.to_update());
    }
}
