use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::api::worker::ApiMessage;
use crate::model::{Project, Task, TaskStatus, UiConfig, User};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A task with the given dates (`""` for none) in a named project
pub fn task(id: u64, title: &str, status: TaskStatus, dates: (&str, &str), project: &str) -> Task {
    let parse = |s: &str| (!s.is_empty()).then(|| date(s));
    Task {
        id,
        title: title.to_string(),
        description: None,
        status,
        assignee: None,
        assignee_name: None,
        creator: None,
        start_date: parse(dates.0),
        end_date: parse(dates.1),
        due_date: None,
        project: None,
        project_name: (!project.is_empty()).then(|| project.to_string()),
    }
}

pub fn user(id: u64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: None,
        bio: None,
        department: None,
    }
}

/// An App with the given tasks loaded, the sidebar closed, and `today`
/// pinned to 2024-01-31
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let mut app = App::new(&UiConfig::default());
    app.sidebar_open = false;
    app.today = date("2024-01-31");
    app.handle_message(ApiMessage::DirectoryLoaded {
        users: vec![user(1, "ana"), user(2, "ben")],
        projects: vec![Project {
            id: 7,
            name: "Website".into(),
            description: None,
        }],
        me: Some(user(1, "ana")),
    });
    app.handle_message(ApiMessage::TasksLoaded(tasks));
    app
}

/// Three tasks spread over the board, all dated around the turn of the month
pub fn sample_tasks() -> Vec<Task> {
    let mut ship = task(1, "Ship login", TaskStatus::InProgress, ("2024-01-29", "2024-02-02"), "Website");
    ship.assignee = Some(1);
    let mut docs = task(2, "Write docs", TaskStatus::NotStarted, ("2024-02-01", "2024-02-03"), "");
    docs.assignee = Some(2);
    let review = task(3, "Review API", TaskStatus::Review, ("2024-01-30", "2024-01-30"), "Website");
    vec![ship, docs, review]
}
