//! Modal popups: login, task detail, the create/edit form and the delete
//! confirmation.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::cli::output::format_task_detail;
use crate::model::project_name;
use crate::ops::kanban::FormField;
use crate::tui::app::{App, FormTarget, LoginForm, TaskForm};
use crate::tui::text_field::TextField;
use crate::util::unicode::truncate_to_width;

use super::centered_rect;

const LABEL_WIDTH: usize = 13;

fn popup_block<'a>(app: &App, title: String) -> Block<'a> {
    let bg = app.theme.background;
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg))
}

fn draw_popup(frame: &mut Frame, app: &App, title: String, lines: Vec<Line<'static>>, width: u16, area: Rect) {
    let height = lines.len() as u16 + 2;
    let rect = centered_rect(width, height, area);
    frame.render_widget(Clear, rect);
    let paragraph = Paragraph::new(lines)
        .block(popup_block(app, title))
        .style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, rect);
}

/// Text of an input field, with a block cursor when focused
fn field_spans(app: &App, field: &TextField, focused: bool, masked: bool, width: usize) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let style = Style::default().fg(app.theme.text_bright).bg(bg);
    let text = if masked {
        "\u{2022}".repeat(field.text.chars().count())
    } else {
        field.text.clone()
    };
    if !focused {
        return vec![Span::styled(truncate_to_width(&text, width), style)];
    }
    let split = if masked {
        "\u{2022}".len() * field.text[..field.cursor].chars().count()
    } else {
        field.cursor
    };
    let budget = width.saturating_sub(1);
    let (before, after) = text.split_at(split.min(text.len()));
    vec![
        Span::styled(truncate_to_width(before, budget), style),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            truncate_to_width(after, budget.saturating_sub(before.chars().count())),
            style,
        ),
    ]
}

fn label_span(app: &App, label: &str, focused: bool) -> Span<'static> {
    let bg = app.theme.background;
    let (marker, fg) = if focused {
        ("\u{203A}", app.theme.highlight)
    } else {
        (" ", app.theme.dim)
    };
    Span::styled(
        format!("{}{:<width$}", marker, label, width = LABEL_WIDTH - 1),
        Style::default().fg(fg).bg(bg),
    )
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

pub fn render_login(frame: &mut Frame, app: &App, form: &LoginForm, area: Rect) {
    let bg = app.theme.background;
    let width = 46u16;
    let field_width = width as usize - 2 - LABEL_WIDTH;

    let mut username = vec![label_span(app, "Username", !form.focus_password)];
    username.extend(field_spans(app, &form.username, !form.focus_password, false, field_width));
    let mut password = vec![label_span(app, "Password", form.focus_password)];
    password.extend(field_spans(app, &form.password, form.focus_password, true, field_width));

    let footer = match (&form.error, form.submitting) {
        (_, true) => Span::styled(" Logging in\u{2026}", Style::default().fg(app.theme.dim).bg(bg)),
        (Some(err), false) => Span::styled(
            format!(" {}", truncate_to_width(err, width as usize - 3)),
            Style::default().fg(app.theme.red).bg(bg),
        ),
        (None, false) => Span::styled(
            " Tab switch  Enter log in  Esc quit",
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    };

    let lines = vec![
        Line::from(""),
        Line::from(username),
        Line::from(password),
        Line::from(""),
        Line::from(footer),
    ];
    draw_popup(frame, app, " Log in ".to_string(), lines, width, area);
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

pub fn render_detail(frame: &mut Frame, app: &App, id: u64, area: Rect) {
    let bg = app.theme.background;
    let width = 64u16.min(area.width);
    let inner = width.saturating_sub(2) as usize;
    let text = Style::default().fg(app.theme.text).bg(bg);

    let mut lines: Vec<Line<'static>> = match app.task(id) {
        Some(task) => format_task_detail(task, &app.users)
            .into_iter()
            .map(|l| Line::from(Span::styled(format!(" {}", truncate_to_width(&l, inner.saturating_sub(1))), text)))
            .collect(),
        None => vec![Line::from(Span::styled(
            format!(" Task #{} no longer exists", id),
            Style::default().fg(app.theme.red).bg(bg),
        ))],
    };
    // Cap at the screen height, leaving room for the hint and borders
    lines.truncate(area.height.saturating_sub(4) as usize);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " e edit  d delete  Esc close",
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    draw_popup(frame, app, format!(" Task #{} ", id), lines, width, area);
}

// ---------------------------------------------------------------------------
// Task form
// ---------------------------------------------------------------------------

/// Display value of a choice field
fn choice_text(app: &App, form: &TaskForm, field: FormField) -> String {
    match field {
        FormField::Status => form.status.label().to_string(),
        FormField::Assignee => form
            .assignee
            .map(|id| {
                app.users
                    .username(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("user {}", id))
            })
            .unwrap_or_else(|| "(none)".into()),
        FormField::Project => form
            .project
            .map(|id| {
                project_name(&app.projects, id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("project {}", id))
            })
            .unwrap_or_else(|| "(none)".into()),
        _ => String::new(),
    }
}

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Title => "Title",
        FormField::Description => "Description",
        FormField::Status => "Status",
        FormField::Assignee => "Assignee",
        FormField::Project => "Project",
        FormField::Start => "Start",
        FormField::End => "End",
    }
}

pub fn render_task_form(frame: &mut Frame, app: &App, form: &TaskForm, area: Rect) {
    let bg = app.theme.background;
    let width = 64u16.min(area.width);
    let field_width = (width as usize).saturating_sub(2 + LABEL_WIDTH);
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let red = Style::default().fg(app.theme.red).bg(bg);

    let mut lines: Vec<Line<'static>> = vec![Line::from("")];
    for field in TaskForm::FIELDS {
        let focused = form.focus == field;
        let mut spans = vec![label_span(app, field_label(field), focused)];
        let text = match field {
            FormField::Title => Some(&form.title),
            FormField::Description => Some(&form.description),
            FormField::Start => Some(&form.start),
            FormField::End => Some(&form.end),
            FormField::Status | FormField::Assignee | FormField::Project => None,
        };
        match text {
            Some(t) if t.is_empty() && !focused && matches!(field, FormField::Start | FormField::End) => {
                spans.push(Span::styled("YYYY-MM-DD", dim));
            }
            Some(t) => spans.extend(field_spans(app, t, focused, false, field_width)),
            None => {
                let value = choice_text(app, form, field);
                let style = Style::default().fg(app.theme.text_bright).bg(bg);
                if focused {
                    spans.push(Span::styled("\u{25C2} ", dim));
                    spans.push(Span::styled(value, style));
                    spans.push(Span::styled(" \u{25B8}", dim));
                } else if field == FormField::Status {
                    spans.push(Span::styled(value, Style::default().fg(app.theme.status_color(form.status)).bg(bg)));
                } else {
                    spans.push(Span::styled(value, style));
                }
            }
        }
        lines.push(Line::from(spans));

        if let Some(err) = &form.error
            && err.field() == field
        {
            lines.push(Line::from(Span::styled(
                format!("{:width$}{}", "", truncate_to_width(&err.to_string(), field_width), width = LABEL_WIDTH),
                red,
            )));
        }
    }
    lines.push(Line::from(""));

    let footer = match (&form.server_error, form.submitting) {
        (_, true) => Span::styled(" Saving\u{2026}", dim),
        (Some(err), false) => Span::styled(
            format!(" {}", truncate_to_width(err, (width as usize).saturating_sub(3))),
            red,
        ),
        (None, false) => Span::styled(" Tab next  \u{2190}\u{2192} choose  Enter save  Esc cancel", dim),
    };
    lines.push(Line::from(footer));

    let title = match form.target {
        FormTarget::Create => " New task ".to_string(),
        FormTarget::Edit(id) => format!(" Edit #{} ", id),
    };
    draw_popup(frame, app, title, lines, width, area);
}

// ---------------------------------------------------------------------------
// Confirm
// ---------------------------------------------------------------------------

pub fn render_confirm(frame: &mut Frame, app: &App, id: u64, title: &str, area: Rect) {
    let bg = app.theme.background;
    let width = 50u16.min(area.width);
    let quoted = truncate_to_width(title, (width as usize).saturating_sub(16));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" Delete #{} \"{}\"?", id, quoted),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " y delete  any other key cancels",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    draw_popup(frame, app, " Delete task ".to_string(), lines, width, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use crate::ops::kanban::EditError;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn test_login_masks_password() {
        let app = App::new(&crate::model::UiConfig::default());
        let form = LoginForm {
            username: TextField::new("ana"),
            password: TextField::new("hunter2"),
            focus_password: false,
            error: Some("Invalid credentials".into()),
            submitting: false,
        };
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_login(frame, &app, &form, area));
        assert!(out.contains("Log in"));
        assert!(out.contains("ana\u{258C}"));
        assert!(out.contains(&"\u{2022}".repeat(7)));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("Invalid credentials"));
    }

    #[test]
    fn test_detail_shows_task() {
        let app = app_with_tasks(sample_tasks());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_detail(frame, &app, 1, area));
        assert!(out.contains("#1 Ship login"));
        assert!(out.contains("assignee:    ana"));
        assert!(out.contains("project:     Website"));

        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_detail(frame, &app, 99, area));
        assert!(out.contains("Task #99 no longer exists"));
    }

    #[test]
    fn test_form_error_next_to_field() {
        let app = app_with_tasks(sample_tasks());
        let mut form = TaskForm::create(TaskStatus::Review, Some(7));
        form.error = Some(EditError::EmptyTitle);
        form.focus = FormField::Project;
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_task_form(frame, &app, &form, area));
        let lines: Vec<&str> = out.lines().collect();
        let title_row = lines.iter().position(|l| l.contains("Title")).unwrap();
        assert!(lines[title_row + 1].contains("title is required"));
        assert!(out.contains("New task"));
        assert!(out.contains("Review"));
        assert!(out.contains("\u{25C2} Website \u{25B8}"));
        assert!(out.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_form_server_error() {
        let app = app_with_tasks(sample_tasks());
        let task = app.task(2).unwrap().clone();
        let mut form = TaskForm::edit(&task);
        form.server_error = Some("save failed: 400 Bad Request".into());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_task_form(frame, &app, &form, area));
        assert!(out.contains("Edit #2"));
        assert!(out.contains("Write docs"));
        assert!(out.contains("ben"));
        assert!(out.contains("save failed: 400 Bad Request"));
    }

    #[test]
    fn test_confirm_prompt() {
        let app = app_with_tasks(sample_tasks());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_confirm(frame, &app, 3, "Review API", area)
        });
        assert!(out.contains("Delete #3 \"Review API\"?"));
    }
}
