use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::kanban::assignee_name;
use crate::tui::app::App;
use crate::util::unicode::{fit_to_width, truncate_to_width};

use super::push_highlighted_spans;

const ID_WIDTH: usize = 6;
const STATUS_WIDTH: usize = 13;
const ASSIGNEE_WIDTH: usize = 10;

/// One row per task: id, status, title (search matches highlighted) and
/// assignee
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let tasks = app.list_tasks();
    if tasks.is_empty() {
        let text = if app.search_re().is_some() {
            "No tasks match the search"
        } else {
            "No tasks"
        };
        super::render_empty_state(frame, app, area, text);
        return;
    }

    let height = area.height as usize;
    if app.list_cursor < app.list_scroll {
        app.list_scroll = app.list_cursor;
    } else if height > 0 && app.list_cursor >= app.list_scroll + height {
        app.list_scroll = app.list_cursor + 1 - height;
    }

    let app = &*app;
    let re = app.search_re();
    let bg = app.theme.background;
    let width = area.width as usize;
    let title_width = width.saturating_sub(ID_WIDTH + STATUS_WIDTH + ASSIGNEE_WIDTH + 1);

    let mut lines = Vec::new();
    for (i, task) in tasks.iter().enumerate().skip(app.list_scroll).take(height) {
        let row_bg = if i == app.list_cursor { app.theme.selection_bg } else { bg };
        let base = Style::default().fg(app.theme.text).bg(row_bg);
        let highlight = Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg);

        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            &fit_to_width(&format!("#{}", task.id), ID_WIDTH),
            Style::default().fg(app.theme.dim).bg(row_bg),
            highlight,
            re.as_ref(),
        );
        spans.push(Span::styled(
            fit_to_width(task.status.label(), STATUS_WIDTH),
            Style::default()
                .fg(app.theme.status_color(task.status))
                .bg(row_bg),
        ));
        push_highlighted_spans(
            &mut spans,
            &fit_to_width(&task.title, title_width),
            base,
            highlight,
            re.as_ref(),
        );
        spans.push(Span::styled(" ", base));
        let assignee = assignee_name(task, &app.users)
            .map(|n| format!("@{}", n))
            .unwrap_or_default();
        spans.push(Span::styled(
            fit_to_width(&truncate_to_width(&assignee, ASSIGNEE_WIDTH), ASSIGNEE_WIDTH),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
