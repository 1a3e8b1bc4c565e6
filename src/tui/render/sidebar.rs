use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{TaskStatus, project_name};
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

/// Filter summary and per-status counts
pub fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text_bright).bg(bg);
    let inner_width = area.width.saturating_sub(2) as usize;

    let project = match app.project {
        None => "all".to_string(),
        Some(id) => project_name(&app.projects, id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", id)),
    };
    let mine = match (app.only_mine, &app.me) {
        (false, _) => "off".to_string(),
        (true, Some(me)) => me.username.clone(),
        (true, None) => "on".to_string(),
    };
    let search = app.last_search.clone().unwrap_or_else(|| "-".into());

    let mut lines = vec![Line::from(Span::styled(
        "Filters",
        value.add_modifier(Modifier::BOLD),
    ))];
    for (name, text) in [
        ("assignee", app.assignee.name().unwrap_or("all").to_string()),
        ("project", project),
        ("mine", mine),
        ("search", search),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<9}", name), label),
            Span::styled(
                truncate_to_width(&text, inner_width.saturating_sub(9)),
                value,
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tasks",
        value.add_modifier(Modifier::BOLD),
    )));
    let board = app.board();
    for status in TaskStatus::ALL {
        lines.push(Line::from(vec![
            Span::styled("\u{25A0} ", Style::default().fg(app.theme.status_color(status)).bg(bg)),
            Span::styled(format!("{:<12}", status.label()), label),
            Span::styled(board.column(status).len().to_string(), value),
        ]));
    }

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
