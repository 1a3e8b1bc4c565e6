use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{Task, TaskStatus};
use crate::ops::kanban::assignee_name;
use crate::tui::app::App;
use crate::util::unicode::{fit_to_width, truncate_to_width};

/// Lines per card
const CARD_HEIGHT: usize = 2;

/// Render the four status columns side by side
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let board = app.board();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (i, status) in TaskStatus::ALL.into_iter().enumerate() {
        let rect = columns[i];
        let cards = board.column(status);
        let capacity = (rect.height.saturating_sub(2) as usize / CARD_HEIGHT).max(1);

        // Keep the selected card in view
        let selected = (app.board_cursor.column == i).then_some(app.board_cursor.row);
        let scroll = &mut app.board_scroll[i];
        if let Some(row) = selected {
            if row < *scroll {
                *scroll = row;
            } else if row >= *scroll + capacity {
                *scroll = row + 1 - capacity;
            }
        }
        *scroll = (*scroll).min(cards.len().saturating_sub(1));
        let scroll = *scroll;

        render_column(frame, app, rect, status, cards, selected, scroll, capacity);
    }
}

#[allow(clippy::too_many_arguments)]
fn render_column(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    status: TaskStatus,
    cards: &[Task],
    selected: Option<usize>,
    scroll: usize,
    capacity: usize,
) {
    let bg = app.theme.background;
    let color = app.theme.status_color(status);
    let focused = selected.is_some();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { color } else { app.theme.dim }).bg(bg))
        .title(Span::styled(
            format!(" {} {} ", status.label(), cards.len()),
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    if cards.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    for (row, task) in cards.iter().enumerate().skip(scroll).take(capacity) {
        let is_selected = selected == Some(row);
        let card_bg = if is_selected { app.theme.selection_bg } else { bg };
        let id_style = Style::default()
            .fg(if is_selected { app.theme.highlight } else { app.theme.dim })
            .bg(card_bg);
        let title_style = Style::default()
            .fg(if is_selected { app.theme.text_bright } else { app.theme.text })
            .bg(card_bg);

        let id = format!("#{} ", task.id);
        let title_width = width.saturating_sub(id.chars().count());
        lines.push(Line::from(vec![
            Span::styled(id, id_style),
            Span::styled(fit_to_width(&task.title, title_width), title_style),
        ]));
        lines.push(Line::from(Span::styled(
            fit_to_width(&card_meta(task, app), width),
            Style::default().fg(app.theme.dim).bg(card_bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

/// Second card line: assignee and date range, abbreviated
fn card_meta(task: &Task, app: &App) -> String {
    let mut parts = Vec::new();
    if let Some(name) = assignee_name(task, &app.users) {
        parts.push(format!("@{}", truncate_to_width(name, 12)));
    }
    match (task.start_date, task.end_date) {
        (Some(s), Some(e)) => parts.push(format!("{}\u{2192}{}", s.format("%m-%d"), e.format("%m-%d"))),
        (Some(s), None) => parts.push(format!("from {}", s.format("%m-%d"))),
        (None, Some(e)) => parts.push(format!("until {}", e.format("%m-%d"))),
        (None, None) => {}
    }
    format!("  {}", parts.join("  "))
}
