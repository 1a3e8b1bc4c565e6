pub mod board_view;
pub mod gantt_view;
pub mod help_overlay;
pub mod list_view;
pub mod popups;
pub mod sidebar;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;

use super::app::{App, Overlay, View};

/// Width of the filter sidebar
pub const SIDEBAR_WIDTH: u16 = 24;

/// Draw the whole screen: tab bar, sidebar, current view, status row, overlays
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    let content = if app.sidebar_open && chunks[1].width > SIDEBAR_WIDTH * 2 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
            .split(chunks[1]);
        sidebar::render_sidebar(frame, app, cols[0]);
        cols[1]
    } else {
        chunks[1]
    };

    if !app.loaded {
        let text = if app.is_loading() { "Loading tasks…" } else { "No tasks loaded" };
        render_empty_state(frame, app, content, text);
    } else {
        match app.view {
            View::Board => board_view::render_board_view(frame, app, content),
            View::Gantt => gantt_view::render_gantt_view(frame, app, content),
            View::List => list_view::render_list_view(frame, app, content),
        }
    }

    // Overlays (rendered on top of everything)
    match &app.overlay {
        Some(Overlay::Login(form)) => popups::render_login(frame, app, form, area),
        Some(Overlay::Detail(id)) => popups::render_detail(frame, app, *id, area),
        Some(Overlay::Form(form)) => popups::render_task_form(frame, app, form, area),
        Some(Overlay::Confirm { id, title }) => {
            popups::render_confirm(frame, app, *id, title, area)
        }
        Some(Overlay::Help) => help_overlay::render_help_overlay(frame, app, area),
        None => {}
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Dim one-line message in the middle of `area`
pub(super) fn render_empty_state(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    let y = area.y + area.height / 2;
    let row = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background))
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, row);
}

/// `width` x `height` rectangle centered in `area`, clipped to it
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text).filter(|m| !m.is_empty()) {
        if m.start() > last_end {
            spans.push(Span::styled(text[last_end..m.start()].to_string(), base_style));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
