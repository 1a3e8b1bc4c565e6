use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

type Bindings = &'static [(&'static str, &'static str)];

const BOARD_KEYS: Bindings = &[
    (" \u{2190}\u{2192}/hl", "Previous/next column"),
    (" \u{2191}\u{2193}/jk", "Previous/next card"),
    (" </>  H/L", "Move card to the neighbouring column"),
];

const GANTT_KEYS: Bindings = &[
    (" \u{2191}\u{2193}/jk", "Previous/next task"),
    (" \u{2190}\u{2192}/hl", "Scroll one day"),
    (" t", "Scroll back to today"),
];

const LIST_KEYS: Bindings = &[
    (" \u{2191}\u{2193}/jk", "Previous/next task"),
    (" g/G", "Jump to top/bottom"),
];

const TASK_KEYS: Bindings = &[
    (" Enter", "Show details"),
    (" e", "Edit task"),
    (" n", "New task"),
    (" d", "Delete task"),
];

const FILTER_KEYS: Bindings = &[
    (" a", "Cycle assignee"),
    (" p", "Cycle project"),
    (" m", "Only my tasks"),
    (" /", "Search titles and descriptions"),
    (" Esc", "Clear search"),
    (" s", "Toggle sidebar"),
];

const GLOBAL_KEYS: Bindings = &[
    (" Tab  1-3", "Switch view"),
    (" r", "Reload"),
    (" O", "Log out"),
    (" ?", "Toggle this help"),
    (" q", "Quit"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let view_section = match app.view {
        View::Board => (" Board", BOARD_KEYS),
        View::Gantt => (" Gantt", GANTT_KEYS),
        View::List => (" List", LIST_KEYS),
    };
    let sections = [
        view_section,
        (" Tasks", TASK_KEYS),
        (" Filters", FILTER_KEYS),
        (" Global", GLOBAL_KEYS),
    ];

    let mut lines: Vec<Line> = Vec::new();
    for (title, bindings) in sections {
        lines.push(Line::from(Span::styled(title, header_style)));
        for (key, desc) in bindings {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Key Bindings ", header_style))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UiConfig;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};

    #[test]
    fn test_help_follows_view() {
        let mut app = App::new(&UiConfig::default());
        app.view = View::Gantt;
        let out = render_to_string(TERM_W, TERM_H + 16, |frame, area| {
            render_help_overlay(frame, &app, area)
        });
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Scroll back to today"));
        assert!(!out.contains("neighbouring column"));
        assert!(out.contains("Log out"));
    }
}
