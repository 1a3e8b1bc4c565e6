use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Search => (
            vec![
                Span::styled(
                    format!("/{}", app.search_input.as_str()),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ],
            "Enter search  Esc cancel",
        ),
        Mode::Navigate => {
            let spans = match (&app.status, app.is_loading()) {
                (Some(msg), _) => {
                    let fg = if msg.is_error { app.theme.red } else { app.theme.text };
                    vec![Span::styled(
                        truncate_to_width(&msg.text, width.saturating_sub(10)),
                        Style::default().fg(fg).bg(bg),
                    )]
                }
                (None, true) => vec![Span::styled(
                    "loading\u{2026}",
                    Style::default().fg(app.theme.dim).bg(bg),
                )],
                (None, false) => match &app.last_search {
                    Some(pattern) => vec![Span::styled(
                        format!("/{}", pattern),
                        Style::default().fg(app.theme.dim).bg(bg),
                    )],
                    None => Vec::new(),
                },
            };
            (spans, "? help")
        }
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UiConfig;
    use crate::tui::render::test_helpers::render_to_string;

    #[test]
    fn test_error_message_and_hint() {
        let mut app = App::new(&UiConfig::default());
        app.set_error("fetch tasks failed: timeout");
        let out = render_to_string(40, 1, |frame, area| render_status_row(frame, &app, area));
        assert_eq!(out, "fetch tasks failed: timeout       ? help");
    }

    #[test]
    fn test_search_prompt() {
        let mut app = App::new(&UiConfig::default());
        app.mode = Mode::Search;
        app.search_input = crate::tui::text_field::TextField::new("dep");
        let out = render_to_string(40, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with("/dep\u{258C}"));
        assert!(out.ends_with("Enter search  Esc cancel"));
    }
}
