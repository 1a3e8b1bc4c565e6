use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::project_name;
use crate::tui::app::{App, View};

/// Render the tab bar: one tab per view, with a separator line below that
/// carries the active filters
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg_style = Style::default().bg(app.theme.background);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(app.theme.background));

    let mut spans: Vec<Span> = vec![Span::styled(" ", bg_style)];
    let mut sep_cols: Vec<usize> = Vec::new();
    for view in View::ALL {
        spans.push(Span::styled(
            format!(" {} ", view.title()),
            tab_style(app, app.view == view),
        ));
        sep_cols.push(spans.iter().map(|s| s.content.chars().count()).sum());
        spans.push(sep.clone());
    }
    if app.is_loading() {
        spans.push(Span::styled(
            " \u{21BB}",
            Style::default().fg(app.theme.highlight).bg(app.theme.background),
        ));
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

/// Short description of the active filters, or `None` when nothing filters
pub fn filter_summary(app: &App) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(name) = app.assignee.name() {
        parts.push(format!("@{}", name));
    }
    if let Some(id) = app.project {
        let name = project_name(&app.projects, id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("project {}", id));
        parts.push(name);
    }
    if app.only_mine {
        parts.push("mine".to_string());
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let indicator = filter_summary(app).map(|s| format!("filter: {}", s));
    // One space either side of the indicator
    let indicator_width = indicator.as_ref().map_or(0, |s| s.chars().count() + 2);
    let line_end = width.saturating_sub(indicator_width);

    let sep_text: String = (0..line_end)
        .map(|col| if sep_cols.contains(&col) { '\u{2534}' } else { '\u{2500}' })
        .collect();
    let mut spans = vec![Span::styled(sep_text, dim_style)];
    if let Some(text) = indicator
        && indicator_width <= width
    {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(text, Style::default().fg(app.theme.highlight).bg(bg)));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UiConfig;
    use crate::ops::kanban::AssigneeFilter;
    use crate::tui::render::test_helpers::render_to_string;

    #[test]
    fn test_tabs_and_plain_separator() {
        let app = App::new(&UiConfig::default());
        let out = render_to_string(40, 2, |frame, area| render_tab_bar(frame, &app, area));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  Board │ Gantt │ List │");
        assert_eq!(lines[1], "────────┴───────┴──────┴────────────────");
    }

    #[test]
    fn test_filter_indicator() {
        let mut app = App::new(&UiConfig::default());
        app.assignee = AssigneeFilter::Named("ben".into());
        app.only_mine = true;
        assert_eq!(filter_summary(&app).as_deref(), Some("@ben mine"));
        let out = render_to_string(50, 2, |frame, area| render_tab_bar(frame, &app, area));
        assert!(out.lines().nth(1).unwrap().ends_with("filter: @ben mine"));
    }
}
