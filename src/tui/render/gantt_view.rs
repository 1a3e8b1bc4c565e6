use chrono::Duration;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::gantt::{DayKind, GanttLayout, GanttRow, classify_day, scroll_cells};
use crate::tui::app::App;
use crate::util::unicode::{fit_to_width, truncate_to_width};

/// Header rows above the chart: months, then days
const HEADER_ROWS: u16 = 2;

enum ChartRow<'a> {
    Group(&'a str),
    /// Task row with its index among task rows
    Task(usize, &'a GanttRow),
}

fn chart_rows(layout: &GanttLayout) -> Vec<ChartRow<'_>> {
    let mut rows = Vec::new();
    let mut index = 0;
    for group in &layout.groups {
        rows.push(ChartRow::Group(&group.project));
        for row in &group.rows {
            rows.push(ChartRow::Task(index, row));
            index += 1;
        }
    }
    rows
}

/// Render the Gantt chart: a sticky name column on the left and the day
/// grid scrolled by `app.gantt.scroll_x` cells
pub fn render_gantt_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(layout) = app.gantt_layout() else {
        super::render_empty_state(frame, app, area, "No tasks with both a start and an end date");
        return;
    };

    let name_width = app.name_width.min(area.width.saturating_sub(1));
    // One column for the divider
    let grid_width = area.width.saturating_sub(name_width + 1) as u32;
    let day_width = app.day_width.max(1) as u32;
    let total_cells = layout.span.total_days() * day_width;
    let max_scroll = total_cells.saturating_sub(grid_width);

    if app.gantt.scrolled_for != Some(layout.span) {
        app.gantt.scroll_x = scroll_cells(&layout.span, app.today, app.day_width);
        app.gantt.scrolled_for = Some(layout.span);
    }
    app.gantt.scroll_x = app.gantt.scroll_x.min(max_scroll);

    let rows = chart_rows(&layout);
    let body_height = area.height.saturating_sub(HEADER_ROWS) as usize;
    let selected_line = rows
        .iter()
        .position(|r| matches!(r, ChartRow::Task(i, _) if *i == app.gantt.row));
    if let Some(line) = selected_line {
        // Keep the group heading visible when scrolling back to a group's first task
        let top = if line > 0 && matches!(rows[line - 1], ChartRow::Group(_)) {
            line - 1
        } else {
            line
        };
        if top < app.gantt.scroll_y {
            app.gantt.scroll_y = top;
        } else if body_height > 0 && line >= app.gantt.scroll_y + body_height {
            app.gantt.scroll_y = line + 1 - body_height;
        }
    }
    app.gantt.scroll_y = app.gantt.scroll_y.min(rows.len().saturating_sub(1));

    let app = &*app;
    let grid = Grid {
        app,
        layout: &layout,
        day_width,
        scroll_x: app.gantt.scroll_x,
        width: grid_width,
    };
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let divider = Span::styled("\u{2502}", dim);
    let blank_name = Span::styled(" ".repeat(name_width as usize), Style::default().bg(bg));

    let mut lines: Vec<Line> = Vec::new();
    let mut months = vec![blank_name.clone(), divider.clone()];
    months.extend(grid.month_header());
    lines.push(Line::from(months));
    let mut days = vec![blank_name.clone(), divider.clone()];
    days.extend(grid.day_header());
    lines.push(Line::from(days));

    for row in rows.iter().skip(app.gantt.scroll_y).take(body_height) {
        let mut spans = Vec::new();
        match row {
            ChartRow::Group(project) => {
                spans.push(Span::styled(
                    fit_to_width(project, name_width as usize),
                    Style::default()
                        .fg(app.theme.text_bright)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(divider.clone());
                spans.extend(grid.cells(None));
            }
            ChartRow::Task(index, gantt_row) => {
                let selected = *index == app.gantt.row;
                let name_bg = if selected { app.theme.selection_bg } else { bg };
                let fg = if selected { app.theme.text_bright } else { app.theme.text };
                spans.push(Span::styled(
                    fit_to_width(&format!("  {}", gantt_row.task.title), name_width as usize),
                    Style::default().fg(fg).bg(name_bg),
                ));
                spans.push(divider.clone());
                spans.extend(grid.cells(Some(gantt_row)));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// The visible window of the day grid
struct Grid<'a> {
    app: &'a App,
    layout: &'a GanttLayout,
    day_width: u32,
    scroll_x: u32,
    width: u32,
}

impl Grid<'_> {
    /// Day index for each visible cell, `None` past the end of the chart
    fn visible_days(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        let total = self.layout.span.total_days();
        (self.scroll_x..self.scroll_x + self.width).map(move |cell| {
            let day = cell / self.day_width;
            (day < total).then_some(day)
        })
    }

    fn day_kind(&self, day: u32) -> DayKind {
        classify_day(self.layout.span.min + Duration::days(day as i64), self.app.today)
    }

    /// Month labels over the days they cover, cut to the visible part
    fn month_header(&self) -> Vec<Span<'static>> {
        let style = Style::default().fg(self.app.theme.highlight).bg(self.app.theme.background);
        let mut cells = vec![' '; self.width as usize];
        let view_end = self.scroll_x + self.width;
        let mut first_day = 0;
        for month in &self.layout.months {
            let start = (first_day * self.day_width).max(self.scroll_x);
            first_day += month.span;
            let end = (first_day * self.day_width).min(view_end);
            if start >= end {
                continue;
            }
            let label = truncate_to_width(&month.label(), (end - start) as usize);
            let at = (start - self.scroll_x) as usize;
            for (i, c) in label.chars().enumerate() {
                cells[at + i] = c;
            }
        }
        vec![Span::styled(cells.into_iter().collect::<String>(), style)]
    }

    fn day_header(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        let mut col = 0u32;
        for day in self.visible_days() {
            let cell = self.scroll_x + col;
            col += 1;
            let Some(day) = day else {
                spans.push(Span::styled(" ", Style::default().bg(self.app.theme.background)));
                continue;
            };
            let date = self.layout.span.min + Duration::days(day as i64);
            let label = date.format("%d").to_string();
            let label = if self.day_width >= 2 { label } else { label[1..].to_string() };
            let offset = (cell % self.day_width) as usize;
            let c = label.chars().nth(offset).unwrap_or(' ');
            let kind = self.day_kind(day);
            let fg = if kind == DayKind::Today { self.app.theme.text_bright } else { self.app.theme.dim };
            spans.push(Span::styled(
                c.to_string(),
                Style::default().fg(fg).bg(self.app.theme.day_bg(kind)),
            ));
        }
        spans
    }

    /// Grid cells for one line: shaded background with the task's bar on top
    fn cells(&self, row: Option<&GanttRow>) -> Vec<Span<'static>> {
        let theme = &self.app.theme;
        let bar = row.map(|r| {
            let start = r.bar.start_offset;
            (start..start + r.bar.span, theme.status_color(r.task.status))
        });
        self.visible_days()
            .map(|day| match day {
                None => Span::styled(" ", Style::default().bg(theme.background)),
                Some(day) => {
                    let bg = theme.day_bg(self.day_kind(day));
                    match &bar {
                        Some((range, color)) if range.contains(&day) => {
                            Span::styled("\u{2588}", Style::default().fg(*color).bg(bg))
                        }
                        _ => Span::styled(" ", Style::default().bg(bg)),
                    }
                }
            })
            .collect()
    }
}
