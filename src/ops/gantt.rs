//! Date-grid computation for the Gantt chart.
//!
//! Everything here is pure and works on calendar days (`NaiveDate`), so the
//! same layout drives the TUI grid and the text chart printed by `tb gantt`.

use chrono::{Datelike, Duration, Local, NaiveDate};
use indexmap::IndexMap;

use crate::model::task::Task;

/// Group label for tasks without a project
pub const UNASSIGNED_PROJECT: &str = "Unassigned";

/// Days shown before today when the chart first scrolls into place
pub const SCROLL_LEAD_DAYS: i64 = 7;

/// Inclusive date range covering every dated task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateSpan {
    /// Number of day columns, counting both ends
    pub fn total_days(&self) -> u32 {
        ((self.max - self.min).num_days() + 1) as u32
    }

    /// Column index of `date` (may be negative or past the end)
    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.min).num_days()
    }

    /// Every day of the span, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.min.iter_days().take(self.total_days() as usize)
    }
}

/// Earliest start and latest end over tasks that have both dates.
/// `None` when no task can be placed on the chart.
pub fn date_span(tasks: &[Task]) -> Option<DateSpan> {
    let mut span: Option<DateSpan> = None;
    for (start, end) in tasks.iter().filter_map(Task::date_range) {
        span = Some(match span {
            None => DateSpan { min: start, max: end },
            Some(s) => DateSpan {
                min: s.min.min(start),
                max: s.max.max(end),
            },
        });
    }
    span
}

/// A run of consecutive days in one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    pub year: i32,
    pub month: u32,
    /// Number of day columns the label covers
    pub span: u32,
}

impl MonthLabel {
    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Group the span's days by `(year, month)`, in chronological order
pub fn month_labels(span: &DateSpan) -> Vec<MonthLabel> {
    let mut labels: Vec<MonthLabel> = Vec::new();
    for day in span.days() {
        match labels.last_mut() {
            Some(last) if last.year == day.year() && last.month == day.month() => last.span += 1,
            _ => labels.push(MonthLabel {
                year: day.year(),
                month: day.month(),
                span: 1,
            }),
        }
    }
    labels
}

/// Horizontal placement of a task bar, in day columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub start_offset: u32,
    pub span: u32,
}

/// Bar for a dated task. `None` if a date is missing or the task ends
/// before it starts.
pub fn bar_for(task: &Task, span: &DateSpan) -> Option<Bar> {
    let (start, end) = task.date_range()?;
    if end < start {
        return None;
    }
    let offset = span.offset_of(start);
    if offset < 0 {
        return None;
    }
    Some(Bar {
        start_offset: offset as u32,
        span: ((end - start).num_days() + 1) as u32,
    })
}

/// One row of the chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttRow {
    pub task: Task,
    pub bar: Bar,
}

/// Tasks of one project, in fetch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttGroup {
    pub project: String,
    pub rows: Vec<GanttRow>,
}

/// Everything the chart needs to draw: the day range, the month header,
/// and the rows grouped by project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttLayout {
    pub span: DateSpan,
    pub months: Vec<MonthLabel>,
    pub groups: Vec<GanttGroup>,
}

impl GanttLayout {
    /// Lay out the dated tasks. Groups keep first-seen project order.
    pub fn build(tasks: &[Task]) -> Option<GanttLayout> {
        let span = date_span(tasks)?;
        let mut groups: IndexMap<String, Vec<GanttRow>> = IndexMap::new();
        for task in tasks {
            let Some(bar) = bar_for(task, &span) else {
                continue;
            };
            let project = task
                .project_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNASSIGNED_PROJECT.to_string());
            groups.entry(project).or_default().push(GanttRow {
                task: task.clone(),
                bar,
            });
        }
        Some(GanttLayout {
            span,
            months: month_labels(&span),
            groups: groups
                .into_iter()
                .map(|(project, rows)| GanttGroup { project, rows })
                .collect(),
        })
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

/// Day column to scroll to so that `today - 7` is the first visible day,
/// clamped to the start of the chart
pub fn scroll_target(span: &DateSpan, today: NaiveDate) -> u32 {
    let target = today - Duration::days(SCROLL_LEAD_DAYS);
    span.offset_of(target).max(0) as u32
}

/// [`scroll_target`] converted to cells of `day_width` each
pub fn scroll_cells(span: &DateSpan, today: NaiveDate, day_width: u16) -> u32 {
    scroll_target(span, today) * day_width as u32
}

/// How a day column is shaded relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Past,
    Today,
    Upcoming,
}

pub fn classify_day(date: NaiveDate, today: NaiveDate) -> DayKind {
    match date.cmp(&today) {
        std::cmp::Ordering::Less => DayKind::Past,
        std::cmp::Ordering::Equal => DayKind::Today,
        std::cmp::Ordering::Greater => DayKind::Upcoming,
    }
}

/// Today's date on the local calendar
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
