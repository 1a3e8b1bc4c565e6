use chrono::NaiveDate;

use crate::model::feed::summarize;
use crate::model::records::{Case, CaseSummary, Company, ConstructionType, Owner, Property};
use crate::model::task::{Task, TaskStatus};
use crate::model::user::{User, UserDirectory};
use crate::model::{ActivityEntry, Notification, Project};
use crate::ops::gantt::{DayKind, GanttLayout, classify_day};
use crate::ops::kanban::{Board, assignee_name};
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn date_range_text(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<String> {
    match (start, end) {
        (None, None) => None,
        (s, e) => Some(format!(
            "{}..{}",
            s.map(|d| d.to_string()).unwrap_or_default(),
            e.map(|d| d.to_string()).unwrap_or_default()
        )),
    }
}

/// `#7  [review]  Ship it  @ben  2024-01-02..2024-01-09  (Website)`
pub fn format_task_line(task: &Task, users: &UserDirectory) -> String {
    let mut line = format!("#{:<4} [{}]  {}", task.id, task.status, task.title);
    if let Some(name) = assignee_name(task, users) {
        line.push_str(&format!("  @{}", name));
    }
    if let Some(range) = date_range_text(task.start_date, task.end_date) {
        line.push_str(&format!("  {}", range));
    }
    if let Some(project) = &task.project_name {
        line.push_str(&format!("  ({})", project));
    }
    line
}

pub fn format_task_detail(task: &Task, users: &UserDirectory) -> Vec<String> {
    let mut lines = vec![
        format!("#{} {}", task.id, task.title),
        format!("status:      {} ({})", task.status.label(), task.status),
    ];
    if let Some(name) = assignee_name(task, users) {
        lines.push(format!("assignee:    {}", name));
    }
    if let Some(creator) = task.creator {
        let name = users
            .username(creator)
            .map(str::to_string)
            .unwrap_or_else(|| format!("user {}", creator));
        lines.push(format!("creator:     {}", name));
    }
    match (&task.project_name, task.project) {
        (Some(name), _) => lines.push(format!("project:     {}", name)),
        (None, Some(id)) => lines.push(format!("project:     {}", id)),
        _ => {}
    }
    if let Some(d) = task.start_date {
        lines.push(format!("start:       {}", d));
    }
    if let Some(d) = task.end_date {
        lines.push(format!("end:         {}", d));
    }
    if let Some(d) = task.due_date {
        lines.push(format!("due:         {}", d));
    }
    if let Some(desc) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(String::new());
        lines.extend(desc.lines().map(|l| format!("  {}", l)));
    }
    lines
}

/// The four columns side by side, `width` characters each
pub fn format_board(board: &Board, users: &UserDirectory, width: usize) -> Vec<String> {
    let width = width.max(8);
    let cell = |text: &str| pad_to_width(&truncate_to_width(text, width), width);
    let mut lines = Vec::new();

    let header: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|s| cell(&format!("{} ({})", s.label(), board.column(*s).len())))
        .collect();
    lines.push(header.join(" | ").trim_end().to_string());
    lines.push(vec!["-".repeat(width); 4].join("-+-"));

    let rows = TaskStatus::ALL
        .iter()
        .map(|s| board.column(*s).len())
        .max()
        .unwrap_or(0);
    for i in 0..rows {
        let cells: Vec<String> = TaskStatus::ALL
            .iter()
            .map(|s| match board.column(*s).get(i) {
                Some(t) => {
                    let mut text = format!("#{} {}", t.id, t.title);
                    if let Some(name) = assignee_name(t, users) {
                        text.push_str(&format!(" @{}", name));
                    }
                    cell(&text)
                }
                None => cell(""),
            })
            .collect();
        lines.push(cells.join(" | ").trim_end().to_string());
    }
    lines
}

fn bar_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::NotStarted => '░',
        TaskStatus::InProgress => '▒',
        TaskStatus::Review => '▓',
        TaskStatus::Done => '█',
    }
}

/// Text Gantt chart: a name column, month and day header rows, then one
/// row per task under its project heading. Past days are dotted and today
/// is marked with `|`.
pub fn format_gantt(layout: &GanttLayout, today: NaiveDate, day_width: u16) -> Vec<String> {
    let day_width = day_width.max(1) as usize;
    let name_width = layout
        .groups
        .iter()
        .flat_map(|g| {
            std::iter::once(display_width(&g.project))
                .chain(g.rows.iter().map(|r| display_width(&r.task.title) + 2))
        })
        .max()
        .unwrap_or(0)
        .clamp(8, 32);
    let total = layout.span.total_days() as usize;
    let mut lines = Vec::new();

    let mut months = pad_to_width("", name_width);
    months.push(' ');
    for m in &layout.months {
        let cells = m.span as usize * day_width;
        months.push_str(&pad_to_width(&truncate_to_width(&m.label(), cells), cells));
    }
    lines.push(months.trim_end().to_string());

    let mut days = pad_to_width("", name_width);
    days.push(' ');
    for day in layout.span.days() {
        let label = day.format("%d").to_string();
        let label = if day_width >= 2 {
            label
        } else {
            label[1..].to_string()
        };
        days.push_str(&pad_to_width(&label, day_width));
    }
    lines.push(days.trim_end().to_string());

    let background: Vec<char> = layout
        .span
        .days()
        .map(|d| match classify_day(d, today) {
            DayKind::Past => '·',
            DayKind::Today => '|',
            DayKind::Upcoming => ' ',
        })
        .collect();

    for group in &layout.groups {
        lines.push(truncate_to_width(&group.project, name_width));
        for row in &group.rows {
            let mut line = pad_to_width(
                &truncate_to_width(&format!("  {}", row.task.title), name_width),
                name_width,
            );
            line.push(' ');
            let start = row.bar.start_offset as usize;
            let end = start + row.bar.span as usize;
            for (i, bg) in background.iter().enumerate().take(total) {
                let c = if (start..end).contains(&i) {
                    bar_char(row.task.status)
                } else {
                    *bg
                };
                for _ in 0..day_width {
                    line.push(c);
                }
            }
            lines.push(line.trim_end().to_string());
        }
    }

    let legend: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|s| format!("{} {}", bar_char(*s), s.label()))
        .collect();
    lines.push(String::new());
    lines.push(legend.join("   "));
    lines
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn format_user(user: &User) -> String {
    let mut line = format!("#{:<4} {}", user.id, user.username);
    if let Some(email) = user.email.as_deref().filter(|e| !e.is_empty()) {
        line.push_str(&format!("  <{}>", email));
    }
    if let Some(dept) = user.department.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!("  [{}]", dept));
    }
    line
}

pub fn format_profile(user: &User) -> Vec<String> {
    vec![
        format!("username:    {}", user.username),
        format!("email:       {}", user.email.as_deref().unwrap_or("-")),
        format!("department:  {}", user.department.as_deref().unwrap_or("-")),
        format!("bio:         {}", user.bio.as_deref().unwrap_or("-")),
    ]
}

pub fn format_project(project: &Project) -> String {
    match project.description.as_deref().filter(|d| !d.is_empty()) {
        Some(desc) => format!("#{:<4} {}  - {}", project.id, project.name, desc),
        None => format!("#{:<4} {}", project.id, project.name),
    }
}

pub fn format_notification(n: &Notification) -> String {
    summarize(n.id, &n.fields)
}

pub fn format_activity(a: &ActivityEntry) -> String {
    summarize(a.id, &a.fields)
}

// ---------------------------------------------------------------------------
// Case-management records
// ---------------------------------------------------------------------------

pub fn format_company(c: &Company) -> String {
    let mut line = format!("#{:<4} {}", c.id, c.name);
    if let Some(addr) = c.address.as_deref().filter(|a| !a.is_empty()) {
        line.push_str(&format!("  {}", addr));
    }
    if let Some(person) = c.contact_person_name.as_deref().filter(|p| !p.is_empty()) {
        line.push_str(&format!("  (contact: {})", person));
    }
    line
}

pub fn format_company_detail(c: &Company) -> Vec<String> {
    let field = |v: Option<&str>| v.filter(|s| !s.is_empty()).unwrap_or("-").to_string();
    let mut lines = vec![
        format!("Company #{}: {}", c.id, c.name),
        format!("  address:  {}", field(c.address.as_deref())),
        format!("  contact:  {}", field(c.contact_person_name.as_deref())),
    ];
    if let Some(info) = c.contact_info.as_ref().filter(|v| !v.is_null()) {
        lines.push(format!("  info:     {}", info));
    }
    lines
}

pub fn format_owner(o: &Owner) -> String {
    let mut line = format!("#{:<4} {}", o.id, o.name);
    if let Some(addr) = o.address.as_deref().filter(|a| !a.is_empty()) {
        line.push_str(&format!("  {}", addr));
    }
    if let Some(sales) = o.assigned_sales {
        line.push_str(&format!("  sales={}", sales));
    }
    line
}

pub fn format_property(p: &Property) -> String {
    let mut line = format!("#{:<4} {}", p.id, p.address);
    if let Some(kind) = p.property_type.as_deref().filter(|k| !k.is_empty()) {
        line.push_str(&format!("  [{}]", kind));
    }
    if let Some(year) = p.year_built {
        line.push_str(&format!("  built {}", year));
    }
    if let Some(owner) = p.owner {
        line.push_str(&format!("  owner={}", owner));
    }
    line
}

pub fn format_construction_type(c: &ConstructionType) -> String {
    format!("#{:<4} {}", c.id, c.name)
}

pub fn format_case_summary(s: &CaseSummary) -> Vec<String> {
    vec![
        format!("total        {}", s.total),
        format!("in progress  {}", s.in_progress),
        format!("completed    {}", s.completed),
    ]
}

pub fn format_case_line(c: &Case) -> String {
    format!(
        "#{:<4} {:<4} {:<12} owner={} property={} {}",
        c.id, c.case_type, c.status, c.owner, c.property, c.occurence_date
    )
}

pub fn format_case_detail(c: &Case) -> Vec<String> {
    let construction: Vec<String> = c
        .expected_construction_types
        .iter()
        .map(|id| id.to_string())
        .collect();
    vec![
        format!("case #{}", c.id),
        format!("type:        {}", c.case_type),
        format!("status:      {}", c.status),
        format!("owner:       {}", c.owner),
        format!("property:    {}", c.property),
        format!(
            "sales:       {}",
            c.assigned_sales
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into())
        ),
        format!("occurred:    {}", c.occurence_date),
        format!(
            "expected:    {}",
            if construction.is_empty() {
                "-".to_string()
            } else {
                construction.join(", ")
            }
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::kanban::{AssigneeFilter, partition};
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: u64, title: &str, status: TaskStatus, dates: Option<(&str, &str)>) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            status,
            assignee: None,
            assignee_name: Some("ben".into()),
            creator: None,
            start_date: dates.map(|(s, _)| d(s)),
            end_date: dates.map(|(_, e)| d(e)),
            due_date: None,
            project: None,
            project_name: Some("Web".into()),
        }
    }

    #[test]
    fn test_task_line() {
        let t = task(7, "Ship", TaskStatus::Review, Some(("2024-01-02", "2024-01-09")));
        assert_eq!(
            format_task_line(&t, &UserDirectory::default()),
            "#7    [review]  Ship  @ben  2024-01-02..2024-01-09  (Web)"
        );
    }

    #[test]
    fn test_board_columns() {
        let tasks = vec![
            task(1, "Plan", TaskStatus::NotStarted, None),
            task(2, "Build", TaskStatus::InProgress, None),
            task(3, "Polish", TaskStatus::InProgress, None),
        ];
        let board = partition(&tasks, &AssigneeFilter::All, &UserDirectory::default());
        let lines = format_board(&board, &UserDirectory::default(), 12);
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Not started… | In progress… | Review (0)   | Done (0)"
        );
        assert!(lines[2].starts_with("#1 Plan @ben | #2 Build @b… |"));
        assert!(lines[3].starts_with("             | #3 Polish @… |"));
    }

    #[test]
    fn test_company_detail() {
        let company = Company {
            id: 4,
            name: "Acme Realty".into(),
            address: Some("1-2-3 Chuo".into()),
            contact_person_name: None,
            contact_info: None,
        };
        assert_eq!(
            format_company_detail(&company),
            vec![
                "Company #4: Acme Realty",
                "  address:  1-2-3 Chuo",
                "  contact:  -",
            ]
        );
    }

    #[test]
    fn test_case_summary() {
        let summary = CaseSummary {
            total: 12,
            in_progress: 3,
            completed: 7,
        };
        assert_eq!(
            format_case_summary(&summary),
            vec!["total        12", "in progress  3", "completed    7"]
        );
    }

    #[test]
    fn test_gantt_text() {
        let tasks = vec![
            task(1, "Design", TaskStatus::Done, Some(("2024-01-30", "2024-01-31"))),
            task(2, "Build", TaskStatus::InProgress, Some(("2024-01-31", "2024-02-02"))),
        ];
        let layout = GanttLayout::build(&tasks).unwrap();
        let lines = format_gantt(&layout, d("2024-02-01"), 4);
        insta::assert_snapshot!(lines.join("\n"), @r"
                 2024-01 2024-02
                 30  31  01  02
        Web
          Design ████████||||
          Build  ····▒▒▒▒▒▒▒▒▒▒▒▒

        ░ Not started   ▒ In progress   ▓ Review   █ Done
        ");
    }
}
