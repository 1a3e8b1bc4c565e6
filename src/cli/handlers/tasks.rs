use indexmap::IndexMap;

use super::{CmdResult, Ctx, confirm, print_json, print_lines};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::Session;
use crate::ops::board::{BoardError, TaskBoard};
use crate::ops::filter::{TaskFilter, compile_search};
use crate::ops::gantt::{GanttLayout, local_today};
use crate::ops::kanban::{AssigneeFilter, EditForm, ReorderIntent, partition, validate_new};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

pub(super) async fn cmd_list(ctx: &Ctx, args: ListArgs) -> CmdResult {
    let search = args
        .search
        .as_deref()
        .map(compile_search)
        .transpose()
        .map_err(|e| format!("invalid search pattern: {}", e))?;
    let session = ctx.session()?;
    let tasks = ctx.api.fetch_tasks(&session, args.project).await?;
    let users = ctx.directory(&session).await;
    let filter = TaskFilter {
        assignee: AssigneeFilter::from_option(args.assignee),
        only_mine: my_id(ctx, &session, args.mine).await?,
        search,
    };
    let tasks: Vec<_> = filter
        .apply(&tasks, &users)
        .into_iter()
        .filter(|t| args.status.is_none_or(|s| t.status == s))
        .collect();

    if ctx.json {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!("no tasks");
    }
    for t in &tasks {
        println!("{}", format_task_line(t, &users));
    }
    Ok(())
}

pub(super) async fn cmd_board(ctx: &Ctx, args: BoardArgs) -> CmdResult {
    let session = ctx.session()?;
    let tasks = ctx.api.fetch_tasks(&session, args.project).await?;
    let users = ctx.directory(&session).await;
    let board = partition(&tasks, &AssigneeFilter::from_option(args.assignee), &users);

    if ctx.json {
        let columns: IndexMap<&str, _> = crate::model::TaskStatus::ALL
            .iter()
            .map(|s| (s.key(), board.column(*s)))
            .collect();
        return print_json(&columns);
    }
    print_lines(&format_board(&board, &users, args.column_width));
    Ok(())
}

/// The logged-in user's ID when `--mine` is given
async fn my_id(
    ctx: &Ctx,
    session: &Session,
    mine: bool,
) -> Result<Option<u64>, Box<dyn std::error::Error>> {
    if !mine {
        return Ok(None);
    }
    Ok(Some(ctx.api.fetch_me(session).await?.id))
}

pub(super) async fn cmd_gantt(ctx: &Ctx, args: GanttArgs) -> CmdResult {
    let session = ctx.session()?;
    let tasks = ctx.api.fetch_tasks(&session, args.project).await?;
    let filter = TaskFilter {
        assignee: AssigneeFilter::from_option(args.assignee),
        only_mine: my_id(ctx, &session, args.mine).await?,
        search: None,
    };
    let tasks = if filter.is_empty() {
        tasks
    } else {
        filter.apply(&tasks, &ctx.directory(&session).await)
    };
    let Some(layout) = GanttLayout::build(&tasks) else {
        if ctx.json {
            return print_json(&serde_json::Value::Null);
        }
        println!("no tasks with both a start and an end date");
        return Ok(());
    };

    if ctx.json {
        let groups: Vec<_> = layout
            .groups
            .iter()
            .map(|g| {
                let rows: Vec<_> = g
                    .rows
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.task.id,
                            "title": r.task.title,
                            "status": r.task.status,
                            "startOffset": r.bar.start_offset,
                            "span": r.bar.span,
                        })
                    })
                    .collect();
                serde_json::json!({ "project": g.project, "rows": rows })
            })
            .collect();
        let months: Vec<_> = layout
            .months
            .iter()
            .map(|m| serde_json::json!({ "label": m.label(), "span": m.span }))
            .collect();
        return print_json(&serde_json::json!({
            "min": layout.span.min,
            "max": layout.span.max,
            "totalDays": layout.span.total_days(),
            "months": months,
            "groups": groups,
        }));
    }
    print_lines(&format_gantt(&layout, local_today(), args.width));
    Ok(())
}

pub(super) async fn cmd_show(ctx: &Ctx, args: ShowArgs) -> CmdResult {
    let session = ctx.session()?;
    let tasks = ctx.api.fetch_tasks(&session, None).await?;
    let task = tasks
        .iter()
        .find(|t| t.id == args.id)
        .ok_or(BoardError::NotFound(args.id))?;
    if ctx.json {
        return print_json(task);
    }
    let users = ctx.directory(&session).await;
    print_lines(&format_task_detail(task, &users));
    Ok(())
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

pub(super) async fn cmd_add(ctx: &Ctx, args: AddArgs) -> CmdResult {
    let form = EditForm {
        title: args.title,
        description: args.description.unwrap_or_default(),
        status: args.status.unwrap_or_default(),
        assignee: args.assignee,
        project: args.project,
        start_date: args.start.unwrap_or_default(),
        end_date: args.end.unwrap_or_default(),
    };
    // Reject bad input before looking at the session
    validate_new(&form)?;

    let mut board = TaskBoard::new(ctx.authed()?, args.project);
    let task = board.create(&form).await?;
    if ctx.json {
        return print_json(&task);
    }
    println!("created #{} {}", task.id, task.title);
    Ok(())
}

pub(super) async fn cmd_edit(ctx: &Ctx, args: EditArgs) -> CmdResult {
    let mut board = TaskBoard::new(ctx.authed()?, None);
    board.reload().await?;
    let task = board.task(args.id).ok_or(BoardError::NotFound(args.id))?;

    let mut form = EditForm::from_task(task);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(status) = args.status {
        form.status = status;
    }
    if let Some(assignee) = args.assignee {
        form.assignee = (assignee != 0).then_some(assignee);
    }
    if let Some(project) = args.project {
        form.project = (project != 0).then_some(project);
    }
    if let Some(start) = args.start {
        form.start_date = start;
    }
    if let Some(end) = args.end {
        form.end_date = end;
    }

    let saved = board.save_edit(args.id, &form).await?;
    if ctx.json {
        return print_json(&saved);
    }
    println!("saved #{} {}", saved.id, saved.title);
    Ok(())
}

pub(super) async fn cmd_mv(ctx: &Ctx, args: MvArgs) -> CmdResult {
    let mut board = TaskBoard::new(ctx.authed()?, None);
    board.reload().await?;
    let columns = partition(
        board.tasks(),
        &AssigneeFilter::All,
        &Default::default(),
    );
    let intent = ReorderIntent::to_column(&columns, args.id, args.status)
        .ok_or(BoardError::NotFound(args.id))?;

    if board.drop_card(&intent).await? {
        println!("moved #{} to {}", args.id, args.status.label());
    } else {
        println!("#{} is already in {}", args.id, args.status.label());
    }
    Ok(())
}

pub(super) async fn cmd_rm(ctx: &Ctx, args: RmArgs) -> CmdResult {
    let mut board = TaskBoard::new(ctx.authed()?, None);
    board.reload().await?;
    let deleted = board
        .delete(args.id, |task| {
            args.yes
                || confirm(&format!("Delete #{} \"{}\"?", task.id, task.title)).unwrap_or(false)
        })
        .await?;
    if deleted {
        println!("deleted #{}", args.id);
    } else {
        println!("cancelled");
    }
    Ok(())
}
