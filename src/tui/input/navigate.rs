use crossterm::event::{KeyCode, KeyEvent};

use crate::api::worker::ApiCommand;
use crate::model::TaskStatus;
use crate::ops::filter::cycle_project;
use crate::ops::kanban::{ReorderIntent, assignees, reduce};
use crate::tui::app::{App, LoginForm, Mode, Overlay, TaskForm, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.overlay = Some(Overlay::Help),

        // Views
        KeyCode::Tab => app.view = app.view.next(),
        KeyCode::BackTab => app.view = app.view.next().next(),
        KeyCode::Char(c @ '1'..='3') => {
            app.view = View::ALL[c as usize - '1' as usize];
        }

        // Search and filters
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            app.search_input.clear();
        }
        KeyCode::Esc => {
            if app.last_search.take().is_some() {
                app.clamp_cursors();
            }
        }
        KeyCode::Char('s') => app.sidebar_open = !app.sidebar_open,
        KeyCode::Char('a') => {
            let names = assignees(&app.tasks, &app.users);
            app.assignee = app.assignee.cycle(&names);
            app.clamp_cursors();
        }
        KeyCode::Char('p') => {
            app.project = cycle_project(app.project, &app.projects);
            app.send(ApiCommand::SetProject(app.project));
        }
        KeyCode::Char('m') => {
            if app.me.is_none() {
                app.set_error("current user unknown; press r to reload");
            } else {
                app.only_mine = !app.only_mine;
                app.clamp_cursors();
            }
        }

        // Server
        KeyCode::Char('r') => {
            app.send(ApiCommand::Reload);
            app.send(ApiCommand::LoadDirectory);
        }
        KeyCode::Char('O') => logout(app),

        // Tasks
        KeyCode::Enter => {
            if let Some(task) = app.selected_task() {
                app.overlay = Some(Overlay::Detail(task.id));
            }
        }
        KeyCode::Char('e') => {
            if let Some(task) = app.selected_task() {
                app.overlay = Some(Overlay::Form(Box::new(TaskForm::edit(&task))));
            }
        }
        KeyCode::Char('n') => {
            let status = match app.view {
                View::Board => TaskStatus::ALL[app.board_cursor.column],
                View::Gantt | View::List => TaskStatus::NotStarted,
            };
            app.overlay = Some(Overlay::Form(Box::new(TaskForm::create(status, app.project))));
        }
        KeyCode::Char('d') => {
            if let Some(task) = app.selected_task() {
                app.overlay = Some(Overlay::Confirm {
                    id: task.id,
                    title: task.title,
                });
            }
        }

        _ => match app.view {
            View::Board => handle_board_key(app, key),
            View::Gantt => handle_gantt_key(app, key),
            View::List => handle_list_key(app, key),
        },
    }
}

fn logout(app: &mut App) {
    app.send(ApiCommand::Logout);
    app.tasks.clear();
    app.loaded = false;
    app.me = None;
    app.only_mine = false;
    app.overlay = Some(Overlay::Login(LoginForm::default()));
    app.clamp_cursors();
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

fn handle_board_key(app: &mut App, key: KeyEvent) {
    let board = app.board();
    let column_len = |col: usize| board.column(TaskStatus::ALL[col]).len();
    let cursor = &mut app.board_cursor;
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            cursor.column = cursor.column.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            cursor.column = (cursor.column + 1).min(TaskStatus::ALL.len() - 1);
        }
        KeyCode::Up | KeyCode::Char('k') => cursor.row = cursor.row.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => cursor.row += 1,
        KeyCode::Char('g') => cursor.row = 0,
        KeyCode::Char('G') => cursor.row = usize::MAX,
        KeyCode::Char('<') | KeyCode::Char('H') => return move_card(app, false),
        KeyCode::Char('>') | KeyCode::Char('L') => return move_card(app, true),
        _ => return,
    }
    cursor.row = cursor.row.min(column_len(cursor.column).saturating_sub(1));
}

/// Keyboard drag: move the selected card to the neighbouring column.
/// The board updates at once and the request goes to the worker; a
/// failure reloads the board from the server.
fn move_card(app: &mut App, forward: bool) {
    let board = app.board();
    let status = TaskStatus::ALL[app.board_cursor.column];
    let Some(task) = board.column(status).get(app.board_cursor.row) else {
        return;
    };
    let dest = if forward { status.right() } else { status.left() };
    let Some(dest) = dest else {
        return;
    };
    let Some(intent) = ReorderIntent::to_column(&board, task.id, dest) else {
        return;
    };
    if intent.is_noop() {
        return;
    }

    app.tasks = reduce(&app.tasks, &intent).tasks;
    if let Some((status, row)) = app.board().position(intent.task_id) {
        app.board_cursor.column = status.column();
        app.board_cursor.row = row;
    }
    app.send(ApiCommand::Drop(intent));
}

// ---------------------------------------------------------------------------
// Gantt
// ---------------------------------------------------------------------------

fn handle_gantt_key(app: &mut App, key: KeyEvent) {
    let rows = app.gantt_layout().map_or(0, |l| l.row_count());
    let day = app.day_width as u32;
    let gantt = &mut app.gantt;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => gantt.row = gantt.row.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            gantt.row = (gantt.row + 1).min(rows.saturating_sub(1));
        }
        // The renderer clamps the right edge
        KeyCode::Left | KeyCode::Char('h') => gantt.scroll_x = gantt.scroll_x.saturating_sub(day),
        KeyCode::Right | KeyCode::Char('l') => gantt.scroll_x += day,
        KeyCode::Char('t') => gantt.scrolled_for = None,
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

fn handle_list_key(app: &mut App, key: KeyEvent) {
    let rows = app.list_tasks().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.list_cursor = app.list_cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => app.list_cursor += 1,
        KeyCode::Char('g') => app.list_cursor = 0,
        KeyCode::Char('G') => app.list_cursor = usize::MAX,
        _ => return,
    }
    app.list_cursor = app.list_cursor.min(rows.saturating_sub(1));
}
