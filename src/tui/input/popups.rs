use crossterm::event::{KeyCode, KeyEvent};

use crate::api::worker::ApiCommand;
use crate::model::Credentials;
use crate::ops::kanban::{validate_edit, validate_new};
use crate::tui::app::{App, FormTarget, LoginForm, Overlay, TaskForm};
use crate::tui::text_field::TextField;

/// The text field that typed or pasted text goes into, if an overlay has one
pub(super) fn focused_field(app: &mut App) -> Option<&mut TextField> {
    match &mut app.overlay {
        Some(Overlay::Login(form)) => Some(form.focused_mut()),
        Some(Overlay::Form(form)) => form.text_mut(),
        _ => None,
    }
}

/// Route a key to the open overlay. The overlay is taken out of the app
/// while it handles the key and put back unless the key closed it.
pub(super) fn handle_overlay(app: &mut App, key: KeyEvent) {
    let Some(overlay) = app.overlay.take() else {
        return;
    };
    app.overlay = match overlay {
        Overlay::Login(form) => handle_login(app, form, key),
        Overlay::Detail(id) => handle_detail(app, id, key),
        Overlay::Form(form) => handle_form(app, form, key),
        Overlay::Confirm { id, title } => handle_confirm(app, id, title, key),
        Overlay::Help => None,
    };
}

fn handle_login(app: &mut App, mut form: LoginForm, key: KeyEvent) -> Option<Overlay> {
    match key.code {
        // Nothing to show without a session
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.focus_password = !form.focus_password;
        }
        KeyCode::Enter if form.submitting => {}
        KeyCode::Enter => {
            let username = form.username.as_str().trim().to_string();
            if username.is_empty() {
                form.error = Some("username is required".into());
                form.focus_password = false;
            } else if form.password.is_empty() {
                if form.focus_password {
                    form.error = Some("password is required".into());
                }
                form.focus_password = true;
            } else {
                form.error = None;
                form.submitting = true;
                app.send(ApiCommand::Login(Credentials {
                    username,
                    password: form.password.text.clone(),
                }));
            }
        }
        _ if !form.submitting => {
            form.focused_mut().handle_key(key);
        }
        _ => {}
    }
    Some(Overlay::Login(form))
}

fn handle_detail(app: &mut App, id: u64, key: KeyEvent) -> Option<Overlay> {
    match key.code {
        KeyCode::Char('e') => match app.task(id) {
            Some(task) => Some(Overlay::Form(Box::new(TaskForm::edit(task)))),
            None => {
                app.set_error(format!("task #{} no longer exists", id));
                None
            }
        },
        KeyCode::Char('d') => app.task(id).map(|task| Overlay::Confirm {
            id,
            title: task.title.clone(),
        }),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => None,
        _ => Some(Overlay::Detail(id)),
    }
}

fn handle_form(app: &mut App, mut form: Box<TaskForm>, key: KeyEvent) -> Option<Overlay> {
    if key.code == KeyCode::Esc {
        return None;
    }
    if form.submitting {
        return Some(Overlay::Form(form));
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(true),
        KeyCode::BackTab | KeyCode::Up => form.focus_next(false),
        KeyCode::Enter => submit_form(app, &mut form),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.text_mut().is_none() => {
            let forward = key.code != KeyCode::Left;
            form.cycle_choice(forward, app.users.users(), &app.projects);
        }
        _ => {
            if let Some(field) = form.text_mut() {
                field.handle_key(key);
            }
        }
    }
    Some(Overlay::Form(form))
}

/// Validate locally; on success send the request and wait for the server
/// with the form still open
fn submit_form(app: &mut App, form: &mut TaskForm) {
    let edit = form.to_edit_form();
    let checked = match form.target {
        FormTarget::Create => validate_new(&edit).map(|_| ()),
        FormTarget::Edit(_) => validate_edit(&edit).map(|_| ()),
    };
    if let Err(e) = checked {
        form.focus = e.field();
        form.error = Some(e);
        return;
    }

    form.error = None;
    form.server_error = None;
    form.submitting = true;
    match form.target {
        FormTarget::Create => app.send(ApiCommand::Create(edit)),
        FormTarget::Edit(id) => app.send(ApiCommand::Save { id, form: edit }),
    }
}

fn handle_confirm(app: &mut App, id: u64, title: String, key: KeyEvent) -> Option<Overlay> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            tracing::info!(id, title = %title, "delete confirmed");
            app.send(ApiCommand::Delete(id));
        }
        _ => app.set_status("cancelled"),
    }
    None
}
