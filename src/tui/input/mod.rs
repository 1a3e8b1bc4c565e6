mod navigate;
mod popups;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Mode};

use navigate::handle_navigate;
use popups::handle_overlay;
use search::handle_search;

/// Handle a key event: the open overlay first, then the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses and key releases
    if matches!(key.code, KeyCode::Modifier(_)) || key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.overlay.is_some() {
        handle_overlay(app, key);
        return;
    }

    // A new key clears the previous message
    app.status = None;
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
    }
}

/// Handle a bracketed paste: goes into whichever text field has focus
pub fn handle_paste(app: &mut App, text: &str) {
    let single_line = text.replace(['\r', '\n'], " ");
    if let Some(field) = popups::focused_field(app) {
        field.insert_str(&single_line);
    } else if app.mode == Mode::Search {
        app.search_input.insert_str(&single_line);
    }
}
