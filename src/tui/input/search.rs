use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::filter::compile_search;
use crate::tui::app::{App, Mode, View};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        // Cancel search, keep the previous pattern
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
        }

        // Execute search
        KeyCode::Enter => {
            let pattern = app.search_input.as_str().trim().to_string();
            app.mode = Mode::Navigate;
            app.search_input.clear();
            if pattern.is_empty() {
                app.last_search = None;
            } else if let Err(e) = compile_search(&pattern) {
                app.set_error(format!("invalid search pattern: {}", e));
                return;
            } else {
                app.last_search = Some(pattern);
                // Results live in the list view
                app.view = View::List;
                app.list_cursor = 0;
                app.list_scroll = 0;
            }
            app.clamp_cursors();
        }

        _ => {
            app.search_input.handle_key(key);
            // The list narrows as the pattern is typed
            app.list_cursor = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use super::super::tests::{press, type_str};
    use crate::tui::app::{Mode, View};
    use crate::tui::render::test_helpers::{app_with_tasks, sample_tasks};

    #[test]
    fn test_search_enter_sets_pattern_and_shows_list() {
        let mut app = app_with_tasks(sample_tasks());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "docs");
        // Live results while typing
        assert_eq!(app.list_tasks().len(), 1);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.last_search.as_deref(), Some("docs"));
        assert_eq!(app.view, View::List);
        assert_eq!(app.list_tasks()[0].id, 2);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut app = app_with_tasks(sample_tasks());
        app.last_search = Some("ship".into());
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "(unclosed");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_search.as_deref(), Some("ship"));
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_empty_search_clears_and_esc_cancels() {
        let mut app = app_with_tasks(sample_tasks());
        app.last_search = Some("ship".into());
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "review");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.last_search.as_deref(), Some("ship"));

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_search, None);
    }
}
