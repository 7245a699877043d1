//! Key handling per screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, CurrentScreen, DeleteTarget, FormState};
use crate::controller::Control;

/// Handle one key press; returns true when the app should exit
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.current_screen {
        CurrentScreen::Main => return handle_main(app, key.code),
        CurrentScreen::Form => handle_form(app, key.code),
        CurrentScreen::DeleteConfirm => handle_delete_confirm(app, key.code),
        CurrentScreen::Search => handle_search(app, key.code),
        CurrentScreen::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                app.current_screen = CurrentScreen::Main;
            }
        }
    }
    false
}

fn handle_main(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Home => app.table_state.select(Some(0)),
        KeyCode::End => app.move_cursor(isize::MAX / 2),
        KeyCode::Char(' ') => {
            if let Some(key) = app.current_key() {
                app.controller.toggle_row(&key);
            }
        }
        KeyCode::Char('A') => {
            let rows = app.rows();
            let all_selected = !rows.is_empty() && rows.iter().all(|r| r.selected);
            app.controller.toggle_select_all(!all_selected);
        }
        KeyCode::Char('r') => {
            app.clear_messages();
            app.spawn_refresh();
        }
        KeyCode::Char('a') | KeyCode::Char('n') => {
            app.clear_messages();
            app.form = FormState::new();
            app.current_screen = CurrentScreen::Form;
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(key) = app.current_key() {
                app.clear_messages();
                app.spawn_edit(key);
            }
        }
        KeyCode::Char('d') => {
            let selected = app.controller.selected_keys().len();
            let target = if selected > 0 {
                Some(DeleteTarget::Selected(selected))
            } else {
                app.current_key().map(DeleteTarget::Row)
            };
            if target.is_some() {
                app.delete_target = target;
                app.current_screen = CurrentScreen::DeleteConfirm;
            }
        }
        KeyCode::Char('D') => {
            app.delete_target = Some(DeleteTarget::All);
            app.current_screen = CurrentScreen::DeleteConfirm;
        }
        KeyCode::Char('x') => {
            if !app.is_busy(Control::Export) {
                app.clear_messages();
                app.spawn_export();
            }
        }
        KeyCode::Char('/') => {
            app.current_screen = CurrentScreen::Search;
        }
        KeyCode::Char('?') => app.current_screen = CurrentScreen::Help,
        _ => {}
    }
    false
}

fn handle_form(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.current_screen = CurrentScreen::Main,
        KeyCode::Tab | KeyCode::Down => app.form.field = app.form.field.next(),
        KeyCode::BackTab | KeyCode::Up => app.form.field = app.form.field.prev(),
        KeyCode::Enter => {
            // 提交中按钮处于禁用状态
            if app.is_busy(Control::WriteForm) {
                return;
            }
            match app.form.to_record() {
                Ok(record) => {
                    app.clear_messages();
                    app.spawn_write(app.form.operation, record);
                }
                Err(message) => app.error_message = message,
            }
        }
        KeyCode::Left | KeyCode::Right if !app.form.field.is_text() => app.form.cycle(),
        KeyCode::Char(' ') if !app.form.field.is_text() => app.form.cycle(),
        KeyCode::Backspace => {
            if let Some(text) = app.form.text_mut() {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = app.form.text_mut() {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn handle_delete_confirm(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(target) = app.delete_target.take() {
                let control = match target {
                    DeleteTarget::Row(_) => Control::DeleteRow,
                    DeleteTarget::Selected(_) => Control::DeleteSelected,
                    DeleteTarget::All => Control::DeleteAll,
                };
                if !app.is_busy(control) {
                    app.clear_messages();
                    app.spawn_delete(target);
                }
            }
            app.current_screen = CurrentScreen::Main;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.delete_target = None;
            app.current_screen = CurrentScreen::Main;
        }
        _ => {}
    }
}

fn handle_search(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.current_screen = CurrentScreen::Main,
        KeyCode::Enter => {
            if !app.is_busy(Control::Search) {
                app.clear_messages();
                app.spawn_search(app.search_input.clone());
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}
