use crate::app::AppState;
use crate::domain::{Screen, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events; returns true when the app should quit
pub async fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => match app.screen {
            Screen::List => handle_list_keys(app, key).await,
            Screen::Focus(_) | Screen::Mini => handle_detail_view_keys(app, key).await,
        },
        UiMode::AddingTask | UiMode::EditingTask => Ok(handle_editor_keys(app, key)),
    }
}

/// Handle keys on the task list
async fn handle_list_keys(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_task_up();
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_task_down();
            } else {
                app.move_selection_down();
            }
        }
        KeyCode::Char('K') => app.move_task_up(),
        KeyCode::Char('J') => app.move_task_down(),

        // Start/stop
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_running().await,
        KeyCode::Char('s') | KeyCode::Char('S') => app.stop_running().await,

        // Mark complete / incomplete
        KeyCode::Char('d') | KeyCode::Char('D') => app.toggle_completion().await,

        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),

        KeyCode::Char('f') | KeyCode::Char('F') => app.enter_focus(),
        KeyCode::Char('m') | KeyCode::Char('M') => app.enter_mini(),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the focus and mini views
async fn handle_detail_view_keys(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.back_to_list(),
        KeyCode::Char('f') | KeyCode::Char('F') if app.screen == Screen::Mini => app.enter_focus(),
        KeyCode::Char('m') | KeyCode::Char('M') => app.enter_mini(),

        KeyCode::Enter | KeyCode::Char(' ') => match app.screen {
            Screen::Focus(id) => app.toggle_running_for(id).await,
            _ => {
                if let Some(id) = app.running_task().map(|t| t.id) {
                    app.toggle_running_for(id).await;
                }
            }
        },
        KeyCode::Char('s') | KeyCode::Char('S') => app.stop_running().await,

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while the editor dialog is open
fn handle_editor_keys(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.submit_editor(),
        KeyCode::Esc => app.cancel_editor(),

        // Switch fields
        KeyCode::Tab => app.editor_next_field(),
        KeyCode::BackTab => app.editor_prev_field(),

        // Roll the focused wheel
        KeyCode::Up => app.editor_roll(1),
        KeyCode::Down => app.editor_roll(-1),

        KeyCode::Backspace => app.editor_backspace(),
        KeyCode::Char(c) => app.editor_add_char(c),
        _ => {}
    }
    false
}
