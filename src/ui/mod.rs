pub mod focus_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod mini_pane;
pub mod status_bar;
pub mod styles;

use crate::app::AppState;
use crate::domain::Screen;
use focus_pane::render_focus_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use mini_pane::render_mini_pane;
use ratatui::Frame;
use status_bar::render_status_bar;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.screen, app.ui_mode, layout.keybindings_area);

    match app.screen {
        Screen::List => render_list_pane(f, app, layout.content_area),
        Screen::Focus(_) => render_focus_pane(f, app, layout.content_area),
        Screen::Mini => render_mini_pane(f, app, layout.content_area),
    }

    render_status_bar(f, app, layout.status_area);

    // Editor dialog sits on top of everything
    if app.editor.is_some() {
        render_input_form(f, app, size);
    }
}
