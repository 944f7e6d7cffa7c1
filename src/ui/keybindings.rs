use crate::domain::{Screen, UiMode};
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current screen and input mode
pub fn hints(screen: Screen, ui_mode: UiMode) -> &'static [&'static str] {
    match (ui_mode, screen) {
        (UiMode::AddingTask | UiMode::EditingTask, _) => &[
            "Tab field   ",
            "↑/↓ roll wheel   ",
            "0-9 type   ",
            "Enter save   ",
            "Esc cancel",
        ],
        (UiMode::Normal, Screen::List) => &[
            " ↑/↓ select   ",
            "Shift+↑/↓ reorder   ",
            "Enter start/stop   ",
            "s stop   ",
            "d done   ",
            "a add   ",
            "e edit   ",
            "x delete   ",
            "f focus   ",
            "m mini   ",
            "q quit",
        ],
        (UiMode::Normal, Screen::Focus(_)) => &[
            " Enter start/stop   ",
            "s stop   ",
            "m mini   ",
            "Esc back   ",
            "q quit",
        ],
        (UiMode::Normal, Screen::Mini) => &[
            " Enter start/stop   ",
            "s stop   ",
            "f focus   ",
            "Esc back   ",
            "q quit",
        ],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, screen: Screen, ui_mode: UiMode, area: Rect) {
    let spans: Vec<Span> = hints(screen, ui_mode).iter().map(|h| Span::raw(*h)).collect();
    let paragraph = Paragraph::new(Line::from(spans)).style(hint_style());
    f.render_widget(paragraph, area);
}
