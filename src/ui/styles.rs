use ratatui::style::{Color, Modifier, Style};

// Focusly palette: a calm blue base, green for time ticking away, amber
// once it runs out.
const INK: Color = Color::Rgb(220, 223, 228);
const DIM: Color = Color::Rgb(120, 126, 138);
const FAINT: Color = Color::Rgb(78, 84, 96);
const ACCENT: Color = Color::Rgb(97, 175, 239);
const TICKING: Color = Color::Rgb(152, 195, 121);
const LATE: Color = Color::Rgb(229, 152, 75);
const ALARM: Color = Color::Rgb(224, 108, 117);
const PANEL: Color = Color::Rgb(40, 44, 52);

pub fn default_style() -> Style {
    Style::default().fg(INK)
}

/// Cursor row in the task list
pub fn selected_style() -> Style {
    Style::default().fg(PANEL).bg(ACCENT)
}

/// The task whose countdown is live
pub fn running_style() -> Style {
    Style::default().fg(TICKING).add_modifier(Modifier::BOLD)
}

/// Remaining time has gone negative
pub fn overtime_style() -> Style {
    Style::default().fg(LATE).add_modifier(Modifier::BOLD)
}

pub fn done_style() -> Style {
    Style::default()
        .fg(FAINT)
        .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
}

/// Elapsed and finish-by figures next to each task
pub fn muted_style() -> Style {
    Style::default().fg(DIM)
}

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_style() -> Style {
    Style::default().fg(FAINT)
}

/// Editor dialog body
pub fn modal_bg_style() -> Style {
    Style::default().bg(PANEL).fg(INK)
}

pub fn modal_title_style() -> Style {
    Style::default().fg(TICKING).add_modifier(Modifier::BOLD)
}

pub fn hint_style() -> Style {
    Style::default().fg(DIM).add_modifier(Modifier::ITALIC)
}

/// Focus view progress bar: filled part is time already spent
pub fn gauge_style() -> Style {
    Style::default().fg(ACCENT).bg(PANEL)
}

pub fn error_style() -> Style {
    Style::default().fg(ALARM).add_modifier(Modifier::BOLD)
}
