use crate::app::AppState;
use crate::domain::{format_duration, Task};
use crate::ui::{
    layout::centered_rect,
    styles::{border_style, muted_style, overtime_style, running_style, title_style},
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Lines for the compact view of the running task
fn mini_lines(task: Option<&Task>) -> Vec<Line<'static>> {
    match task {
        Some(task) => {
            let style = if task.is_overtime() {
                overtime_style()
            } else {
                running_style()
            };
            vec![
                Line::from(Span::styled(format_duration(task.remaining_seconds), style)),
                Line::from(Span::raw(task.name.clone())),
            ]
        }
        None => vec![
            Line::raw(""),
            Line::from(Span::styled("No Running Task", muted_style())),
        ],
    }
}

/// Render the small always-on view of whatever is running
pub fn render_mini_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let mini_area = centered_rect(area, 32, 4);
    f.render_widget(Clear, mini_area);

    let paragraph = Paragraph::new(mini_lines(app.running_task()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Mini ", title_style())),
        );
    f.render_widget(paragraph, mini_area);
}
