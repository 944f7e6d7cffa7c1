use crate::app::AppState;
use crate::domain::{format_duration, predicted_finish_time, Task};
use crate::ui::styles::{
    border_style, default_style, gauge_style, muted_style, overtime_style, running_style,
    title_style,
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Gauge percentage for the remaining share of a task
fn remaining_percent(task: &Task) -> u16 {
    (task.progress_ratio() * 100.0).round().clamp(0.0, 100.0) as u16
}

fn detail_lines(task: &Task, now: DateTime<Local>) -> Vec<Line<'static>> {
    let finish = if task.is_completed {
        "Completed".to_string()
    } else {
        predicted_finish_time(now, task.outstanding_seconds())
    };

    vec![
        Line::from(Span::styled(task.name.clone(), title_style())),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Finish by: ", muted_style()),
            Span::raw(finish),
        ]),
        Line::from(vec![
            Span::styled("Elapsed:   ", muted_style()),
            Span::raw(format_duration(task.elapsed_seconds())),
        ]),
    ]
}

fn remaining_line(task: &Task) -> Line<'static> {
    let style = if task.is_overtime() {
        overtime_style()
    } else if task.is_running {
        running_style()
    } else {
        default_style()
    };
    Line::from(Span::styled(format_duration(task.remaining_seconds), style))
}

/// Render the full-screen focus view for one task
pub fn render_focus_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Focus ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(task) = app.focused_task() else {
        f.render_widget(Paragraph::new("Task no longer exists"), inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Name, finish, elapsed
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Remaining time
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Gauge
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(detail_lines(task, Local::now())).alignment(Alignment::Center),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(remaining_line(task)).alignment(Alignment::Center),
        chunks[2],
    );

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(remaining_percent(task))
        .label("");
    f.render_widget(gauge, chunks[4]);
}
