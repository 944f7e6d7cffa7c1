use crate::app::AppState;
use crate::domain::{
    format_duration, list_rows, predicted_finish_time, status_glyph, time_remaining_today, ListRow,
    Task,
};
use crate::ui::styles::{
    border_style, default_style, done_style, muted_style, overtime_style, running_style,
    selected_style, title_style,
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Summary line: total time left today and when the last task would finish
fn summary_line(tasks: &[Task], now: DateTime<Local>) -> Line<'static> {
    let remaining = time_remaining_today(tasks);
    Line::from(vec![
        Span::styled("Time Remaining Today: ", title_style()),
        Span::raw(format_duration(remaining)),
        Span::raw("   "),
        Span::styled("Finish by: ", title_style()),
        Span::raw(predicted_finish_time(now, remaining)),
    ])
}

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let now = Local::now();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" Today's Tasks ({}) ", now.format("%a %b %d")),
            title_style(),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Summary
            Constraint::Length(1), // Spacing
            Constraint::Min(0),    // Rows
        ])
        .split(inner);

    f.render_widget(Paragraph::new(summary_line(&app.tasks, now)), chunks[0]);

    if app.tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press 'a' to add one.").style(muted_style());
        f.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = list_rows(&app.tasks)
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let line = create_task_line(row, now, app.use_emoji);
            let style = if idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items), chunks[2]);
}

/// Create a single line for a task
/// Format: ⏳ Write proposal  12:34 left  (3:00 spent)  • Finish by 15:40
fn create_task_line(row: &ListRow<'_>, now: DateTime<Local>, use_emoji: bool) -> Line<'static> {
    let task = row.task;
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("{} ", status_glyph(task, use_emoji))));

    let name_style = if task.is_completed {
        done_style()
    } else if task.is_running {
        running_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(task.name.clone(), name_style));
    spans.push(Span::raw("  ".to_string()));

    if task.is_completed {
        return Line::from(spans);
    }

    let remaining_style = if task.is_overtime() {
        overtime_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(
        format!("{} left", format_duration(task.remaining_seconds)),
        remaining_style,
    ));

    let elapsed = task.elapsed_seconds();
    if elapsed > 0 {
        spans.push(Span::styled(
            format!("  ({} spent)", format_duration(elapsed)),
            muted_style(),
        ));
    }

    if let Some(offset) = row.finish_offset {
        spans.push(Span::styled(
            format!("  • Finish by {}", predicted_finish_time(now, offset)),
            muted_style(),
        ));
    }

    Line::from(spans)
}
