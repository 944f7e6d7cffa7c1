use crate::app::AppState;
use crate::notifications::IndicatorView;
use crate::ui::styles::{error_style, hint_style, overtime_style, running_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Spans for the session indicator, or an idle hint
fn indicator_spans(view: Option<&IndicatorView>) -> Vec<Span<'static>> {
    match view {
        Some(view) => {
            let style = if view.overtime {
                overtime_style()
            } else {
                running_style()
            };
            vec![
                Span::styled(format!(" ⏱ {} ", view.title), style),
                Span::styled(view.time_text.clone(), style),
                Span::styled("  [s] stop".to_string(), hint_style()),
            ]
        }
        None => vec![Span::styled(" No Running Task".to_string(), hint_style())],
    }
}

/// Render the status bar: running task indicator plus the last message
pub fn render_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let view = app.indicator_view();
    let mut spans = indicator_spans(view.as_ref());

    if let Some(message) = &app.status_message {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(message.clone(), error_style()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_indicator_spans() {
        assert_eq!(text(&indicator_spans(None)), " No Running Task");

        let view = IndicatorView {
            task_id: Uuid::new_v4(),
            title: "Write (Overtime!)".to_string(),
            time_text: "Time: -00:05".to_string(),
            overtime: true,
        };
        let spans = indicator_spans(Some(&view));
        assert!(text(&spans).contains("Write (Overtime!) Time: -00:05"));
        assert_eq!(spans[1].style, overtime_style());
    }
}
