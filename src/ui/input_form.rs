use crate::app::{AppState, EditorState};
use crate::domain::EditorField;
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Style for one wheel, highlighted when focused
fn wheel_style(editor: &EditorState, field: EditorField) -> Style {
    if editor.field == field {
        modal_title_style().add_modifier(Modifier::REVERSED)
    } else {
        modal_title_style()
    }
}

fn form_lines(editor: &EditorState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Name field
    lines.push(Line::raw(""));
    let name_label = if editor.field == EditorField::Name {
        "Name: (editing)"
    } else {
        "Name:"
    };
    lines.push(Line::raw(name_label));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(editor.name.clone(), modal_title_style()),
        if editor.field == EditorField::Name {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]));
    lines.push(Line::raw(""));

    // Duration wheels
    lines.push(Line::raw("Duration (h : m : s):"));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(format!(" {:02} ", editor.hours), wheel_style(editor, EditorField::Hours)),
        Span::raw(":"),
        Span::styled(format!(" {:02} ", editor.minutes), wheel_style(editor, EditorField::Minutes)),
        Span::raw(":"),
        Span::styled(format!(" {:02} ", editor.seconds), wheel_style(editor, EditorField::Seconds)),
    ]));
    lines.push(Line::raw(""));

    // Instructions
    lines.push(Line::styled(
        "Tab to switch fields  ·  ↑/↓ to roll  ·  Enter to save  ·  Esc to cancel",
        hint_style(),
    ));

    lines
}

/// Render the editor dialog for adding or editing a task
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(editor) = &app.editor {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title_text = if editor.editing.is_some() {
            " Edit Task "
        } else {
            " Add Task "
        };

        let paragraph = Paragraph::new(form_lines(editor))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
