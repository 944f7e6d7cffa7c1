use crate::domain::{running_task, to_hms, EditorField, Screen, Task, UiMode};
use crate::notifications::{IndicatorView, StatusIndicator};
use crate::session::SessionManager;
use crate::task_list::TaskList;
use std::fmt::Display;
use std::sync::Arc;
use uuid::Uuid;

/// Editor dialog state for adding or editing a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub name: String,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub field: EditorField,
    /// Task being edited; None when adding
    pub editing: Option<Uuid>,
}

impl EditorState {
    fn empty() -> Self {
        Self {
            name: String::new(),
            hours: 0,
            minutes: 0,
            seconds: 0,
            field: EditorField::Name,
            editing: None,
        }
    }

    fn for_task(task: &Task) -> Self {
        let (hours, minutes, seconds) = to_hms(task.remaining_seconds.max(0));
        Self {
            name: task.name.clone(),
            hours: hours.min(23) as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
            field: EditorField::Name,
            editing: Some(task.id),
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds)
    }

    /// Turn the focused wheel by `delta` positions, wrapping around
    pub fn roll(&mut self, delta: i32) {
        let Some(size) = self.field.wheel_size() else {
            return;
        };
        let value = match self.field {
            EditorField::Hours => &mut self.hours,
            EditorField::Minutes => &mut self.minutes,
            EditorField::Seconds => &mut self.seconds,
            EditorField::Name => return,
        };
        *value = (i64::from(*value) + i64::from(delta)).rem_euclid(i64::from(size)) as u32;
    }
}

/// Main application state
pub struct AppState {
    pub tasks: Vec<Task>,
    pub selected_index: usize,
    pub screen: Screen,
    pub ui_mode: UiMode,
    pub editor: Option<EditorState>,
    pub status_message: Option<String>,
    pub use_emoji: bool,
    task_list: TaskList,
    session: SessionManager,
    indicator: Arc<StatusIndicator>,
}

impl AppState {
    pub fn new(
        task_list: TaskList,
        session: SessionManager,
        indicator: Arc<StatusIndicator>,
        use_emoji: bool,
    ) -> Self {
        let tasks = task_list.tasks();
        Self {
            tasks,
            selected_index: 0,
            screen: Screen::List,
            ui_mode: UiMode::Normal,
            editor: None,
            status_message: None,
            use_emoji,
            task_list,
            session,
            indicator,
        }
    }

    /// Pick up the latest task snapshot
    pub fn refresh(&mut self) {
        self.tasks = self.task_list.tasks();

        if !self.tasks.is_empty() && self.selected_index >= self.tasks.len() {
            self.selected_index = self.tasks.len() - 1;
        }

        if let Screen::Focus(id) = self.screen {
            if !self.tasks.iter().any(|t| t.id == id) {
                self.screen = Screen::List;
            }
        }
    }

    /// Resume a session left running by a previous run
    pub async fn resume(&mut self) {
        match self.session.resume().await {
            Ok(true) => self.status_message = Some("Resumed running task".to_string()),
            Ok(false) => {}
            Err(e) => self.report_error("Failed to resume session", e),
        }
        self.refresh();
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected_index)
    }

    /// The task the session is counting down, as of the last snapshot
    pub fn running_task(&self) -> Option<&Task> {
        match self.session.running_task_id() {
            Some(id) => self.tasks.iter().find(|t| t.id == id),
            None => running_task(&self.tasks),
        }
    }

    /// What the status bar shows for the session, if one is live
    pub fn indicator_view(&self) -> Option<IndicatorView> {
        self.indicator.current()
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.tasks.len() {
            self.selected_index += 1;
        }
    }

    /// Move the selected task up one place in the list
    pub fn move_task_up(&mut self) {
        if self.selected_index > 0 && self.selected_index < self.tasks.len() {
            self.swap_and_reorder(self.selected_index, self.selected_index - 1);
        }
    }

    /// Move the selected task down one place in the list
    pub fn move_task_down(&mut self) {
        if self.selected_index + 1 < self.tasks.len() {
            self.swap_and_reorder(self.selected_index, self.selected_index + 1);
        }
    }

    fn swap_and_reorder(&mut self, from: usize, to: usize) {
        let mut ids: Vec<Uuid> = self.tasks.iter().map(|t| t.id).collect();
        ids.swap(from, to);
        match self.task_list.reorder(&ids) {
            Ok(()) => {
                self.selected_index = to;
                self.refresh();
            }
            Err(e) => self.report_error("Failed to reorder tasks", e),
        }
    }

    /// Start or stop the selected task
    ///
    /// Starting a task while another one runs stops the other one first.
    pub async fn toggle_running(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        self.toggle_running_for(task.id).await;
    }

    pub async fn toggle_running_for(&mut self, id: Uuid) {
        let Some(task) = self.tasks.iter().find(|t| t.id == id).cloned() else {
            return;
        };

        let current = self.session.running_task_id();
        if current == Some(id) || (current.is_none() && task.is_running) {
            self.session.stop().await;
            self.refresh();
            return;
        }

        if task.is_completed {
            self.status_message = Some("Task is already completed".to_string());
            return;
        }

        if current.is_some() || running_task(&self.tasks).is_some() {
            self.session.stop().await;
        }

        match self.session.start(id).await {
            Ok(true) => self.status_message = None,
            Ok(false) => self.status_message = Some("Task can no longer be started".to_string()),
            Err(e) => self.report_error("Failed to start task", e),
        }
        self.refresh();
    }

    /// Stop whatever is running
    pub async fn stop_running(&mut self) {
        self.session.stop().await;
        self.refresh();
    }

    /// Toggle completion of the selected task, stopping it first if it runs
    pub async fn toggle_completion(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };

        if self.session.running_task_id() == Some(task.id) || task.is_running {
            self.session.stop().await;
        }

        if let Err(e) = self.task_list.toggle_completion(task.id) {
            self.report_error("Failed to update task", e);
        }
        self.refresh();
    }

    /// Delete the selected task; a running session notices on its next tick
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        if let Err(e) = self.task_list.delete_task(id) {
            self.report_error("Failed to delete task", e);
        }
        self.refresh();
    }

    /// Open the editor for a new task
    pub fn start_add_task(&mut self) {
        self.editor = Some(EditorState::empty());
        self.ui_mode = UiMode::AddingTask;
    }

    /// Open the editor pre-filled from the selected task
    pub fn start_edit_task(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.is_running || self.session.running_task_id() == Some(task.id) {
            self.status_message = Some("Stop the task before editing it".to_string());
            return;
        }
        self.editor = Some(EditorState::for_task(task));
        self.ui_mode = UiMode::EditingTask;
    }

    pub fn editor_next_field(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.field = editor.field.next();
        }
    }

    pub fn editor_prev_field(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.field = editor.field.prev();
        }
    }

    pub fn editor_roll(&mut self, delta: i32) {
        if let Some(editor) = &mut self.editor {
            editor.roll(delta);
        }
    }

    /// Type into the name field, or set a wheel from a digit
    pub fn editor_add_char(&mut self, c: char) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        match editor.field {
            EditorField::Name => editor.name.push(c),
            field => {
                if let (Some(digit), Some(size)) = (c.to_digit(10), field.wheel_size()) {
                    let value = match field {
                        EditorField::Hours => &mut editor.hours,
                        EditorField::Minutes => &mut editor.minutes,
                        _ => &mut editor.seconds,
                    };
                    let typed = (*value % 10) * 10 + digit;
                    *value = if typed < size { typed } else { digit };
                }
            }
        }
    }

    pub fn editor_backspace(&mut self) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        match editor.field {
            EditorField::Name => {
                editor.name.pop();
            }
            EditorField::Hours => editor.hours /= 10,
            EditorField::Minutes => editor.minutes /= 10,
            EditorField::Seconds => editor.seconds /= 10,
        }
    }

    /// Confirm the editor; refused (dialog stays open) for a blank name or zero duration
    pub fn submit_editor(&mut self) {
        let Some(editor) = &self.editor else {
            return;
        };

        let name = editor.name.trim().to_string();
        if name.is_empty() {
            self.status_message = Some("Task name cannot be empty".to_string());
            return;
        }
        let duration = editor.duration_seconds();
        if duration <= 0 {
            self.status_message = Some("Duration must be longer than zero".to_string());
            return;
        }

        let result = match editor.editing {
            Some(id) => self.task_list.edit_task(id, &name, duration),
            None => self.task_list.add_task(&name, duration).map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.editor = None;
                self.ui_mode = UiMode::Normal;
                self.status_message = None;
                self.refresh();
            }
            Err(e) => self.report_error("Failed to save task", e),
        }
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Show the focus view for the selected task
    pub fn enter_focus(&mut self) {
        if let Some(task) = self.selected_task() {
            self.screen = Screen::Focus(task.id);
        }
    }

    pub fn enter_mini(&mut self) {
        self.screen = Screen::Mini;
    }

    pub fn back_to_list(&mut self) {
        self.screen = Screen::List;
    }

    /// The task shown by the focus view
    pub fn focused_task(&self) -> Option<&Task> {
        match self.screen {
            Screen::Focus(id) => self.tasks.iter().find(|t| t.id == id),
            _ => None,
        }
    }

    fn report_error(&mut self, context: &str, error: impl Display) {
        tracing::error!(error = %error, "{}", context);
        self.status_message = Some(format!("{}: {}", context, error));
    }
}
