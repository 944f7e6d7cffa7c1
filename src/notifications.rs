//! Session indicator and desktop notifications
//! Desktop notifications are only implemented on macOS

use crate::domain::{format_duration, Task};
use parking_lot::Mutex;
#[cfg(target_os = "macos")]
use std::process::Command;
use uuid::Uuid;

/// Always-visible signal that a countdown is running
///
/// `update` is called on every tick while a session is live; `release` is
/// called exactly when the session ends, whatever the reason.
pub trait SessionIndicator: Send + Sync {
    fn update(&self, task: &Task);
    fn release(&self);
}

/// What the status bar shows for the running task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorView {
    pub task_id: Uuid,
    pub title: String,
    pub time_text: String,
    pub overtime: bool,
}

impl IndicatorView {
    pub fn from_task(task: &Task) -> Self {
        let title = if task.is_overtime() {
            format!("{} (Overtime!)", task.name)
        } else {
            task.name.clone()
        };
        Self {
            task_id: task.id,
            title,
            time_text: format!("Time: {}", format_duration(task.remaining_seconds)),
            overtime: task.is_overtime(),
        }
    }
}

#[derive(Debug, Default)]
struct IndicatorState {
    view: Option<IndicatorView>,
    /// Task we already announced overtime for
    overtime_announced: Option<Uuid>,
}

/// Indicator backing the TUI status bar and the headless host output
#[derive(Debug, Default)]
pub struct StatusIndicator {
    state: Mutex<IndicatorState>,
    desktop_alerts: bool,
}

impl StatusIndicator {
    pub fn new(desktop_alerts: bool) -> Self {
        Self {
            state: Mutex::new(IndicatorState::default()),
            desktop_alerts,
        }
    }

    /// Current view, None when no session holds the indicator
    pub fn current(&self) -> Option<IndicatorView> {
        self.state.lock().view.clone()
    }
}

impl SessionIndicator for StatusIndicator {
    fn update(&self, task: &Task) {
        let view = IndicatorView::from_task(task);
        let announce = {
            let mut state = self.state.lock();
            let announce = view.overtime && state.overtime_announced != Some(task.id);
            if announce {
                state.overtime_announced = Some(task.id);
            }
            state.view = Some(view);
            announce
        };

        if announce {
            tracing::info!(task_id = %task.id, "task entered overtime");
            if self.desktop_alerts {
                notify_overtime(&task.name);
            }
        }
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.view = None;
        state.overtime_announced = None;
    }
}

/// Send a notification when a running task runs out of time
pub fn notify_overtime(task_name: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "⏰ {}" with title "Focusly - Time's up""#,
            task_name.replace('"', "\\\"")
        );

        let _ = Command::new("osascript").arg("-e").arg(&script).output();
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = task_name;
    }
}
