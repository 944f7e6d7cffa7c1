use uuid::Uuid;

/// A named countdown in the user's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique ID, generated at creation and never changed
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Configured duration in seconds
    pub total_seconds: i64,
    /// Countdown state in seconds; negative while in overtime
    pub remaining_seconds: i64,
    /// Whether the countdown loop is currently servicing this task
    pub is_running: bool,
    /// Whether the user has checked the task off
    pub is_completed: bool,
    /// Display position; dense 0..N-1 after every reorder
    pub sort_order: i64,
}

impl Task {
    /// Create a fresh task with the full duration remaining
    pub fn new(name: String, total_seconds: i64, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            total_seconds,
            remaining_seconds: total_seconds,
            is_running: false,
            is_completed: false,
            sort_order,
        }
    }

    /// Rename and re-time the task; the countdown restarts from the new duration
    pub fn edit(&mut self, name: String, total_seconds: i64) {
        self.name = name;
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
    }

    /// Flip completion. A completed task is never running.
    pub fn toggle_completion(&mut self) {
        self.is_completed = !self.is_completed;
        if self.is_completed {
            self.is_running = false;
        }
    }

    pub fn is_overtime(&self) -> bool {
        self.remaining_seconds < 0
    }

    /// Time already spent on the task, never negative
    pub fn elapsed_seconds(&self) -> i64 {
        self.total_seconds.saturating_sub(self.remaining_seconds).max(0)
    }

    /// Remaining time clamped at zero (overtime counts as nothing left)
    pub fn outstanding_seconds(&self) -> i64 {
        self.remaining_seconds.max(0)
    }

    /// Fraction of the countdown still left (1.0 = untouched, 0.0 = done or overtime)
    pub fn progress_ratio(&self) -> f64 {
        if self.total_seconds > 0 && !self.is_overtime() {
            self.remaining_seconds as f64 / self.total_seconds as f64
        } else {
            0.0
        }
    }
}
