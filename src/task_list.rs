use crate::domain::Task;
use crate::persistence::{StoreResult, TaskStore};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Owns the user-facing list intents and republishes the live task list
///
/// Every command is a plain store write; observers pick up the result from
/// the snapshot feed rather than from the return value. Commands aimed at a
/// task that has vanished are silent no-ops. The running flag is never set
/// here; that belongs to the session manager.
pub struct TaskList {
    store: Arc<TaskStore>,
    snapshots: watch::Receiver<Vec<Task>>,
}

impl TaskList {
    pub fn new(store: Arc<TaskStore>) -> Self {
        let snapshots = store.subscribe();
        Self { store, snapshots }
    }

    /// Latest ordered snapshot of every task
    pub fn tasks(&self) -> Vec<Task> {
        self.snapshots.borrow().clone()
    }

    /// Append a task to the end of the list; non-positive durations are ignored
    pub fn add_task(&self, name: &str, duration_seconds: i64) -> StoreResult<Option<Uuid>> {
        if duration_seconds <= 0 {
            return Ok(None);
        }
        let task = Task::new(name.to_string(), duration_seconds, self.store.next_sort_order()?);
        self.store.insert(&task)?;
        tracing::info!(task_id = %task.id, name = %task.name, duration_seconds, "task added");
        Ok(Some(task.id))
    }

    /// Rename and re-time a task, restarting its countdown from the new duration
    pub fn edit_task(&self, id: Uuid, name: &str, duration_seconds: i64) -> StoreResult<()> {
        let Some(mut task) = self.store.get(id)? else {
            return Ok(());
        };
        task.edit(name.to_string(), duration_seconds);
        self.store.update(&task)?;
        tracing::info!(task_id = %id, duration_seconds, "task edited");
        Ok(())
    }

    /// Remove a task. A session servicing it notices on its next tick.
    pub fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        if self.store.delete(id)? {
            tracing::info!(task_id = %id, "task deleted");
        }
        Ok(())
    }

    /// Flip completion; marking complete also clears the running flag on the row
    pub fn toggle_completion(&self, id: Uuid) -> StoreResult<()> {
        let Some(mut task) = self.store.get(id)? else {
            return Ok(());
        };
        task.toggle_completion();
        self.store.update(&task)?;
        tracing::info!(task_id = %id, completed = task.is_completed, "task completion toggled");
        Ok(())
    }

    /// Rewrite `sort_order` densely (0..N-1) to follow `ordered_ids`
    ///
    /// Ids that no longer exist are skipped; no other field changes.
    pub fn reorder(&self, ordered_ids: &[Uuid]) -> StoreResult<()> {
        let mut reordered = Vec::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if self.store.get(*id)?.is_some() {
                reordered.push((*id, reordered.len() as i64));
            }
        }
        self.store.set_sort_orders(&reordered)?;
        tracing::debug!(count = reordered.len(), "tasks reordered");
        Ok(())
    }
}
