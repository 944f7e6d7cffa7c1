use crate::notifications::SessionIndicator;
use crate::persistence::{RunningTaskPointer, StoreError, TaskStore};
use crate::ticker::{session_tick, Clock};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Errors that keep a session from starting
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The running-task pointer could not be written
    #[error("failed to record running task: {0}")]
    Pointer(#[source] StoreError),

    /// The task table could not be read or written
    #[error("task store error: {0}")]
    Store(#[from] StoreError),
}

/// One continuous countdown of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSession {
    pub task_id: Uuid,
    /// Wall-clock instant the session began
    pub started_at: DateTime<Utc>,
    /// The task's remaining seconds when the session began
    pub remaining_at_start: i64,
}

impl ActiveSession {
    /// Remaining seconds at `now`, from whole seconds elapsed since the start
    pub fn remaining_at(&self, now: DateTime<Utc>) -> i64 {
        let elapsed_ms = (now - self.started_at).num_milliseconds();
        self.remaining_at_start.saturating_sub(elapsed_ms.div_euclid(1000))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running(ActiveSession),
}

impl SessionState {
    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Running(session) => Some(session.task_id),
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continued,
    Stopped,
}

/// State shared between the manager and its tick loop
struct Shared {
    store: Arc<TaskStore>,
    pointer: RunningTaskPointer,
    clock: Arc<dyn Clock>,
    indicator: Arc<dyn SessionIndicator>,
    state: Mutex<SessionState>,
}

impl Shared {
    fn tick(&self) -> TickOutcome {
        let session = match *self.state.lock() {
            SessionState::Running(session) => session,
            SessionState::Idle => return TickOutcome::Stopped,
        };

        let mut task = match self.store.get(session.task_id) {
            Ok(Some(task)) if !task.is_completed => task,
            Ok(_) => {
                tracing::info!(task_id = %session.task_id, "running task gone or completed, stopping session");
                self.end_session(Some(session.task_id));
                return TickOutcome::Stopped;
            }
            Err(e) => {
                tracing::warn!(task_id = %session.task_id, error = %e, "tick failed to read task");
                return TickOutcome::Continued;
            }
        };

        let remaining = session.remaining_at(self.clock.now());
        if remaining != task.remaining_seconds {
            match self.store.set_remaining(task.id, remaining) {
                Ok(_) => {
                    tracing::debug!(task_id = %task.id, remaining, "remaining time persisted");
                    task.remaining_seconds = remaining;
                }
                Err(e) => {
                    tracing::warn!(task_id = %task.id, error = %e, "tick failed to persist remaining time");
                }
            }
        }

        self.indicator.update(&task);
        TickOutcome::Continued
    }

    /// Go idle, clear the pointer, drop the running flag and release the indicator
    ///
    /// With `expected` set, nothing happens unless that task is the active
    /// one. With no in-memory session the persisted pointer names the task.
    /// Returns the task that was running, if any.
    fn end_session(&self, expected: Option<Uuid>) -> Option<Uuid> {
        let previous = {
            let mut state = self.state.lock();
            if expected.is_some() && state.task_id() != expected {
                return None;
            }
            std::mem::replace(&mut *state, SessionState::Idle)
        };

        let task_id = previous.task_id().or_else(|| match self.pointer.load() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "could not read running-task pointer");
                None
            }
        });

        if let Err(e) = self.pointer.clear() {
            tracing::warn!(error = %e, "failed to clear running-task pointer");
        }

        if let Some(id) = task_id {
            if let Err(e) = self.store.set_running(id, false) {
                tracing::error!(task_id = %id, error = %e, "failed to mark task as not running");
            }
        }

        self.indicator.release();
        task_id
    }

    /// Clear the running flag on every row except `keep`
    fn clear_stale_running(&self, keep: Option<Uuid>) -> Result<(), StoreError> {
        for id in self.store.running_ids()? {
            if Some(id) != keep {
                tracing::warn!(task_id = %id, "clearing stale running flag");
                self.store.set_running(id, false)?;
            }
        }
        Ok(())
    }
}

async fn run_tick_loop(shared: Arc<Shared>) {
    let mut interval = tokio::time::interval(session_tick());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if shared.tick() == TickOutcome::Stopped {
            break;
        }
    }
}

/// Owner of the single countdown session
///
/// This is the only component that sets a task's running flag. It keeps
/// the flag, the running-task pointer and its own state in agreement, and
/// runs at most one tick loop at a time. Remaining time is always derived
/// from wall-clock time since the session started, so late or missed ticks
/// never cause drift. Callers stop the current session before starting a
/// different task.
pub struct SessionManager {
    shared: Arc<Shared>,
    tick_loop: Option<JoinHandle<()>>,
}

impl SessionManager {
    pub fn new(
        store: Arc<TaskStore>,
        pointer: RunningTaskPointer,
        clock: Arc<dyn Clock>,
        indicator: Arc<dyn SessionIndicator>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                pointer,
                clock,
                indicator,
                state: Mutex::new(SessionState::Idle),
            }),
            tick_loop: None,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.shared.state.lock()
    }

    /// The task currently counting down, if any
    pub fn running_task_id(&self) -> Option<Uuid> {
        self.state().task_id()
    }

    /// Whether a tick loop is still alive
    pub fn is_ticking(&self) -> bool {
        self.tick_loop.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Start counting down `task_id`
    ///
    /// Returns `Ok(false)` if the task is missing or completed, in which
    /// case the manager ends up idle with nothing marked running.
    pub async fn start(&mut self, task_id: Uuid) -> Result<bool, SessionError> {
        self.cancel_loop().await;

        if let Err(e) = self.shared.pointer.save(task_id) {
            self.shared.end_session(None);
            return Err(SessionError::Pointer(e));
        }

        let mut task = match self.shared.store.get(task_id) {
            Ok(Some(task)) if !task.is_completed => task,
            Ok(_) => {
                tracing::info!(%task_id, "task missing or completed, session not started");
                self.shared.end_session(None);
                return Ok(false);
            }
            Err(e) => {
                self.shared.end_session(None);
                return Err(e.into());
            }
        };

        if let Err(e) = self.shared.clear_stale_running(Some(task_id)) {
            tracing::warn!(error = %e, "failed to reconcile running flags");
        }

        *self.shared.state.lock() = SessionState::Running(ActiveSession {
            task_id,
            started_at: self.shared.clock.now(),
            remaining_at_start: task.remaining_seconds,
        });

        match self.shared.store.set_running(task_id, true) {
            Ok(_) => {}
            Err(e) => {
                self.shared.end_session(Some(task_id));
                return Err(e.into());
            }
        }

        // Deleted or completed between the read and the write
        match self.shared.store.get(task_id) {
            Ok(Some(current)) if !current.is_completed => task = current,
            Ok(_) => {
                tracing::info!(%task_id, "task vanished while starting, session not started");
                self.shared.end_session(Some(task_id));
                return Ok(false);
            }
            Err(e) => {
                self.shared.end_session(Some(task_id));
                return Err(e.into());
            }
        }

        self.shared.indicator.update(&task);
        tracing::info!(%task_id, remaining = task.remaining_seconds, "session started");

        self.tick_loop = Some(tokio::spawn(run_tick_loop(Arc::clone(&self.shared))));
        Ok(true)
    }

    /// Stop the session, if any. Idempotent.
    pub async fn stop(&mut self) {
        self.cancel_loop().await;
        if let Some(task_id) = self.shared.end_session(None) {
            tracing::info!(%task_id, "session stopped");
        }
    }

    /// Pick up the task named by the running-task pointer after a restart
    ///
    /// Time that passed while no loop was alive is not counted. Returns
    /// `Ok(false)` when there was nothing to resume.
    pub async fn resume(&mut self) -> Result<bool, SessionError> {
        let pointed = match self.shared.pointer.load() {
            Ok(pointed) => pointed,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable running-task pointer, discarding it");
                self.shared.pointer.clear().map_err(SessionError::Pointer)?;
                None
            }
        };

        match pointed {
            Some(task_id) => {
                tracing::info!(%task_id, "resuming session");
                self.start(task_id).await
            }
            None => {
                self.shared.clear_stale_running(None)?;
                Ok(false)
            }
        }
    }

    /// Run one tick right now
    pub fn tick(&self) -> TickOutcome {
        self.shared.tick()
    }

    async fn cancel_loop(&mut self) {
        if let Some(handle) = self.tick_loop.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let Some(handle) = self.tick_loop.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use crate::notifications::StatusIndicator;
    use crate::task_list::TaskList;
    use crate::ticker::ManualClock;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: Arc<TaskStore>,
        pointer: RunningTaskPointer,
        clock: Arc<ManualClock>,
        indicator: Arc<StatusIndicator>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let pointer = RunningTaskPointer::new(dir.path().join("running_task.json"));
            Self {
                _dir: dir,
                store: Arc::new(TaskStore::open_in_memory().unwrap()),
                pointer,
                clock: Arc::new(ManualClock::new(Utc::now())),
                indicator: Arc::new(StatusIndicator::new(false)),
            }
        }

        /// File-backed store, pointer kept in its own `state/` directory
        fn on_disk() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join("state")).unwrap();
            let pointer = RunningTaskPointer::new(dir.path().join("state").join("running_task.json"));
            let store = TaskStore::open(dir.path().join("tasks.db")).unwrap();
            Self {
                _dir: dir,
                store: Arc::new(store),
                pointer,
                clock: Arc::new(ManualClock::new(Utc::now())),
                indicator: Arc::new(StatusIndicator::new(false)),
            }
        }

        fn manager(&self) -> SessionManager {
            SessionManager::new(
                Arc::clone(&self.store),
                self.pointer.clone(),
                self.clock.clone(),
                self.indicator.clone(),
            )
        }

        fn add(&self, name: &str, seconds: i64) -> Uuid {
            let task = Task::new(name.to_string(), seconds, self.store.next_sort_order().unwrap());
            self.store.insert(&task).unwrap();
            task.id
        }

        fn task(&self, id: Uuid) -> Task {
            self.store.get(id).unwrap().unwrap()
        }

        fn assert_at_most_one_running(&self) {
            let running = self.store.running_ids().unwrap();
            assert!(running.len() <= 1, "running tasks: {:?}", running);
        }
    }

    #[test]
    fn test_remaining_uses_whole_seconds() {
        let start = Utc::now();
        let session = ActiveSession {
            task_id: Uuid::new_v4(),
            started_at: start,
            remaining_at_start: 10,
        };
        assert_eq!(session.remaining_at(start), 10);
        assert_eq!(session.remaining_at(start + chrono::Duration::milliseconds(999)), 10);
        assert_eq!(session.remaining_at(start + chrono::Duration::milliseconds(1000)), 9);
        assert_eq!(session.remaining_at(start + chrono::Duration::seconds(25)), -15);
    }

    #[tokio::test]
    async fn test_start_marks_running_and_records_pointer() {
        let fx = Fixture::new();
        let id = fx.add("Write", 600);
        let mut manager = fx.manager();

        assert!(manager.start(id).await.unwrap());

        assert!(fx.task(id).is_running);
        assert_eq!(fx.pointer.load().unwrap(), Some(id));
        assert_eq!(manager.running_task_id(), Some(id));
        assert_eq!(fx.indicator.current().map(|v| v.task_id), Some(id));

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_countdown_follows_wall_clock_despite_late_ticks() {
        let fx = Fixture::new();
        let id = fx.add("Focus", 600);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();

        fx.clock.advance_secs(5);
        assert_eq!(manager.tick(), TickOutcome::Continued);
        assert_eq!(fx.task(id).remaining_seconds, 595);

        // A tick that fires late, with no ticks in between, still lands exactly
        fx.clock.advance_millis(3_400);
        fx.clock.advance_millis(4_500);
        manager.tick();
        assert_eq!(fx.task(id).remaining_seconds, 600 - 12);

        // Another tick within the same second writes nothing new
        fx.clock.advance_millis(50);
        manager.tick();
        assert_eq!(fx.task(id).remaining_seconds, 588);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_countdown_runs_into_overtime() {
        let fx = Fixture::new();
        let id = fx.add("Short", 3);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();

        fx.clock.advance_secs(10);
        manager.tick();

        assert_eq!(fx.task(id).remaining_seconds, -7);
        let view = fx.indicator.current().unwrap();
        assert!(view.overtime);
        assert_eq!(view.time_text, "Time: -00:07");

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_stop_clears_everything_and_is_idempotent() {
        let fx = Fixture::new();
        let id = fx.add("Read", 300);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();
        fx.clock.advance_secs(2);
        manager.tick();

        manager.stop().await;
        assert_eq!(manager.state(), SessionState::Idle);
        assert_eq!(fx.pointer.load().unwrap(), None);
        assert!(fx.indicator.current().is_none());
        let after_first = fx.task(id);
        assert!(!after_first.is_running);
        assert_eq!(after_first.remaining_seconds, 298);

        manager.stop().await;
        assert_eq!(fx.task(id), after_first);
        assert_eq!(fx.pointer.load().unwrap(), None);
        assert_eq!(manager.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_start_refuses_completed_or_missing_task() {
        let fx = Fixture::new();
        let id = fx.add("Done", 60);
        let mut done = fx.task(id);
        done.toggle_completion();
        fx.store.update(&done).unwrap();
        let mut manager = fx.manager();

        assert!(!manager.start(id).await.unwrap());
        assert!(!fx.task(id).is_running);
        assert_eq!(fx.pointer.load().unwrap(), None);
        assert_eq!(manager.state(), SessionState::Idle);

        assert!(!manager.start(Uuid::new_v4()).await.unwrap());
        assert_eq!(fx.pointer.load().unwrap(), None);
        assert!(!manager.is_ticking());
    }

    #[tokio::test]
    async fn test_tick_stops_when_task_completed() {
        let fx = Fixture::new();
        let list = TaskList::new(Arc::clone(&fx.store));
        let id = fx.add("Run", 60);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();

        list.toggle_completion(id).unwrap();
        assert_eq!(manager.tick(), TickOutcome::Stopped);

        assert_eq!(manager.state(), SessionState::Idle);
        assert_eq!(fx.pointer.load().unwrap(), None);
        assert!(!fx.task(id).is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_running_task_stops_loop_within_a_tick() {
        let fx = Fixture::new();
        let list = TaskList::new(Arc::clone(&fx.store));
        let id = fx.add("Doomed", 600);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();

        list.delete_task(id).unwrap();
        tokio::time::sleep(Duration::from_millis(1_100)).await;

        assert_eq!(manager.state(), SessionState::Idle);
        assert_eq!(fx.pointer.load().unwrap(), None);
        assert!(fx.indicator.current().is_none());
        assert!(!manager.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_persists_remaining_each_second() {
        let fx = Fixture::new();
        let id = fx.add("Loop", 100);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();

        // Stay half a period off the loop's schedule
        tokio::time::sleep(Duration::from_millis(500)).await;
        for _ in 0..3 {
            fx.clock.advance_secs(1);
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        assert_eq!(fx.task(id).remaining_seconds, 97);
        assert!(manager.is_ticking());

        manager.stop().await;
        assert!(!manager.is_ticking());

        // No writes after the loop is cancelled
        fx.clock.advance_secs(5);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fx.task(id).remaining_seconds, 97);
    }

    #[tokio::test]
    async fn test_resume_after_restart_ignores_dead_time() {
        let fx = Fixture::new();
        let id = fx.add("Survivor", 600);
        {
            let mut manager = fx.manager();
            manager.start(id).await.unwrap();
            fx.clock.advance_secs(10);
            manager.tick();
            // Process dies without stopping
        }
        assert_eq!(fx.task(id).remaining_seconds, 590);
        assert!(fx.task(id).is_running);

        // Time passes while nothing is alive
        fx.clock.advance_secs(300);

        let mut manager = fx.manager();
        assert!(manager.resume().await.unwrap());
        assert_eq!(manager.running_task_id(), Some(id));
        manager.tick();
        assert_eq!(fx.task(id).remaining_seconds, 590);

        fx.clock.advance_secs(4);
        manager.tick();
        assert_eq!(fx.task(id).remaining_seconds, 586);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_resume_without_pointer_clears_stale_flags() {
        let fx = Fixture::new();
        let id = fx.add("Stale", 60);
        fx.store.set_running(id, true).unwrap();

        let mut manager = fx.manager();
        assert!(!manager.resume().await.unwrap());
        assert!(!fx.task(id).is_running);
        assert_eq!(manager.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_resume_discards_corrupt_pointer() {
        let fx = Fixture::new();
        std::fs::write(fx.pointer.path(), "garbage").unwrap();

        let mut manager = fx.manager();
        assert!(!manager.resume().await.unwrap());
        assert!(!fx.pointer.path().exists());
    }

    #[tokio::test]
    async fn test_stop_cleans_up_even_when_writes_fail() {
        let fx = Fixture::on_disk();
        let id = fx.add("Fragile", 120);
        let mut manager = fx.manager();
        manager.start(id).await.unwrap();
        assert!(fx.indicator.current().is_some());

        // A directory where the pointer file was makes clearing it fail
        std::fs::remove_file(fx.pointer.path()).unwrap();
        std::fs::create_dir(fx.pointer.path()).unwrap();
        assert!(fx.pointer.clear().is_err());

        // Renaming the table away makes the running-flag write fail
        let other = rusqlite::Connection::open(fx._dir.path().join("tasks.db")).unwrap();
        other.execute_batch("ALTER TABLE tasks RENAME TO tasks_moved").unwrap();
        assert!(fx.store.set_running(id, false).is_err());

        manager.stop().await;

        assert_eq!(manager.state(), SessionState::Idle);
        assert!(fx.indicator.current().is_none());
        assert!(!manager.is_ticking());
    }

    #[tokio::test]
    async fn test_failed_pointer_save_leaves_manager_idle() {
        let fx = Fixture::on_disk();
        let a = fx.add("A", 60);
        let b = fx.add("B", 60);
        let mut manager = fx.manager();
        manager.start(a).await.unwrap();

        // Without its directory the pointer can no longer be written
        std::fs::remove_dir_all(fx.pointer.path().parent().unwrap()).unwrap();

        let result = manager.start(b).await;

        assert!(matches!(result, Err(SessionError::Pointer(_))));
        assert_eq!(manager.state(), SessionState::Idle);
        assert!(!manager.is_ticking());
        assert!(!fx.task(a).is_running);
        assert!(!fx.task(b).is_running);
        assert!(fx.indicator.current().is_none());
    }

    #[tokio::test]
    async fn test_stop_after_restart_uses_pointer() {
        let fx = Fixture::new();
        let id = fx.add("Orphan", 60);
        fx.store.set_running(id, true).unwrap();
        fx.pointer.save(id).unwrap();

        let mut manager = fx.manager();
        manager.stop().await;

        assert!(!fx.task(id).is_running);
        assert_eq!(fx.pointer.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_at_most_one_running_across_script() {
        let fx = Fixture::new();
        let list = TaskList::new(Arc::clone(&fx.store));
        let a = fx.add("A", 60);
        let b = fx.add("B", 60);
        let c = fx.add("C", 60);
        let mut manager = fx.manager();

        manager.start(a).await.unwrap();
        fx.assert_at_most_one_running();

        // Switching the polite way
        manager.stop().await;
        manager.start(b).await.unwrap();
        fx.assert_at_most_one_running();

        // Starting without stopping first still leaves one running row
        manager.start(c).await.unwrap();
        fx.assert_at_most_one_running();
        assert_eq!(fx.store.running_ids().unwrap(), vec![c]);

        list.toggle_completion(c).unwrap();
        fx.assert_at_most_one_running();
        manager.tick();
        assert_eq!(manager.state(), SessionState::Idle);

        manager.start(a).await.unwrap();
        list.delete_task(a).unwrap();
        fx.assert_at_most_one_running();
        manager.tick();
        fx.assert_at_most_one_running();

        manager.start(b).await.unwrap();
        manager.stop().await;
        manager.stop().await;
        assert!(fx.store.running_ids().unwrap().is_empty());
    }
}
