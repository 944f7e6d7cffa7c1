use super::task::Task;

/// A task together with the figures the list view shows for it
#[derive(Debug, Clone)]
pub struct ListRow<'a> {
    pub task: &'a Task,
    /// Seconds from now until this task would finish if worked in list order
    /// (None for completed tasks)
    pub finish_offset: Option<i64>,
}

/// Sum of non-negative remaining time over all incomplete tasks, saturating at `i64::MAX`
pub fn time_remaining_today(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .filter(|t| !t.is_completed)
        .map(Task::outstanding_seconds)
        .fold(0i64, i64::saturating_add)
}

/// Pair each task with its cumulative finish offset
///
/// The offset of an incomplete task is its own outstanding time plus that of
/// every incomplete task above it.
pub fn list_rows(tasks: &[Task]) -> Vec<ListRow<'_>> {
    let mut accumulated: i64 = 0;
    tasks
        .iter()
        .map(|task| {
            let finish_offset = if task.is_completed {
                None
            } else {
                accumulated = accumulated.saturating_add(task.outstanding_seconds());
                Some(accumulated)
            };
            ListRow { task, finish_offset }
        })
        .collect()
}

/// The task currently flagged as running, if any
pub fn running_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.is_running)
}

/// Status glyph for the list
pub fn status_glyph(task: &Task, use_emoji: bool) -> &'static str {
    match (task.is_completed, task.is_running, use_emoji) {
        (true, _, true) => "✅",
        (true, _, false) => "[x]",
        (false, true, true) => "⏳",
        (false, true, false) => "[>]",
        (false, false, true) => "⬜",
        (false, false, false) => "[ ]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, remaining: i64, completed: bool) -> Task {
        let mut t = Task::new(name.to_string(), remaining.max(0), 0);
        t.remaining_seconds = remaining;
        t.is_completed = completed;
        t
    }

    #[test]
    fn test_time_remaining_today_skips_completed_and_overtime() {
        let tasks = vec![
            task("A", 600, false),
            task("B", 300, true),
            task("C", -120, false),
            task("D", 60, false),
        ];
        assert_eq!(time_remaining_today(&tasks), 660);
    }

    #[test]
    fn test_list_rows_accumulate_in_order() {
        let tasks = vec![
            task("A", 600, false),
            task("B", 300, true),
            task("C", -120, false),
            task("D", 60, false),
        ];
        let offsets: Vec<Option<i64>> = list_rows(&tasks).iter().map(|r| r.finish_offset).collect();
        assert_eq!(offsets, vec![Some(600), None, Some(600), Some(660)]);
    }

    #[test]
    fn test_sums_saturate_on_huge_remainders() {
        let tasks = vec![task("Huge", i64::MAX, false), task("Small", 10, false)];
        assert_eq!(time_remaining_today(&tasks), i64::MAX);

        let offsets: Vec<Option<i64>> = list_rows(&tasks).iter().map(|r| r.finish_offset).collect();
        assert_eq!(offsets, vec![Some(i64::MAX), Some(i64::MAX)]);
    }

    #[test]
    fn test_running_task() {
        let mut tasks = vec![task("A", 10, false), task("B", 10, false)];
        assert!(running_task(&tasks).is_none());
        tasks[1].is_running = true;
        assert_eq!(running_task(&tasks).map(|t| t.name.as_str()), Some("B"));
    }

    #[test]
    fn test_status_glyph() {
        let mut t = task("A", 10, false);
        assert_eq!(status_glyph(&t, false), "[ ]");
        t.is_running = true;
        assert_eq!(status_glyph(&t, false), "[>]");
        t.is_completed = true;
        assert_eq!(status_glyph(&t, false), "[x]");
        assert_eq!(status_glyph(&t, true), "✅");
    }
}
