use super::error::StoreResult;
use super::files::atomic_write;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// On-disk shape of running_task.json
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PointerRecord {
    task_id: Uuid,
}

/// Durable record of which task the countdown loop should be servicing
///
/// Lives outside the task table so the loop can be resumed after the
/// process is killed without asking the UI.
#[derive(Debug, Clone)]
pub struct RunningTaskPointer {
    path: PathBuf,
}

impl RunningTaskPointer {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the pointer; a missing file means nothing is running
    pub fn load(&self) -> StoreResult<Option<Uuid>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: PointerRecord = serde_json::from_str(&content)?;
        Ok(Some(record.task_id))
    }

    /// Point at `task_id`
    pub fn save(&self, task_id: Uuid) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&PointerRecord { task_id })?;
        atomic_write(&self.path, &json)?;
        Ok(())
    }

    /// Forget the running task; no-op when already clear
    pub fn clear(&self) -> StoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_pointer() {
        let temp_dir = tempdir().unwrap();
        let pointer = RunningTaskPointer::new(temp_dir.path().join("running_task.json"));

        assert_eq!(pointer.load().unwrap(), None);
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = tempdir().unwrap();
        let pointer = RunningTaskPointer::new(temp_dir.path().join("running_task.json"));
        let id = Uuid::new_v4();

        pointer.save(id).unwrap();
        assert_eq!(pointer.load().unwrap(), Some(id));

        // Survives a fresh handle, as after a restart
        let reopened = RunningTaskPointer::new(pointer.path());
        assert_eq!(reopened.load().unwrap(), Some(id));

        pointer.clear().unwrap();
        assert_eq!(pointer.load().unwrap(), None);
        assert!(!pointer.path().exists());

        // Clearing twice is fine
        pointer.clear().unwrap();
    }

    #[test]
    fn test_corrupt_pointer_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("running_task.json");
        std::fs::write(&path, "not json").unwrap();

        let pointer = RunningTaskPointer::new(&path);
        assert!(pointer.load().is_err());
    }
}
