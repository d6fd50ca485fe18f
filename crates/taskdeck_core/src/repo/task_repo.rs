//! Task store contracts and JSON-file implementation.
//!
//! # Responsibility
//! - Provide durable CRUD for task records, one JSON file per task.
//! - Tolerate individual malformed records during listing.
//!
//! # Invariants
//! - Record paths derive deterministically from the task ID.
//! - A comment mutation that fails to persist leaves the in-memory task
//!   unchanged.
//! - Deleting an absent record is a no-op, not an error.

use crate::model::task::{Comment, CommentId, Task, TaskId};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for task record persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// I/O failure reading or writing a record or the records directory.
    Storage { path: PathBuf, message: String },
    /// Referenced record does not exist.
    NotFound(TaskId),
    /// A record exists but cannot be deserialized.
    Malformed { path: PathBuf, message: String },
}

impl RepoError {
    fn storage(path: &Path, err: impl Display) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn malformed(path: &Path, err: impl Display) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage { path, message } => {
                write!(f, "storage fault at `{}`: {message}", path.display())
            }
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Malformed { path, message } => {
                write!(f, "malformed record `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for RepoError {}

/// One record skipped during listing, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: String,
}

/// Listing outcome: readable tasks plus the records that were skipped.
///
/// One corrupt file must not block the rest, so skips travel alongside the
/// result instead of failing it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskListing {
    /// Tasks sorted by `(title, id)` ascending.
    pub tasks: Vec<Task>,
    /// Records that failed to load, in enumeration order.
    pub skipped: Vec<SkippedRecord>,
}

/// Store interface for task CRUD and embedded comment mutations.
pub trait TaskRepository {
    /// Creates a task with generated ID and creation defaults, persists it,
    /// and returns it.
    fn create_task(&self) -> RepoResult<Task>;
    /// Overwrites the persisted record for `task.id` with the full
    /// in-memory representation.
    fn save_task(&self, task: &Task) -> RepoResult<()>;
    /// Reads one record by ID.
    fn get_task(&self, id: TaskId) -> RepoResult<Task>;
    /// Removes the persisted record. Tolerates double-delete.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Enumerates every persisted record, skipping unreadable ones.
    fn list_tasks(&self) -> RepoResult<TaskListing>;
    /// Appends a fresh comment and persists the whole task.
    fn add_comment(&self, task: &mut Task, text: &str) -> RepoResult<Comment>;
    /// Removes comments matching `comment_id` and persists the whole task.
    fn delete_comment(&self, task: &mut Task, comment_id: CommentId) -> RepoResult<()>;
}

/// JSON-file task store: `<records_dir>/<uuid>.json`, no index file.
pub struct JsonTaskRepository {
    records_dir: PathBuf,
}

impl JsonTaskRepository {
    /// Opens a store rooted at `records_dir`, creating the directory when
    /// missing.
    pub fn create(records_dir: impl Into<PathBuf>) -> RepoResult<Self> {
        let records_dir = records_dir.into();
        fs::create_dir_all(&records_dir)
            .map_err(|err| RepoError::storage(&records_dir, err))?;
        Ok(Self { records_dir })
    }

    /// Returns the directory that holds the record files.
    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    fn record_path(&self, id: TaskId) -> PathBuf {
        self.records_dir.join(format!("{id}.json"))
    }

    fn write_record(&self, task: &Task) -> RepoResult<()> {
        let path = self.record_path(task.id);
        let body = serde_json::to_string_pretty(task)
            .map_err(|err| RepoError::malformed(&path, err))?;
        fs::write(&path, body).map_err(|err| RepoError::storage(&path, err))
    }

    fn load_record(path: &Path) -> Result<Task, String> {
        let body = fs::read_to_string(path).map_err(|err| format!("read failed: {err}"))?;
        serde_json::from_str(&body).map_err(|err| format!("parse failed: {err}"))
    }
}

impl TaskRepository for JsonTaskRepository {
    fn create_task(&self) -> RepoResult<Task> {
        let task = Task::new();
        self.write_record(&task)?;
        info!("event=task_create module=repo status=ok id={}", task.id);
        Ok(task)
    }

    fn save_task(&self, task: &Task) -> RepoResult<()> {
        self.write_record(task)?;
        info!("event=task_save module=repo status=ok id={}", task.id);
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Task> {
        let path = self.record_path(id);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(RepoError::NotFound(id));
            }
            Err(err) => return Err(RepoError::storage(&path, err)),
        };
        serde_json::from_str(&body).map_err(|err| RepoError::malformed(&path, err))
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("event=task_delete module=repo status=ok id={id}");
                Ok(())
            }
            // Double-delete tolerated.
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(RepoError::storage(&path, err)),
        }
    }

    fn list_tasks(&self) -> RepoResult<TaskListing> {
        let entries = fs::read_dir(&self.records_dir)
            .map_err(|err| RepoError::storage(&self.records_dir, err))?;

        let mut listing = TaskListing::default();
        for entry in entries {
            let entry = entry.map_err(|err| RepoError::storage(&self.records_dir, err))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::load_record(&path) {
                Ok(task) => listing.tasks.push(task),
                Err(reason) => {
                    warn!(
                        "event=task_list_skip module=repo status=warn path={} reason={reason}",
                        path.display()
                    );
                    listing.skipped.push(SkippedRecord { path, reason });
                }
            }
        }

        // Filesystem enumeration order is not stable; sort for deterministic
        // rendering, ID as tie-breaker.
        listing
            .tasks
            .sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

        info!(
            "event=task_list module=repo status=ok count={} skipped={}",
            listing.tasks.len(),
            listing.skipped.len()
        );
        Ok(listing)
    }

    fn add_comment(&self, task: &mut Task, text: &str) -> RepoResult<Comment> {
        let comment = Comment::new(text);
        task.comments.push(comment.clone());
        match self.write_record(task) {
            Ok(()) => {
                info!(
                    "event=comment_create module=repo status=ok task={} comment={}",
                    task.id, comment.id
                );
                Ok(comment)
            }
            Err(err) => {
                // Keep the in-memory task unchanged when persistence fails.
                task.comments.pop();
                Err(err)
            }
        }
    }

    fn delete_comment(&self, task: &mut Task, comment_id: CommentId) -> RepoResult<()> {
        let previous = task.comments.clone();
        let removed = task.remove_comments(comment_id);

        match self.write_record(task) {
            Ok(()) => {
                info!(
                    "event=comment_delete module=repo status=ok task={} comment={comment_id} removed={removed}",
                    task.id
                );
                Ok(())
            }
            Err(err) => {
                task.comments = previous;
                Err(err)
            }
        }
    }
}
