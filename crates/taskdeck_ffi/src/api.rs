//! UI-facing bridge API for the desktop shell.
//!
//! # Responsibility
//! - Expose stable, use-case-level task operations to the UI runtime.
//! - Hold the single process-wide presenter behind one mutex (the only
//!   lock around the records directory).
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Responses are plain envelopes with stable meaning; faults become
//!   `ok=false`, never exceptions.

use log::info;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use taskdeck_core::{
    core_version as core_version_inner, default_log_level, display_date,
    init_logging as init_logging_inner, ping as ping_inner, Comment, JsonTaskRepository,
    NoticeSeverity, StatusFilter, Task, TaskFieldSnapshot, TaskPresenter, TaskRepository,
    TaskStatus, TaskView,
};
use uuid::Uuid;

const RECORDS_DIR_NAME: &str = "taskdeck_records";

static BRIDGE: OnceLock<BridgeState> = OnceLock::new();

/// Minimal health-check API for bridge smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through the bridge.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive);
///   empty selects the build-mode default.
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; reconfiguration attempts
///   return an error message.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        default_log_level()
    } else {
        level.as_str()
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for task operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation took effect. False when it faulted or no-oped
    /// (for example, nothing selected).
    pub ok: bool,
    /// ID of the task selected after the operation, when one is.
    pub task_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// One row of the rendered task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Stable task ID in string form.
    pub task_id: String,
    pub title: String,
    /// Start date in `DD/MM/YYYY` display form; malformed stored text is
    /// passed through as-is.
    pub start_date: String,
    /// Status label, identical to the wire value.
    pub status: String,
}

/// Task list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Editable field values of the selected task, in storage form (ISO dates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetail {
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
}

/// Selection projection response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTaskResponse {
    /// `None` when nothing is selected; the UI resets fields to defaults.
    pub task: Option<TaskDetail>,
    pub message: String,
}

/// One rendered comment row of the selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub comment_id: String,
    pub text: String,
    pub created_at: String,
}

/// Comment list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentListResponse {
    pub items: Vec<CommentItem>,
    pub message: String,
}

/// Creates a task with defaults and selects it.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
/// - Returns the created task ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create() -> TaskActionResponse {
    run_action("Task created.", |presenter| presenter.create_new_task())
}

/// Selects the task behind a clicked list row.
///
/// The row ID is resolved through the store so the selection reflects the
/// persisted record, not stale row data.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_select(task_id: String) -> TaskActionResponse {
    let id = match Uuid::parse_str(task_id.trim()) {
        Ok(id) => id,
        Err(err) => {
            return TaskActionResponse::failure(format!("invalid task id `{task_id}`: {err}"));
        }
    };

    let repo = match JsonTaskRepository::create(resolve_records_dir()) {
        Ok(repo) => repo,
        Err(err) => return TaskActionResponse::failure(format!("task_select failed: {err}")),
    };
    let task = match repo.get_task(id) {
        Ok(task) => task,
        Err(err) => return TaskActionResponse::failure(format!("task_select failed: {err}")),
    };

    run_action("Task selected.", |presenter| presenter.select_task(task))
}

/// Saves the selected task from the current UI field values.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
/// - `ok=false` with a notice message when nothing is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn task_save(
    title: String,
    description: String,
    start_date: String,
    end_date: String,
    status: String,
) -> TaskActionResponse {
    let Some(status) = TaskStatus::parse_label(status.as_str()) else {
        return TaskActionResponse::failure(format!("unknown status label `{status}`"));
    };
    let snapshot = TaskFieldSnapshot {
        title,
        description,
        start_date,
        end_date,
        status,
    };
    run_action("Task saved.", |presenter| presenter.save_selected(snapshot))
}

/// Deletes the selected task and clears the selection.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete() -> TaskActionResponse {
    run_action("Task deleted.", |presenter| presenter.delete_selected())
}

/// Appends a placeholder comment to the selected task.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comment_add() -> TaskActionResponse {
    run_action("Comment added.", |presenter| {
        presenter.add_comment_to_selected()
    })
}

/// Deletes a comment of the selected task by ID.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn comment_delete(comment_id: String) -> TaskActionResponse {
    let id = match Uuid::parse_str(comment_id.trim()) {
        Ok(id) => id,
        Err(err) => {
            return TaskActionResponse::failure(format!(
                "invalid comment id `{comment_id}`: {err}"
            ));
        }
    };
    run_action("Comment deleted.", |presenter| {
        presenter.delete_comment_from_selected(id)
    })
}

/// Lists stored tasks, filtered by status label or the `"All"` sentinel.
///
/// # FFI contract
/// - Sync call, record-file-backed execution.
/// - Never panics.
/// - A missing filter means `"All"`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list(status: Option<String>) -> TaskListResponse {
    let filter = match status.as_deref() {
        None => StatusFilter::All,
        Some(value) => match StatusFilter::parse(value) {
            Some(filter) => filter,
            None => {
                return TaskListResponse {
                    items: Vec::new(),
                    message: format!("unknown status filter `{value}`"),
                };
            }
        },
    };

    let state = match bridge() {
        Ok(state) => state,
        Err(message) => {
            return TaskListResponse {
                items: Vec::new(),
                message,
            };
        }
    };

    let presenter = lock_presenter(state);
    presenter.filter_tasks(filter);
    drop(presenter);

    let notices = state.view.drain_notices();
    if let Some(notice) = notices
        .iter()
        .find(|notice| notice.severity == NoticeSeverity::Error)
    {
        return TaskListResponse {
            items: Vec::new(),
            message: format!("{}: {}", notice.title, notice.message),
        };
    }

    let items: Vec<TaskItem> = state.view.tasks().iter().map(to_task_item).collect();
    let message = format!("Found {} task(s).", items.len());
    TaskListResponse { items, message }
}

/// Returns the selected task's editable fields for UI projection.
///
/// # FFI contract
/// - Sync call, in-memory read.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_selected() -> SelectedTaskResponse {
    let state = match bridge() {
        Ok(state) => state,
        Err(message) => return SelectedTaskResponse { task: None, message },
    };

    let presenter = lock_presenter(state);
    match presenter.selected() {
        Some(task) => SelectedTaskResponse {
            message: format!("Task {} selected.", task.id),
            task: Some(to_task_detail(task)),
        },
        None => SelectedTaskResponse {
            task: None,
            message: "No task selected.".to_string(),
        },
    }
}

/// Returns the selected task's comments in insertion order.
///
/// # FFI contract
/// - Sync call, in-memory read.
/// - Never panics.
/// - Empty list when nothing is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn task_comments() -> CommentListResponse {
    let state = match bridge() {
        Ok(state) => state,
        Err(message) => {
            return CommentListResponse {
                items: Vec::new(),
                message,
            };
        }
    };

    let presenter = lock_presenter(state);
    match presenter.selected() {
        Some(task) => {
            let items: Vec<CommentItem> = task.comments.iter().map(to_comment_item).collect();
            let message = format!("Found {} comment(s).", items.len());
            CommentListResponse { items, message }
        }
        None => CommentListResponse {
            items: Vec::new(),
            message: "No task selected.".to_string(),
        },
    }
}

/// One buffered user-facing notice.
#[derive(Debug, Clone)]
struct Notice {
    severity: NoticeSeverity,
    title: String,
    message: String,
}

/// Latest view projections, buffered until the shell reads them back.
#[derive(Debug, Default)]
struct ViewBuffer {
    tasks: Vec<Task>,
    selection: Option<Task>,
    comments: Vec<Comment>,
    notices: Vec<Notice>,
}

/// `TaskView` implementation shared between the presenter and the bridge
/// functions that build response envelopes.
#[derive(Clone, Default)]
struct SharedView {
    buffer: Arc<Mutex<ViewBuffer>>,
}

impl SharedView {
    fn buffer(&self) -> MutexGuard<'_, ViewBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tasks(&self) -> Vec<Task> {
        self.buffer().tasks.clone()
    }

    fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.buffer().notices)
    }
}

impl TaskView for SharedView {
    fn on_task_list_changed(&self, tasks: &[Task]) {
        self.buffer().tasks = tasks.to_vec();
    }

    fn on_selection_changed(&self, task: Option<&Task>) {
        self.buffer().selection = task.cloned();
    }

    fn on_comments_changed(&self, comments: &[Comment]) {
        self.buffer().comments = comments.to_vec();
    }

    fn notify(&self, severity: NoticeSeverity, title: &str, message: &str) {
        self.buffer().notices.push(Notice {
            severity,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

struct BridgeState {
    presenter: Mutex<TaskPresenter<JsonTaskRepository, SharedView>>,
    view: SharedView,
}

fn bridge() -> Result<&'static BridgeState, String> {
    if let Some(state) = BRIDGE.get() {
        return Ok(state);
    }

    let records_dir = resolve_records_dir();
    let repo = JsonTaskRepository::create(&records_dir)
        .map_err(|err| format!("records directory init failed: {err}"))?;
    info!(
        "event=bridge_init module=ffi status=ok records_dir={}",
        records_dir.display()
    );

    let view = SharedView::default();
    let presenter = TaskPresenter::new(repo, view.clone());
    Ok(BRIDGE.get_or_init(|| BridgeState {
        presenter: Mutex::new(presenter),
        view,
    }))
}

fn lock_presenter(
    state: &BridgeState,
) -> MutexGuard<'_, TaskPresenter<JsonTaskRepository, SharedView>> {
    state
        .presenter
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn run_action(
    success_message: &str,
    op: impl FnOnce(&mut TaskPresenter<JsonTaskRepository, SharedView>),
) -> TaskActionResponse {
    let state = match bridge() {
        Ok(state) => state,
        Err(message) => return TaskActionResponse::failure(message),
    };

    let mut presenter = lock_presenter(state);
    op(&mut presenter);

    let notices = state.view.drain_notices();
    // Info (nothing selected) and Error notices both mean the operation did
    // not take effect.
    let ok = notices
        .iter()
        .all(|notice| notice.severity == NoticeSeverity::Success);
    let message = match notices.last() {
        Some(notice) if notice.severity == NoticeSeverity::Success => notice.message.clone(),
        Some(notice) => format!("{}: {}", notice.title, notice.message),
        None => success_message.to_string(),
    };
    let task_id = presenter.selected().map(|task| task.id.to_string());

    TaskActionResponse {
        ok,
        task_id,
        message,
    }
}

fn resolve_records_dir() -> PathBuf {
    if let Ok(raw) = std::env::var("TASKDECK_DATA_DIR") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(RECORDS_DIR_NAME)
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        task_id: task.id.to_string(),
        title: task.title.clone(),
        start_date: display_date(&task.start_date),
        status: task.status.label().to_string(),
    }
}

fn to_task_detail(task: &Task) -> TaskDetail {
    TaskDetail {
        task_id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        start_date: task.start_date.clone(),
        end_date: task.end_date.clone(),
        status: task.status.label().to_string(),
    }
}

fn to_comment_item(comment: &Comment) -> CommentItem {
    CommentItem {
        comment_id: comment.id.to_string(),
        text: comment.text.clone(),
        created_at: comment.created_at.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        comment_add, comment_delete, core_version, init_logging, ping, task_create, task_delete,
        task_list, task_save, task_select, task_selected,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn task_select_rejects_malformed_id() {
        let response = task_select("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid task id"));
    }

    #[test]
    fn comment_delete_rejects_malformed_id() {
        let response = comment_delete("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid comment id"));
    }

    #[test]
    fn task_save_rejects_unknown_status_label() {
        let response = task_save(
            "title".to_string(),
            "description".to_string(),
            "2026-01-01".to_string(),
            "2026-01-02".to_string(),
            "Archived".to_string(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("unknown status label"));
    }

    #[test]
    fn task_list_rejects_unknown_filter() {
        let response = task_list(Some("Archived".to_string()));
        assert!(response.items.is_empty());
        assert!(response.message.contains("unknown status filter"));
    }

    // The bridge presenter is process-global, so the stateful flow lives in
    // one sequential test; the records directory is shared across runs and
    // assertions only concern the IDs created here.
    #[test]
    fn end_to_end_task_flow() {
        let created = task_create();
        assert!(created.ok, "{}", created.message);
        let task_id = created.task_id.clone().expect("create should select a task");

        let selected = task_selected();
        assert_eq!(
            selected.task.as_ref().map(|task| task.task_id.clone()),
            Some(task_id.clone())
        );

        let saved = task_save(
            "Buy milk".to_string(),
            "Semi-skimmed".to_string(),
            "2026-08-07".to_string(),
            "2026-08-08".to_string(),
            "In progress".to_string(),
        );
        assert!(saved.ok, "{}", saved.message);

        let listing = task_list(Some("In progress".to_string()));
        let row = listing
            .items
            .iter()
            .find(|item| item.task_id == task_id)
            .expect("saved task should be listed under its status");
        assert_eq!(row.title, "Buy milk");
        assert_eq!(row.start_date, "07/08/2026");

        let commented = comment_add();
        assert!(commented.ok, "{}", commented.message);
        let comments = super::task_comments();
        assert_eq!(comments.items.len(), 1);

        let removed = comment_delete(comments.items[0].comment_id.clone());
        assert!(removed.ok, "{}", removed.message);
        assert!(super::task_comments().items.is_empty());

        let deleted = task_delete();
        assert!(deleted.ok, "{}", deleted.message);
        let listing = task_list(None);
        assert!(listing.items.iter().all(|item| item.task_id != task_id));
    }
}
