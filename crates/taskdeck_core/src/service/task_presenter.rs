//! Task presenter mediating between the store and the rendering layer.
//!
//! # Responsibility
//! - Hold the single "currently selected" task.
//! - Project field edits to/from UI state through `TaskView` callbacks.
//! - Drive list refresh after every mutation.
//!
//! # Invariants
//! - The presenter never touches a rendering primitive directly; all output
//!   goes through the `TaskView` trait.
//! - A storage fault leaves the in-memory selection unchanged so the user
//!   may retry.
//! - Operations requiring a selection no-op with an Info notice when
//!   nothing is selected.

use crate::model::task::{Comment, CommentId, StatusFilter, Task, TaskStatus, DEFAULT_COMMENT_TEXT};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{error, info, warn};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Success,
    Error,
}

/// Rendering collaborator interface consumed by the presenter.
///
/// The UI layer implements this and owns all widget concerns; the core only
/// announces what changed.
pub trait TaskView {
    /// The visible task list changed; re-render it.
    fn on_task_list_changed(&self, tasks: &[Task]);
    /// The selection changed; project the task's fields (or reset to
    /// defaults on `None`).
    fn on_selection_changed(&self, task: Option<&Task>);
    /// The selected task's comments changed; re-render them.
    fn on_comments_changed(&self, comments: &[Comment]);
    /// Show a message to the user.
    fn notify(&self, severity: NoticeSeverity, title: &str, message: &str);
}

/// Editable field values pulled from UI state on save.
///
/// Comments are not part of the snapshot; they mutate through their own
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFieldSnapshot {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub status: TaskStatus,
}

/// Presenter holding the selection and the store/view collaborators.
///
/// Selection state is per-instance, never process-global; tests run several
/// independent presenters side by side.
pub struct TaskPresenter<R: TaskRepository, V: TaskView> {
    repo: R,
    view: V,
    selected: Option<Task>,
}

impl<R: TaskRepository, V: TaskView> TaskPresenter<R, V> {
    /// Creates a presenter with nothing selected.
    pub fn new(repo: R, view: V) -> Self {
        Self {
            repo,
            view,
            selected: None,
        }
    }

    /// The currently selected task, if any.
    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    /// Creates a task with defaults, selects it, and refreshes the list.
    pub fn create_new_task(&mut self) {
        match self.repo.create_task() {
            Ok(task) => {
                info!("event=presenter_create module=service status=ok id={}", task.id);
                self.set_selection(Some(task));
                self.refresh_list();
            }
            Err(err) => self.report_fault("Could not create task", &err),
        }
    }

    /// Selects a task and projects its fields.
    ///
    /// Switching selection discards unsaved edits to the previous task
    /// without warning.
    pub fn select_task(&mut self, task: Task) {
        info!("event=presenter_select module=service status=ok id={}", task.id);
        self.set_selection(Some(task));
    }

    /// Merges the UI field snapshot into the selection and persists it.
    pub fn save_selected(&mut self, snapshot: TaskFieldSnapshot) {
        let Some(current) = self.selected.as_ref() else {
            self.notify_none_selected("saving");
            return;
        };

        let mut updated = current.clone();
        updated.title = snapshot.title;
        updated.description = snapshot.description;
        updated.start_date = snapshot.start_date;
        updated.end_date = snapshot.end_date;
        updated.status = snapshot.status;

        match self.repo.save_task(&updated) {
            Ok(()) => {
                self.selected = Some(updated);
                self.refresh_list();
                self.view
                    .notify(NoticeSeverity::Success, "Task saved", "Task saved successfully.");
            }
            Err(err) => self.report_fault("Could not save task", &err),
        }
    }

    /// Deletes the selection's record and clears the selection.
    pub fn delete_selected(&mut self) {
        let Some(task) = self.selected.as_ref() else {
            self.notify_none_selected("deleting");
            return;
        };

        match self.repo.delete_task(task.id) {
            Ok(()) => {
                self.set_selection(None);
                self.refresh_list();
                self.view.notify(
                    NoticeSeverity::Success,
                    "Task deleted",
                    "Task deleted successfully.",
                );
            }
            Err(err) => self.report_fault("Could not delete task", &err),
        }
    }

    /// Appends a placeholder comment to the selection and persists it.
    pub fn add_comment_to_selected(&mut self) {
        let Some(current) = self.selected.as_ref() else {
            self.notify_none_selected("adding a comment");
            return;
        };

        let mut updated = current.clone();
        match self.repo.add_comment(&mut updated, DEFAULT_COMMENT_TEXT) {
            Ok(comment) => {
                info!(
                    "event=presenter_comment_add module=service status=ok task={} comment={}",
                    updated.id, comment.id
                );
                self.selected = Some(updated);
                self.emit_comments();
            }
            Err(err) => self.report_fault("Could not add comment", &err),
        }
    }

    /// Removes a comment from the selection by ID and persists it.
    pub fn delete_comment_from_selected(&mut self, comment_id: CommentId) {
        let Some(current) = self.selected.as_ref() else {
            self.notify_none_selected("deleting a comment");
            return;
        };

        let mut updated = current.clone();
        match self.repo.delete_comment(&mut updated, comment_id) {
            Ok(()) => {
                info!(
                    "event=presenter_comment_delete module=service status=ok task={} comment={comment_id}",
                    updated.id
                );
                self.selected = Some(updated);
                self.emit_comments();
            }
            Err(err) => self.report_fault("Could not delete comment", &err),
        }
    }

    /// Lists every stored task, filters by status, and renders the result.
    pub fn filter_tasks(&self, filter: StatusFilter) {
        match self.repo.list_tasks() {
            Ok(listing) => {
                if !listing.skipped.is_empty() {
                    warn!(
                        "event=presenter_list module=service status=warn skipped={}",
                        listing.skipped.len()
                    );
                }
                let tasks: Vec<Task> = listing
                    .tasks
                    .into_iter()
                    .filter(|task| filter.matches(task.status))
                    .collect();
                self.view.on_task_list_changed(&tasks);
            }
            Err(err) => self.report_fault("Could not load tasks", &err),
        }
    }

    /// Re-renders the unfiltered list. Mutations always refresh unfiltered.
    fn refresh_list(&self) {
        match self.repo.list_tasks() {
            Ok(listing) => self.view.on_task_list_changed(&listing.tasks),
            Err(err) => self.report_fault("Could not load tasks", &err),
        }
    }

    fn set_selection(&mut self, task: Option<Task>) {
        self.selected = task;
        self.view.on_selection_changed(self.selected.as_ref());
        self.emit_comments();
    }

    fn emit_comments(&self) {
        let comments = self
            .selected
            .as_ref()
            .map(|task| task.comments.as_slice())
            .unwrap_or(&[]);
        self.view.on_comments_changed(comments);
    }

    fn notify_none_selected(&self, action: &str) {
        self.view.notify(
            NoticeSeverity::Info,
            "No task selected",
            &format!("Create or select a task before {action}."),
        );
    }

    fn report_fault(&self, title: &str, err: &RepoError) {
        error!("event=presenter_fault module=service status=error reason={err}");
        self.view
            .notify(NoticeSeverity::Error, title, &err.to_string());
    }
}
