//! Task and comment domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store and presenter.
//! - Provide creation defaults and date text helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `comments` keeps insertion order; removal never reorders siblings.
//! - Dates are held as text in sortable `YYYY-MM-DD` form; no start <= end
//!   ordering is enforced.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Stable identifier for a comment inside a task record.
pub type CommentId = Uuid;

/// Title applied to a freshly created task.
pub const DEFAULT_TITLE: &str = "New task";
/// Description applied to a freshly created task.
pub const DEFAULT_DESCRIPTION: &str = "New description";
/// Text applied to a freshly created comment.
pub const DEFAULT_COMMENT_TEXT: &str = "New comment";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle state a task may carry.
///
/// Wire labels match the labels shown in the status picker, so records stay
/// readable without a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created but not started.
    #[serde(rename = "To do")]
    Todo,
    /// Work is in progress.
    #[serde(rename = "In progress")]
    InProgress,
    /// Completed.
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Returns the user-facing label, identical to the wire value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }

    /// Parses a status label. Exact, case-sensitive match.
    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "To do" => Some(Self::Todo),
            "In progress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Status filter used by task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Sentinel matching every task.
    All,
    /// Exact status match.
    Only(TaskStatus),
}

impl StatusFilter {
    /// Parses the filter picker value: `"All"` or a status label.
    pub fn parse(value: &str) -> Option<Self> {
        if value == "All" {
            return Some(Self::All);
        }
        TaskStatus::parse_label(value).map(Self::Only)
    }

    /// Returns whether a task with `status` passes this filter.
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// One comment embedded in a task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Stable comment ID.
    pub id: CommentId,
    /// Comment body. Immutable after creation.
    pub text: String,
    /// Creation timestamp, `YYYY-MM-DD HH:MM:SS` local time. Set once.
    pub created_at: String,
}

impl Comment {
    /// Creates a comment with a generated ID and a current timestamp.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: now_timestamp(),
        }
    }
}

/// Canonical task record.
///
/// Serialized field names keep the wire spelling of the legacy desktop data
/// files, so existing record directories stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable task ID, assigned at creation.
    #[serde(rename = "ID")]
    pub id: TaskId,
    #[serde(rename = "Titre")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    /// Start date in `YYYY-MM-DD` form. Kept as text so a malformed stored
    /// value degrades at display time instead of failing the record.
    #[serde(rename = "DateStart")]
    pub start_date: String,
    /// End date in `YYYY-MM-DD` form. Not validated against `start_date`.
    #[serde(rename = "DateEnd")]
    pub end_date: String,
    #[serde(rename = "Status")]
    pub status: TaskStatus,
    /// Comments in insertion order.
    #[serde(rename = "Commentaires")]
    pub comments: Vec<Comment>,
}

impl Task {
    /// Creates a task with a generated stable ID and creation defaults:
    /// placeholder title/description, start today, end tomorrow, status
    /// `To do`, no comments.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a defaulted task with a caller-provided stable ID.
    ///
    /// Used by tests that need deterministic record identity.
    pub fn with_id(id: TaskId) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            start_date: today_iso(),
            end_date: tomorrow_iso(),
            status: TaskStatus::Todo,
            comments: Vec::new(),
        }
    }

    /// Returns the comment with the given ID, if present.
    pub fn find_comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    /// Removes every comment matching `id` and returns how many were
    /// removed. At most one match is expected; duplicates are not supposed
    /// to happen but are all removed when they do.
    pub fn remove_comments(&mut self, id: CommentId) -> usize {
        let before = self.comments.len();
        self.comments.retain(|comment| comment.id != id);
        before - self.comments.len()
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}

/// Today's date in `YYYY-MM-DD` form.
pub fn today_iso() -> String {
    Local::now().date_naive().format(ISO_DATE_FORMAT).to_string()
}

/// Tomorrow's date in `YYYY-MM-DD` form.
pub fn tomorrow_iso() -> String {
    let today = Local::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    tomorrow.format(ISO_DATE_FORMAT).to_string()
}

/// Current local timestamp in `YYYY-MM-DD HH:MM:SS` form.
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Reformats a stored `YYYY-MM-DD` date to the `DD/MM/YYYY` display form.
///
/// A value that does not parse is returned unchanged; a malformed date must
/// not fail the listing that renders it.
pub fn display_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_date, today_iso, tomorrow_iso, StatusFilter, TaskStatus};

    #[test]
    fn status_labels_roundtrip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::parse_label(status.label()), Some(status));
        }
        assert_eq!(TaskStatus::parse_label("to do"), None);
    }

    #[test]
    fn filter_parse_accepts_sentinel_and_labels() {
        assert_eq!(StatusFilter::parse("All"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("Done"),
            Some(StatusFilter::Only(TaskStatus::Done))
        );
        assert_eq!(StatusFilter::parse("Archived"), None);
    }

    #[test]
    fn display_date_reformats_iso_and_keeps_malformed_text() {
        assert_eq!(display_date("2026-08-07"), "07/08/2026");
        assert_eq!(display_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn default_dates_are_iso_shaped() {
        for value in [today_iso(), tomorrow_iso()] {
            assert_eq!(value.len(), 10);
            assert_eq!(&value[4..5], "-");
            assert_eq!(&value[7..8], "-");
        }
    }
}
