//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for business invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    display_date, today_iso, tomorrow_iso, Comment, CommentId, StatusFilter, Task, TaskId,
    TaskStatus,
};
pub use repo::task_repo::{
    JsonTaskRepository, RepoError, RepoResult, SkippedRecord, TaskListing, TaskRepository,
};
pub use service::task_presenter::{
    NoticeSeverity, TaskFieldSnapshot, TaskPresenter, TaskView,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
