//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into UI-facing use-case APIs.
//! - Keep rendering layers decoupled from record storage details.

pub mod task_presenter;
