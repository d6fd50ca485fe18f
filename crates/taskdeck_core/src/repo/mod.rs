//! Record store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate record file layout and JSON details from presenter logic.
//!
//! # Invariants
//! - Every mutation rewrites the whole record file (last write wins).
//! - Store APIs return semantic errors (`NotFound`, `Malformed`) in addition
//!   to I/O transport errors.

pub mod task_repo;
