//! UI bridge crate for the TaskDeck desktop shell.
//!
//! # Responsibility
//! - Expose presenter operations as stable synchronous functions the
//!   embedding UI runtime consumes.
//! - Keep all widget/rendering concerns on the other side of the boundary.

pub mod api;
