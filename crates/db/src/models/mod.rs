//! Row models.
//!
//! Each submodule contains a `FromRow` struct matching the database row and
//! its conversion into the corresponding `pubdash_core` type.

pub mod dashboard;
pub mod public_dashboard;
