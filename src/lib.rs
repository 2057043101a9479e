//! Academia: academic management from the terminal
//!
//! A client for an academic management REST backend. Students, subjects,
//! rooms, classes and enrollments are listed, edited and soft-deleted
//! through it, and inactive records are brought back with the
//! reactivation workflow in [`core::reactivation`].

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
