//! CLI command implementations

pub mod classes;
pub mod completions;
pub mod config;
pub mod enrollments;
pub mod go;
pub mod home;
pub mod rooms;
pub mod students;
pub mod subjects;
