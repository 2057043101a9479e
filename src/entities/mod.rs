//! Entity type definitions
//!
//! The backend manages the following record types:
//!
//! - [`Student`] - enrolled people (`alunos`)
//! - [`Subject`] - courses with a weekly hour load (`disciplinas`)
//! - [`Room`] - classrooms with a seat capacity (`salas`)
//! - [`Class`] - a subject offered in a room under a class code (`turmas`)
//! - [`Enrollment`] - the link between a class and a student (`turma-alunos`)
//!
//! All of them are soft-deletable through their `ativo` flag.

pub mod class;
pub mod enrollment;
pub mod room;
pub mod student;
pub mod subject;

pub use class::Class;
pub use enrollment::Enrollment;
pub use room::Room;
pub use student::Student;
pub use subject::Subject;
