//! Form system - embedded schemas, validation and interactive prompts

pub mod registry;
pub mod validator;
pub mod wizard;

pub use registry::SchemaRegistry;
pub use validator::{FieldViolation, FormValidationError, Validator};
pub use wizard::{Choice, FieldChoices, SchemaWizard};
