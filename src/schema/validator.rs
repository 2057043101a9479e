//! Form validation with detailed error reporting

use chrono::{Local, NaiveDate};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::identity::EntityKind;
use crate::entities::student::date_only;
use crate::schema::registry::SchemaRegistry;

/// A form that failed validation, one related diagnostic per field
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid {kind}: {summary}")]
#[diagnostic(code(academia::form::invalid))]
pub struct FormValidationError {
    kind: EntityKind,
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<FieldViolation>,
}

/// A single rejected field
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{message}")]
pub struct FieldViolation {
    /// Wire name of the field (`nome`, `dataNascimento`...)
    pub field: String,
    pub message: String,

    #[label("{}", self.field)]
    span: SourceSpan,
}

impl FormValidationError {
    fn new(kind: EntityKind, form: &JsonValue, mut violations: Vec<FieldViolation>) -> Self {
        let source = serde_json::to_string_pretty(form).unwrap_or_else(|_| form.to_string());
        for violation in &mut violations {
            violation.span = find_key_span(&source, &violation.field);
        }
        let summary = if violations.len() == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", violations.len())
        };
        Self {
            kind,
            summary,
            src: NamedSource::new(format!("{} form", kind), source),
            violations,
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Message for one field, if it was rejected
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }
}

/// Compiled form schemas
pub struct Validator {
    compiled: HashMap<EntityKind, (JsonValue, JsonValidator)>,
}

impl Validator {
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for kind in EntityKind::all() {
            let Some(schema) = registry.get_json(*kind) else {
                continue;
            };
            match jsonschema::options()
                .should_validate_formats(true)
                .build(&schema)
            {
                Ok(validator) => {
                    compiled.insert(*kind, (schema, validator));
                }
                Err(e) => tracing::warn!(%kind, error = %e, "schema failed to compile"),
            }
        }

        Self { compiled }
    }

    /// Validate a filled-in form
    pub fn validate(&self, kind: EntityKind, form: &JsonValue) -> Result<(), FormValidationError> {
        self.validate_on(kind, form, Local::now().date_naive())
    }

    /// Validate as if today were `today`
    pub fn validate_on(
        &self,
        kind: EntityKind,
        form: &JsonValue,
        today: NaiveDate,
    ) -> Result<(), FormValidationError> {
        let mut violations = Vec::new();

        if let Some((schema, validator)) = self.compiled.get(&kind) {
            for error in validator.iter_errors(form) {
                let violation = error_to_violation(schema, &error);
                if !violations.iter().any(|v: &FieldViolation| v.field == violation.field) {
                    violations.push(violation);
                }
            }
        }

        if kind == EntityKind::Student {
            check_birth_date(form, today, &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(FormValidationError::new(kind, form, violations))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&SchemaRegistry)
    }
}

/// Birth dates cannot be in the future
fn check_birth_date(form: &JsonValue, today: NaiveDate, violations: &mut Vec<FieldViolation>) {
    const FIELD: &str = "dataNascimento";
    if violations.iter().any(|v| v.field == FIELD) {
        return;
    }
    let Some(raw) = form.get(FIELD).and_then(|v| v.as_str()) else {
        return;
    };
    if let Ok(date) = date_only::parse(raw) {
        if date > today {
            violations.push(violation(FIELD, "Birth date cannot be in the future"));
        }
    }
}

fn violation(field: &str, message: impl Into<String>) -> FieldViolation {
    FieldViolation {
        field: field.to_string(),
        message: message.into(),
        span: (0, 0).into(),
    }
}

/// Convert a JSON Schema validation error to a field message
fn error_to_violation(schema: &JsonValue, error: &JsonSchemaError) -> FieldViolation {
    let path = error.instance_path.to_string();
    let path_field = path
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string();

    let field = match &error.kind {
        ValidationErrorKind::Required { property } if path_field.is_empty() => property
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| property.to_string()),
        _ => path_field,
    };

    let property = schema.get("properties").and_then(|p| p.get(&field));
    let title = property
        .and_then(|p| p.get("title"))
        .and_then(|t| t.as_str())
        .unwrap_or(&field)
        .to_string();
    let is_choice = property.is_some_and(|p| p.get("x-choices").is_some());

    let message = match &error.kind {
        ValidationErrorKind::Required { .. } if is_choice => format!("Select a {}", title.to_lowercase()),
        ValidationErrorKind::Required { .. } => format!("{} is required", title),
        ValidationErrorKind::MinLength { limit: 1 } => format!("{} is required", title),
        ValidationErrorKind::MinLength { limit } => {
            format!("{} must be at least {} characters", title, limit)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("{} must be at most {} characters", title, limit)
        }
        ValidationErrorKind::Format { format } if format == "email" => {
            format!("{} must be a valid email address", title)
        }
        ValidationErrorKind::Format { format } if format == "date" => {
            format!("{} must be a valid date (YYYY-MM-DD)", title)
        }
        ValidationErrorKind::Minimum { .. } if is_choice => {
            format!("Select a valid {}", title.to_lowercase())
        }
        ValidationErrorKind::Minimum { .. } => format!("{} must be a positive number", title),
        ValidationErrorKind::Type { .. } => format!("{} has the wrong type", title),
        _ => format!("{}: {}", title, error),
    };

    violation(&field, message)
}

/// Find the span of a key in pretty-printed JSON
fn find_key_span(content: &str, key: &str) -> SourceSpan {
    let pattern = format!("\"{}\":", key);
    match content.find(&pattern) {
        Some(start) => {
            let len = content[start..].find('\n').unwrap_or(content.len() - start);
            (start, len.max(1)).into()
        }
        None => {
            let len = content.find('\n').unwrap_or(content.len()).max(1);
            (0, len).into()
        }
    }
}
