//! Schema-driven interactive form
//!
//! Reads the field order, titles and constraints from the entity's JSON
//! Schema and prompts for each value. Reference fields (`x-choices`) are
//! picked from lists loaded by the caller.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::core::identity::EntityKind;
use crate::schema::registry::SchemaRegistry;

/// One selectable option for a reference field
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    /// Value written into the form when picked
    pub value: Value,
}

/// Options per field name
pub type FieldChoices = HashMap<String, Vec<Choice>>;

/// A schema-driven wizard for creating and editing records
pub struct SchemaWizard {
    registry: SchemaRegistry,
    theme: ColorfulTheme,
}

/// Field information extracted from schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String { max_length: Option<u64>, date: bool },
    Integer { minimum: Option<i64> },
    Boolean,
    /// Picked from caller-supplied options
    Choice,
}

impl SchemaWizard {
    pub fn new() -> Self {
        Self {
            registry: SchemaRegistry,
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for every form field, starting from `initial` (an existing
    /// record, or an empty object for a new one)
    pub fn run(&self, kind: EntityKind, initial: &Value, choices: &FieldChoices) -> Result<Value> {
        let schema = self
            .registry
            .get_json(kind)
            .ok_or_else(|| miette::miette!("No form found for {}", kind))?;

        let editing = initial.get("id").and_then(|v| v.as_u64());
        println!();
        match editing {
            Some(id) => println!(
                "{} Editing {} {}",
                style("◆").cyan(),
                style(kind.singular()).bold(),
                style(id).cyan()
            ),
            None => println!("{} New {}", style("◆").cyan(), style(kind.singular()).bold()),
        }
        println!("{}", style("─".repeat(50)).dim());
        println!();

        let mut form = match initial {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        for field in form_fields(&schema) {
            let current = form.get(&field.name).cloned().or_else(|| field.default.clone());
            let options = choices.get(&field.name).map(Vec::as_slice).unwrap_or(&[]);
            match self.prompt_field(&field, current.as_ref(), options)? {
                Some(value) => {
                    form.insert(field.name, value);
                }
                None => {
                    form.remove(&field.name);
                }
            }
        }

        Ok(Value::Object(form))
    }

    /// Prompt the user for a field value
    fn prompt_field(
        &self,
        field: &FieldInfo,
        current: Option<&Value>,
        options: &[Choice],
    ) -> Result<Option<Value>> {
        let prompt = format_prompt(field);

        match &field.field_type {
            FieldType::Choice => {
                let mut labels: Vec<&str> = Vec::new();
                if !field.required {
                    labels.push("(none)");
                }
                labels.extend(options.iter().map(|c| c.label.as_str()));
                if labels.is_empty() {
                    return Ok(current.cloned());
                }

                let offset = usize::from(!field.required);
                let default_idx = current
                    .and_then(|v| choice_index(options, v))
                    .map(|i| i + offset)
                    .unwrap_or(0);

                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(&labels)
                    .default(default_idx)
                    .interact()
                    .into_diagnostic()?;

                if selection < offset {
                    Ok(None)
                } else {
                    Ok(options.get(selection - offset).map(|c| c.value.clone()))
                }
            }

            FieldType::String { .. } => {
                let default_str = current.and_then(|d| d.as_str()).unwrap_or("");

                let value: String = if !default_str.is_empty() {
                    Input::with_theme(&self.theme)
                        .with_prompt(&prompt)
                        .default(default_str.to_string())
                        .allow_empty(!field.required)
                        .interact_text()
                        .into_diagnostic()?
                } else {
                    Input::with_theme(&self.theme)
                        .with_prompt(&prompt)
                        .allow_empty(true)
                        .interact_text()
                        .into_diagnostic()?
                };

                let value = value.trim().to_string();
                if value.is_empty() && !field.required {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(value)))
                }
            }

            FieldType::Integer { .. } => {
                let default_val = current.and_then(|d| d.as_i64());

                let mut input = Input::<String>::with_theme(&self.theme).with_prompt(&prompt);
                if let Some(default_val) = default_val {
                    input = input.default(default_val.to_string());
                }
                let value = input.interact_text().into_diagnostic()?;

                // Unparseable input goes through as text so validation reports it
                match value.trim().parse::<i64>() {
                    Ok(n) => Ok(Some(Value::Number(n.into()))),
                    Err(_) => Ok(Some(Value::String(value))),
                }
            }

            FieldType::Boolean => {
                let default_val = current.and_then(|d| d.as_bool()).unwrap_or(true);

                let items = &["Yes", "No"];
                let default_idx = if default_val { 0 } else { 1 };

                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(items)
                    .default(default_idx)
                    .interact()
                    .into_diagnostic()?;

                Ok(Some(Value::Bool(selection == 0)))
            }
        }
    }
}

impl Default for SchemaWizard {
    fn default() -> Self {
        Self::new()
    }
}

/// Form fields in prompt order (`x-order`); `id` is never prompted
pub fn form_fields(schema: &Value) -> Vec<FieldInfo> {
    let Some(props) = schema.get("properties").and_then(|p| p.as_object()) else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let order: Vec<&str> = match schema.get("x-order").and_then(|o| o.as_array()) {
        Some(order) => order.iter().filter_map(|v| v.as_str()).collect(),
        None => props.keys().map(String::as_str).collect(),
    };

    order
        .into_iter()
        .filter(|name| *name != "id")
        .filter_map(|name| {
            let prop = props.get(name)?;
            Some(parse_field(name, prop, required.contains(&name)))
        })
        .collect()
}

fn parse_field(name: &str, schema: &Value, required: bool) -> FieldInfo {
    let field_type = if schema.get("x-choices").is_some() {
        FieldType::Choice
    } else {
        match schema.get("type").and_then(|t| t.as_str()) {
            Some("integer") => FieldType::Integer {
                minimum: schema.get("minimum").and_then(|v| v.as_i64()),
            },
            Some("boolean") => FieldType::Boolean,
            _ => FieldType::String {
                max_length: schema.get("maxLength").and_then(|v| v.as_u64()),
                date: schema.get("format").and_then(|f| f.as_str()) == Some("date"),
            },
        }
    };

    FieldInfo {
        name: name.to_string(),
        title: schema
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or(name)
            .to_string(),
        description: schema.get("description").and_then(|d| d.as_str()).map(String::from),
        field_type,
        required,
        default: schema.get("default").cloned(),
    }
}

/// Position of the option matching `current`, comparing by id for objects
pub fn choice_index(options: &[Choice], current: &Value) -> Option<usize> {
    let key = |v: &Value| v.get("id").cloned().unwrap_or_else(|| v.clone());
    let wanted = key(current);
    options.iter().position(|c| key(&c.value) == wanted)
}

fn format_prompt(field: &FieldInfo) -> String {
    let mut prompt = field.title.clone();
    if let Some(ref desc) = field.description {
        prompt = format!("{} ({})", prompt, style(desc).dim());
    }
    if let FieldType::String {
        max_length: Some(max),
        date: false,
    } = field.field_type
    {
        prompt = format!("{} {}", prompt, style(format!("[max {}]", max)).dim());
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_fields_in_order() {
        let schema = SchemaRegistry.get_json(EntityKind::Student).unwrap();
        let fields = form_fields(&schema);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["nome", "email", "matricula", "dataNascimento", "ativo"]);

        assert_eq!(fields[0].title, "Name");
        assert!(fields[0].required);
        assert_eq!(
            fields[3].field_type,
            FieldType::String {
                max_length: None,
                date: true
            }
        );
        assert_eq!(fields[4].field_type, FieldType::Boolean);
        assert!(!fields[4].required);
    }

    #[test]
    fn test_reference_fields_are_choices() {
        let schema = SchemaRegistry.get_json(EntityKind::Class).unwrap();
        let fields = form_fields(&schema);
        let subject = fields.iter().find(|f| f.name == "disciplina").unwrap();
        assert_eq!(subject.field_type, FieldType::Choice);
        assert!(subject.required);
        let room = fields.iter().find(|f| f.name == "sala").unwrap();
        assert!(!room.required);
    }

    #[test]
    fn test_choice_index_matches_by_id() {
        let options = vec![
            Choice {
                label: "Álgebra".to_string(),
                value: json!({ "id": 1, "nome": "Álgebra" }),
            },
            Choice {
                label: "Física".to_string(),
                value: json!({ "id": 2, "nome": "Física" }),
            },
        ];
        assert_eq!(choice_index(&options, &json!({ "id": 2 })), Some(1));
        assert_eq!(choice_index(&options, &json!({ "id": 9 })), None);

        let ids = vec![
            Choice {
                label: "A".to_string(),
                value: json!(4),
            },
            Choice {
                label: "B".to_string(),
                value: json!(7),
            },
        ];
        assert_eq!(choice_index(&ids, &json!(7)), Some(1));
    }
}
