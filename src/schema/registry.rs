//! Embedded form schemas

use rust_embed::RustEmbed;
use serde_json::Value;

use crate::core::identity::EntityKind;

#[derive(RustEmbed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Access to the JSON Schema of every record kind
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Raw schema text
    pub fn get(&self, kind: EntityKind) -> Option<String> {
        let file = EmbeddedSchemas::get(kind.schema_name())?;
        std::str::from_utf8(&file.data).ok().map(str::to_owned)
    }

    /// Parsed schema
    pub fn get_json(&self, kind: EntityKind) -> Option<Value> {
        self.get(kind).and_then(|s| serde_json::from_str(&s).ok())
    }

    pub fn has_schema(&self, kind: EntityKind) -> bool {
        EmbeddedSchemas::get(kind.schema_name()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_schema() {
        let registry = SchemaRegistry;
        for kind in EntityKind::all() {
            assert!(registry.has_schema(*kind), "missing schema for {}", kind);
            let schema = registry.get_json(*kind).unwrap();
            assert!(schema.get("properties").is_some());
            assert!(schema.get("x-order").is_some());
        }
    }
}
