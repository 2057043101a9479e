//! Subject entity (`disciplina`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::entity::{contains_ci, Record};
use crate::core::identity::{EntityId, EntityKind};

/// A subject with its weekly hour load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    #[serde(rename = "nome")]
    pub name: String,

    /// Weekly hour load
    #[serde(rename = "carga_horaria")]
    pub weekly_hours: u32,

    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Backend fields not modelled here, sent back untouched on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subject {
    pub fn hours_display(&self) -> String {
        format!("{}h", self.weekly_hours)
    }
}

impl Record for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn active_flag(&self) -> Option<bool> {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = Some(active);
    }

    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.name, term)
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_wire_format() {
        let subject: Subject =
            serde_json::from_str(r#"{"id":2,"nome":"Cálculo I","carga_horaria":4,"ativo":false}"#)
                .unwrap();
        assert_eq!(subject.weekly_hours, 4);
        assert_eq!(subject.hours_display(), "4h");
        assert!(!subject.is_active());

        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["carga_horaria"], 4);
        assert_eq!(json["nome"], "Cálculo I");
    }

    #[test]
    fn test_subject_search_is_name_only() {
        let subject = Subject {
            id: None,
            name: "Física Experimental".to_string(),
            weekly_hours: 60,
            active: Some(true),
            extra: Default::default(),
        };
        assert!(subject.matches("experimental"));
        assert!(!subject.matches("60"));
    }
}
