//! Enrollment entity (`turma-aluno`): a student placed in a class

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::entity::Record;
use crate::core::identity::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    /// Class id
    #[serde(rename = "turma")]
    pub class_id: u64,

    /// Student id
    #[serde(rename = "aluno")]
    pub student_id: u64,

    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Backend fields not modelled here, sent back untouched on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Enrollment {
    const KIND: EntityKind = EntityKind::Enrollment;

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
        self.class_id.to_string().contains(term) || self.student_id.to_string().contains(term)
    }

    fn label(&self) -> String {
        match self.id {
            Some(id) => format!("Enrollment #{}", id),
            None => format!("Class {} / Student {}", self.class_id, self.student_id),
        }
    }
}
