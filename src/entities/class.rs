//! Class entity (`turma`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::entity::{contains_ci, Record};
use crate::core::identity::{EntityId, EntityKind};
use crate::entities::{Room, Subject};

/// A subject offered under a class code, optionally in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    #[serde(rename = "codigoTurma")]
    pub code: String,

    #[serde(rename = "disciplina", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    #[serde(rename = "sala", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,

    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Backend fields not modelled here, sent back untouched on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Class {
    pub fn subject_name(&self) -> &str {
        self.subject.as_ref().map_or("-", |s| s.name.as_str())
    }

    pub fn room_number(&self) -> Option<u32> {
        self.room.as_ref().map(|r| r.number)
    }
}

impl Record for Class {
    const KIND: EntityKind = EntityKind::Class;

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
        contains_ci(&self.code, term)
            || self
                .subject
                .as_ref()
                .is_some_and(|s| contains_ci(&s.name, term))
    }

    /// `CODE - Subject name`, as the enrollment form lists classes
    fn label(&self) -> String {
        format!("{} - {}", self.code, self.subject_name())
    }
}
