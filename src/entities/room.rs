//! Room entity (`sala`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::entity::Record;
use crate::core::identity::{EntityId, EntityKind};

/// A classroom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    /// Room number
    #[serde(rename = "numero")]
    pub number: u32,

    /// Seat capacity
    #[serde(rename = "capacidade")]
    pub capacity: u32,

    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Backend fields not modelled here, sent back untouched on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    pub fn capacity_display(&self) -> String {
        format!("{} seats", self.capacity)
    }
}

impl Record for Room {
    const KIND: EntityKind = EntityKind::Room;

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

    // Numbers are matched on their decimal text
    fn matches(&self, term: &str) -> bool {
        self.number.to_string().contains(term) || self.capacity.to_string().contains(term)
    }

    fn label(&self) -> String {
        format!("Room {}", self.number)
    }
}
