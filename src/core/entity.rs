//! Record trait - common interface for all entity types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityKind};

/// Common trait for all academic records served by the backend.
///
/// Every record carries an optional backend id and an optional `ativo`
/// flag. Soft deletion clears the flag; reactivation sets it again.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The kind of record
    const KIND: EntityKind;

    /// Backend id, absent before creation
    fn id(&self) -> Option<EntityId>;

    /// Assign the id (done by the service on creation)
    fn set_id(&mut self, id: EntityId);

    /// Raw `ativo` flag as served
    fn active_flag(&self) -> Option<bool>;

    /// Set the `ativo` flag
    fn set_active(&mut self, active: bool);

    /// Client-side search predicate used by list screens
    fn matches(&self, term: &str) -> bool;

    /// Short human label (used in prompts and confirmations)
    fn label(&self) -> String;

    /// A record is active iff its flag is present and true
    fn is_active(&self) -> bool {
        self.active_flag() == Some(true)
    }

    /// Derived status for display
    fn status(&self) -> Status {
        if self.is_active() {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

/// Case-insensitive substring match
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Display status derived from the `ativo` flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Inactive => write!(f, "inactive"),
        }
    }
}
