//! Entity identity: record kinds and numeric backend identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kinds of records managed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Student (aluno)
    Student,
    /// Subject (disciplina)
    Subject,
    /// Room (sala)
    Room,
    /// Class (turma)
    Class,
    /// Class-student enrollment (turma-aluno)
    Enrollment,
}

impl EntityKind {
    /// REST resource segment, also the first segment of a page route
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Student => "alunos",
            EntityKind::Subject => "disciplinas",
            EntityKind::Room => "salas",
            EntityKind::Class => "turmas",
            EntityKind::Enrollment => "turma-alunos",
        }
    }

    /// Singular display name
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Student => "student",
            EntityKind::Subject => "subject",
            EntityKind::Room => "room",
            EntityKind::Class => "class",
            EntityKind::Enrollment => "enrollment",
        }
    }

    /// Plural display name
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Student => "students",
            EntityKind::Subject => "subjects",
            EntityKind::Room => "rooms",
            EntityKind::Class => "classes",
            EntityKind::Enrollment => "enrollments",
        }
    }

    /// Name of the embedded form schema
    pub fn schema_name(&self) -> &'static str {
        match self {
            EntityKind::Student => "student.schema.json",
            EntityKind::Subject => "subject.schema.json",
            EntityKind::Room => "room.schema.json",
            EntityKind::Class => "class.schema.json",
            EntityKind::Enrollment => "enrollment.schema.json",
        }
    }

    /// Get all kinds, in home page order
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Subject,
            EntityKind::Room,
            EntityKind::Class,
            EntityKind::Student,
            EntityKind::Enrollment,
        ]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.singular())
    }
}

impl FromStr for EntityKind {
    type Err = IdParseError;

    /// Accepts the resource segment or the English singular/plural name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        EntityKind::all()
            .iter()
            .copied()
            .find(|kind| {
                lower == kind.resource() || lower == kind.singular() || lower == kind.plural()
            })
            .ok_or_else(|| IdParseError::UnknownKind(s.to_string()))
    }
}

/// Backend-assigned record identifier (always positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// The first id a backend hands out
    pub const FIRST: EntityId = EntityId(1);

    /// Create an id, rejecting zero
    pub fn new(value: u64) -> Result<Self, IdParseError> {
        if value == 0 {
            return Err(IdParseError::Zero);
        }
        Ok(Self(value))
    }

    /// Raw numeric value
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one
    pub fn next(&self) -> EntityId {
        EntityId(self.0 + 1)
    }

    /// Parse an EntityId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        let value: u64 = trimmed
            .parse()
            .map_err(|_| IdParseError::NotNumeric(s.to_string()))?;
        Self::new(value)
    }
}

/// Errors that can occur when parsing kinds and ids
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("unknown entity: '{0}' (valid: alunos, disciplinas, salas, turmas, turma-alunos)")]
    UnknownKind(String),

    #[error("invalid id '{0}': expected a positive integer")]
    NotNumeric(String),

    #[error("invalid id 0: ids start at 1")]
    Zero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_parsing() {
        assert_eq!(EntityId::parse("42").unwrap().get(), 42);
        assert_eq!(EntityId::parse("#7").unwrap().get(), 7);
        assert_eq!(EntityId::parse(" 3 ").unwrap().get(), 3);
    }

    #[test]
    fn test_entity_id_rejects_zero() {
        assert_eq!(EntityId::parse("0").unwrap_err(), IdParseError::Zero);
    }

    #[test]
    fn test_entity_id_rejects_text() {
        let err = EntityId::parse("abc").unwrap_err();
        assert!(matches!(err, IdParseError::NotNumeric(_)));
        assert!(matches!(EntityId::parse("-4").unwrap_err(), IdParseError::NotNumeric(_)));
    }

    #[test]
    fn test_entity_id_serializes_as_number() {
        let id = EntityId::new(5).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let parsed: EntityId = serde_json::from_str("9").unwrap();
        assert_eq!(parsed.get(), 9);
    }

    #[test]
    fn test_kind_from_resource_and_names() {
        assert_eq!("alunos".parse::<EntityKind>().unwrap(), EntityKind::Student);
        assert_eq!("turma-alunos".parse::<EntityKind>().unwrap(), EntityKind::Enrollment);
        assert_eq!("Rooms".parse::<EntityKind>().unwrap(), EntityKind::Room);
        assert_eq!("class".parse::<EntityKind>().unwrap(), EntityKind::Class);
        assert!(matches!(
            "professores".parse::<EntityKind>().unwrap_err(),
            IdParseError::UnknownKind(_)
        ));
    }

    #[test]
    fn test_all_kinds_roundtrip_through_resource() {
        for kind in EntityKind::all() {
            assert_eq!(kind.resource().parse::<EntityKind>().unwrap(), *kind);
        }
    }
}
