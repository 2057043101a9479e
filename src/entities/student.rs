//! Student entity (`aluno`)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::entity::{contains_ci, Record};
use crate::core::identity::{EntityId, EntityKind};

/// A student record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    /// Full name
    #[serde(rename = "nome")]
    pub name: String,

    pub email: String,

    /// Registration number
    #[serde(rename = "matricula")]
    pub registration: String,

    #[serde(rename = "dataNascimento", with = "date_only")]
    pub birth_date: NaiveDate,

    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Backend fields not modelled here, sent back untouched on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    /// Birth date the way the screens print it (dd/mm/yyyy)
    pub fn birth_date_display(&self) -> String {
        self.birth_date.format("%d/%m/%Y").to_string()
    }
}

impl Record for Student {
    const KIND: EntityKind = EntityKind::Student;

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
            || contains_ci(&self.email, term)
            || contains_ci(&self.registration, term)
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.registration)
    }
}

/// Dates travel as `YYYY-MM-DD`, but the backend may answer with a full
/// timestamp; only the date part before `T` is kept.
pub mod date_only {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse a date or timestamp, keeping the date part
    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let date_part = raw.split('T').next().unwrap_or(raw).trim();
        NaiveDate::parse_from_str(date_part, FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", raw, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Student {
        Student {
            id: Some(EntityId::new(1).unwrap()),
            name: "Ana Souza".to_string(),
            email: "ana@escola.edu.br".to_string(),
            registration: "2024001".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2005, 3, 14).unwrap(),
            active: Some(false),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_student_wire_format() {
        let json = serde_json::to_value(ana()).unwrap();
        assert_eq!(json["nome"], "Ana Souza");
        assert_eq!(json["matricula"], "2024001");
        assert_eq!(json["dataNascimento"], "2005-03-14");
        assert_eq!(json["ativo"], false);
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_student_accepts_timestamp_birth_date() {
        let student: Student = serde_json::from_str(
            r#"{"id":3,"nome":"Bia","email":"b@x.com","matricula":"9","dataNascimento":"2001-12-31T00:00:00.000Z","ativo":true}"#,
        )
        .unwrap();
        assert_eq!(student.birth_date, NaiveDate::from_ymd_opt(2001, 12, 31).unwrap());
        assert!(student.is_active());
    }

    #[test]
    fn test_student_search_fields() {
        let student = ana();
        assert!(student.matches("SOUZA"));
        assert!(student.matches("escola.edu"));
        assert!(student.matches("2024"));
        assert!(!student.matches("carlos"));
    }

    #[test]
    fn test_birth_date_display() {
        assert_eq!(ana().birth_date_display(), "14/03/2005");
    }

    #[test]
    fn test_missing_flag_is_inactive() {
        let mut student = ana();
        student.active = None;
        assert!(!student.is_active());
        student.set_active(true);
        assert!(student.is_active());
    }

    #[test]
    fn test_unknown_backend_fields_survive_update() {
        let mut student: Student = serde_json::from_str(
            r#"{"id":2,"nome":"Bruno Lima","email":"bruno@escola.edu.br","matricula":"2024002","dataNascimento":"2004-11-02","telefone":"11 99999-0000","ativo":false}"#,
        )
        .unwrap();
        assert_eq!(student.extra["telefone"], "11 99999-0000");

        student.set_active(true);
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["telefone"], "11 99999-0000");
        assert_eq!(json["ativo"], true);
        assert_eq!(json["nome"], "Bruno Lima");
        assert!(json.get("extra").is_none());
    }
}
