//! Entity service boundary
//!
//! Every record kind is served by the same six operations. The REST
//! backend implements them over HTTP ([`crate::core::rest::RestService`]);
//! unit tests use an in-process store.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::entity::Record;
use crate::core::identity::{EntityId, EntityKind};

/// Errors that can occur while talking to an entity service
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Transport failure (connection refused, timeout, TLS...)
    #[error("{0}")]
    Http(String),

    /// Non-success HTTP status; `message` is the server's description if it sent one
    #[error("request failed with status {status}{}", detail_suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),

    /// The record cannot be sent as-is (e.g. it has no id)
    #[error("{0}")]
    InvalidRecord(String),
}

impl ServiceError {
    /// The single human-readable message shown by screens.
    ///
    /// All error categories collapse into one message taken from the
    /// failure's description, or `fallback` when there is none.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            ServiceError::Status { message: Some(m), .. } => m.clone(),
            ServiceError::Status { message: None, .. } => String::new(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Data access for one record kind
#[async_trait]
pub trait EntityService<T: Record>: Send + Sync {
    /// All records with `ativo = true`
    async fn get_actives(&self) -> Result<Vec<T>, ServiceError>;

    /// All soft-deleted records
    async fn get_inactives(&self) -> Result<Vec<T>, ServiceError>;

    /// One record, active or not; fails with [`ServiceError::NotFound`] if absent
    async fn get_by_id(&self, id: EntityId) -> Result<T, ServiceError>;

    async fn create(&self, record: &T) -> Result<T, ServiceError>;

    /// Replace the full record
    async fn update(&self, id: EntityId, record: &T) -> Result<T, ServiceError>;

    /// Soft delete: the backend clears `ativo`
    async fn delete(&self, id: EntityId) -> Result<(), ServiceError>;
}

/// Reactivate a record: fetch it in full, flip the flag, send it back.
pub async fn reactivate<T, S>(service: &S, id: EntityId) -> Result<T, ServiceError>
where
    T: Record,
    S: EntityService<T> + ?Sized,
{
    let mut record = service.get_by_id(id).await?;
    record.set_active(true);
    service.update(id, &record).await
}
