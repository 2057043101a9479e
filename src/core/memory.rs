//! In-process implementation of [`EntityService`]
//!
//! Behaves like the backend: ids are assigned on create, delete only
//! clears `ativo`, and `get_by_id` still finds soft-deleted records.
//! A failure can be armed to exercise error paths.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::core::entity::Record;
use crate::core::identity::EntityId;
use crate::core::service::{EntityService, ServiceError};

#[derive(Debug)]
struct Store<T> {
    records: BTreeMap<EntityId, T>,
    next_id: EntityId,
    failure: Option<ServiceError>,
}

#[derive(Debug)]
pub struct MemoryService<T> {
    store: Mutex<Store<T>>,
}

impl<T: Record> MemoryService<T> {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                records: BTreeMap::new(),
                next_id: EntityId::FIRST,
                failure: None,
            }),
        }
    }

    /// Seed with existing records; records without an id get the next free one
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let service = Self::new();
        {
            let mut store = service.lock();
            for mut record in records {
                let id = match record.id() {
                    Some(id) => id,
                    None => {
                        let id = next_id(&mut store);
                        record.set_id(id);
                        id
                    }
                };
                store.next_id = store.next_id.max(id.next());
                store.records.insert(id, record);
            }
        }
        service
    }

    /// Make every following call fail with `error` (until cleared with `None`)
    pub fn set_failure(&self, error: Option<ServiceError>) {
        self.lock().failure = error;
    }

    /// Snapshot of every stored record, active or not
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().records.values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Store<T>> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn checked(&self) -> Result<MutexGuard<'_, Store<T>>, ServiceError> {
        let store = self.lock();
        match &store.failure {
            Some(error) => Err(error.clone()),
            None => Ok(store),
        }
    }

    fn filtered(&self, active: bool) -> Result<Vec<T>, ServiceError> {
        let store = self.checked()?;
        Ok(store
            .records
            .values()
            .filter(|r| r.is_active() == active)
            .cloned()
            .collect())
    }
}

impl<T: Record> Default for MemoryService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn next_id<T>(store: &mut Store<T>) -> EntityId {
    let id = store.next_id;
    store.next_id = id.next();
    id
}

#[async_trait]
impl<T: Record> EntityService<T> for MemoryService<T> {
    async fn get_actives(&self) -> Result<Vec<T>, ServiceError> {
        self.filtered(true)
    }

    async fn get_inactives(&self) -> Result<Vec<T>, ServiceError> {
        self.filtered(false)
    }

    async fn get_by_id(&self, id: EntityId) -> Result<T, ServiceError> {
        let store = self.checked()?;
        store
            .records
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound { kind: T::KIND, id })
    }

    async fn create(&self, record: &T) -> Result<T, ServiceError> {
        let mut store = self.checked()?;
        let id = next_id(&mut store);
        let mut created = record.clone();
        created.set_id(id);
        if created.active_flag().is_none() {
            created.set_active(true);
        }
        store.records.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: EntityId, record: &T) -> Result<T, ServiceError> {
        let mut store = self.checked()?;
        if !store.records.contains_key(&id) {
            return Err(ServiceError::NotFound { kind: T::KIND, id });
        }
        let mut updated = record.clone();
        updated.set_id(id);
        store.records.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: EntityId) -> Result<(), ServiceError> {
        let mut store = self.checked()?;
        let record = store
            .records
            .get_mut(&id)
            .ok_or(ServiceError::NotFound { kind: T::KIND, id })?;
        record.set_active(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::reactivate;
    use crate::entities::Subject;

    fn subject(name: &str, active: bool) -> Subject {
        Subject {
            id: None,
            name: name.to_string(),
            weekly_hours: 4,
            active: Some(active),
            extra: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_defaults_active() {
        let service = MemoryService::<Subject>::new();
        let mut draft = subject("Álgebra", true);
        draft.active = None;

        let created = service.create(&draft).await.unwrap();
        assert_eq!(created.id.unwrap().get(), 1);
        assert_eq!(created.active, Some(true));

        let second = service.create(&subject("Física", true)).await.unwrap();
        assert_eq!(second.id.unwrap().get(), 2);
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let service = MemoryService::with_records([subject("Álgebra", true), subject("Física", true)]);
        let id = EntityId::new(1).unwrap();

        service.delete(id).await.unwrap();

        assert_eq!(service.get_actives().await.unwrap().len(), 1);
        let inactive = service.get_inactives().await.unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].name, "Álgebra");
        assert!(!service.get_by_id(id).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn test_reactivate_flips_flag_only() {
        let mut seeded = subject("Química", false);
        seeded
            .extra
            .insert("ementa".to_string(), serde_json::json!("Ligações e reações"));
        let service = MemoryService::with_records([seeded]);
        let id = EntityId::new(1).unwrap();

        let record = reactivate(&service, id).await.unwrap();

        assert!(record.is_active());
        assert_eq!(record.name, "Química");
        assert_eq!(record.weekly_hours, 4);
        assert_eq!(service.snapshot()[0].extra["ementa"], "Ligações e reações");
        assert!(service.get_inactives().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let service = MemoryService::<Subject>::new();
        let id = EntityId::new(42).unwrap();
        assert!(matches!(
            service.get_by_id(id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(service.delete(id).await, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_armed_failure() {
        let service = MemoryService::with_records([subject("Álgebra", true)]);
        service.set_failure(Some(ServiceError::Http("offline".to_string())));
        assert!(service.get_actives().await.is_err());
        service.set_failure(None);
        assert_eq!(service.get_actives().await.unwrap().len(), 1);
    }
}
