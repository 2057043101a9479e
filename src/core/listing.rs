//! List screen controller shared by every entity
//!
//! Holds the active records, the current search term and the inline error
//! shown above the table. Deleting and reactivating reload the list.
//!
//! A list shared behind a [`tokio::sync::Mutex`] is also the source of its
//! reactivation modal: the modal reads inactive records from the same
//! service and hands reactivation back to the list, which then reloads.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::entity::Record;
use crate::core::identity::EntityId;
use crate::core::reactivation::ReactivationSource;
use crate::core::service::{self, EntityService, ServiceError};

pub struct ListController<T: Record> {
    service: Arc<dyn EntityService<T>>,
    items: Vec<T>,
    search: String,
    error: Option<String>,
}

impl<T: Record> ListController<T> {
    pub fn new(service: Arc<dyn EntityService<T>>) -> Self {
        Self {
            service,
            items: Vec::new(),
            search: String::new(),
            error: None,
        }
    }

    pub fn service(&self) -> Arc<dyn EntityService<T>> {
        Arc::clone(&self.service)
    }

    /// Fetch the active records. A failure is kept as the inline error and
    /// the previous items are cleared.
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        match self.service.get_actives().await {
            Ok(items) => {
                tracing::debug!(kind = %T::KIND, count = items.len(), "list loaded");
                self.items = items;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.items.clear();
                self.error = Some(e.user_message(&format!("Failed to load {}", T::KIND.plural())));
                Err(e)
            }
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items matching the search term; everything when the term is blank
    pub fn filtered(&self) -> Vec<&T> {
        let term = self.search.trim();
        if term.is_empty() {
            return self.items.iter().collect();
        }
        self.items.iter().filter(|item| item.matches(term)).collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Soft delete, then reload. A failed reload only sets the inline error.
    pub async fn delete(&mut self, id: EntityId) -> Result<(), ServiceError> {
        if let Err(e) = self.service.delete(id).await {
            self.error = Some(e.user_message(&format!("Failed to delete {}", T::KIND.singular())));
            return Err(e);
        }
        tracing::debug!(kind = %T::KIND, %id, "record deactivated");
        self.reload().await;
        Ok(())
    }

    /// Flip a record back to active, then reload
    pub async fn reactivate(&mut self, id: EntityId) -> Result<T, ServiceError> {
        let record = match service::reactivate(self.service.as_ref(), id).await {
            Ok(record) => record,
            Err(e) => {
                self.error = Some(e.user_message(&format!(
                    "Failed to reactivate {}",
                    T::KIND.singular()
                )));
                return Err(e);
            }
        };
        self.reload().await;
        Ok(record)
    }

    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!(kind = %T::KIND, error = %e, "reload failed");
        }
    }
}

#[async_trait]
impl<T: Record> ReactivationSource<T> for Mutex<ListController<T>> {
    async fn fetch_inactive(&self) -> Result<Vec<T>, ServiceError> {
        let service = self.lock().await.service();
        service.get_inactives().await
    }

    async fn reactivate(&self, id: EntityId) -> Result<(), ServiceError> {
        self.lock().await.reactivate(id).await.map(|_| ())
    }
}
