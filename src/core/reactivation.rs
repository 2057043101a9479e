//! Inactive-record reactivation workflow
//!
//! A reusable modal controller: when opened it loads every inactive record
//! of one kind, renders them with caller-supplied column renderers, and lets
//! the user reactivate any single row, after which the list is reloaded.
//!
//! ```text
//! Idle --open--> Loading --ok--> Loaded --reactivate ok--> Loading
//!                        \-err-> Error  <-reactivate err--/
//! (any) --close--> Idle
//! ```
//!
//! All operations take `&self`: reactivations of different rows may run
//! concurrently, and whichever reload finishes last decides what is shown.
//! Results arriving after the modal was closed (or closed and reopened) are
//! dropped.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::core::entity::Record;
use crate::core::identity::EntityId;
use crate::core::service::ServiceError;

pub const LOADING_MESSAGE: &str = "Loading inactive records...";
pub const EMPTY_MESSAGE: &str = "No inactive records found.";
pub const LOAD_FAILED: &str = "Failed to load records";
pub const REACTIVATE_FAILED: &str = "Failed to reactivate record";
pub const ACTIONS_HEADER: &str = "Actions";
pub const REACTIVATE_LABEL: &str = "Reactivate";

/// Where the modal gets its records from and how it reactivates one
#[async_trait]
pub trait ReactivationSource<T>: Send + Sync {
    /// Every currently inactive record
    async fn fetch_inactive(&self) -> Result<Vec<T>, ServiceError>;

    /// Mark one record active in the backing store
    async fn reactivate(&self, id: EntityId) -> Result<(), ServiceError>;
}

/// Source built from two async closures
pub struct FnSource<T, F, R> {
    fetch: F,
    reactivate: R,
    _record: PhantomData<fn() -> T>,
}

impl<T, F, R> FnSource<T, F, R> {
    pub fn new(fetch: F, reactivate: R) -> Self {
        Self {
            fetch,
            reactivate,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F, FFut, R, RFut> ReactivationSource<T> for FnSource<T, F, R>
where
    T: Send + 'static,
    F: Fn() -> FFut + Send + Sync,
    FFut: Future<Output = Result<Vec<T>, ServiceError>> + Send,
    R: Fn(EntityId) -> RFut + Send + Sync,
    RFut: Future<Output = Result<(), ServiceError>> + Send,
{
    async fn fetch_inactive(&self) -> Result<Vec<T>, ServiceError> {
        (self.fetch)().await
    }

    async fn reactivate(&self, id: EntityId) -> Result<(), ServiceError> {
        (self.reactivate)(id).await
    }
}

/// Renders the domain cells of one row; must line up with the column labels
pub type RowRenderer<T> = Arc<dyn Fn(&T) -> Vec<String> + Send + Sync>;

/// Presentation settings supplied by the list screen that owns the modal
#[derive(Clone)]
pub struct InactiveModal<T> {
    pub title: String,
    pub columns: Vec<String>,
    pub render_row: RowRenderer<T>,
}

impl<T> InactiveModal<T> {
    pub fn new<F>(title: impl Into<String>, columns: &[&str], render_row: F) -> Self
    where
        F: Fn(&T) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            render_row: Arc::new(render_row),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<T> {
    /// Not visible
    Idle,
    Loading,
    Loaded(Vec<T>),
    Error(String),
}

/// What the modal shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    Hidden,
    Shown { title: String, body: ModalBody },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    Loading(String),
    Error(String),
    Empty(String),
    Table(ModalTable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTable {
    /// Column labels followed by the actions column
    pub headers: Vec<String>,
    pub rows: Vec<ModalRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalRow {
    pub id: Option<EntityId>,
    pub cells: Vec<String>,
    /// Label of the row action, present when the row can be reactivated
    pub action: Option<&'static str>,
}

/// Outcome of a reactivation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactivateOutcome {
    /// The record was reactivated and the list reloaded
    Reactivated,
    /// The source failed; the modal now shows this message
    Failed(String),
    /// The modal was not visible, nothing was sent
    Ignored,
}

struct Inner<T> {
    visible: bool,
    state: ModalState<T>,
    /// Bumped on every open and close; stale results are discarded
    generation: u64,
}

pub struct ReactivationWorkflow<T> {
    modal: InactiveModal<T>,
    source: Arc<dyn ReactivationSource<T>>,
    on_close: Option<Box<dyn Fn() + Send + Sync>>,
    inner: Mutex<Inner<T>>,
}

impl<T: Record> ReactivationWorkflow<T> {
    pub fn new(modal: InactiveModal<T>, source: Arc<dyn ReactivationSource<T>>) -> Self {
        Self {
            modal,
            source,
            on_close: None,
            inner: Mutex::new(Inner {
                visible: false,
                state: ModalState::Idle,
                generation: 0,
            }),
        }
    }

    /// Callback invoked whenever the user dismisses the modal
    pub fn with_on_close<F>(mut self, on_close: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_close = Some(Box::new(on_close));
        self
    }

    pub fn title(&self) -> &str {
        &self.modal.title
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    pub fn state(&self) -> ModalState<T> {
        self.lock().state.clone()
    }

    /// Show the modal and load inactive records. Opening an already visible
    /// modal does nothing; every fresh open fetches again.
    pub async fn open(&self) {
        let generation = {
            let mut inner = self.lock();
            if inner.visible {
                return;
            }
            inner.visible = true;
            inner.generation += 1;
            inner.state = ModalState::Loading;
            inner.generation
        };
        tracing::debug!(title = %self.modal.title, generation, "modal opened");
        self.load(generation).await;
    }

    /// Hide the modal. Always allowed; in-flight requests keep running but
    /// their results are ignored.
    pub fn close(&self) {
        {
            let mut inner = self.lock();
            inner.visible = false;
            inner.generation += 1;
            inner.state = ModalState::Idle;
        }
        tracing::debug!(title = %self.modal.title, "modal closed");
        if let Some(on_close) = &self.on_close {
            on_close();
        }
    }

    /// Reactivate one row, then reload the list on success.
    ///
    /// A failure replaces the list with the error message.
    pub async fn reactivate(&self, id: EntityId) -> ReactivateOutcome {
        let generation = {
            let inner = self.lock();
            if !inner.visible {
                return ReactivateOutcome::Ignored;
            }
            inner.generation
        };

        match self.source.reactivate(id).await {
            Ok(()) => {
                {
                    let mut inner = self.lock();
                    if !inner.is_current(generation) {
                        tracing::debug!(%id, "reactivated after close, skipping reload");
                        return ReactivateOutcome::Reactivated;
                    }
                    inner.state = ModalState::Loading;
                }
                tracing::debug!(%id, "record reactivated, reloading");
                self.load(generation).await;
                ReactivateOutcome::Reactivated
            }
            Err(e) => {
                let message = e.user_message(REACTIVATE_FAILED);
                tracing::warn!(%id, error = %e, "reactivation failed");
                let mut inner = self.lock();
                if inner.is_current(generation) {
                    inner.state = ModalState::Error(message.clone());
                }
                ReactivateOutcome::Failed(message)
            }
        }
    }

    /// Current rendering of the modal
    pub fn view(&self) -> ModalView {
        let inner = self.lock();
        if !inner.visible {
            return ModalView::Hidden;
        }

        let body = match &inner.state {
            ModalState::Idle | ModalState::Loading => ModalBody::Loading(LOADING_MESSAGE.to_string()),
            ModalState::Error(message) => ModalBody::Error(message.clone()),
            ModalState::Loaded(items) if items.is_empty() => {
                ModalBody::Empty(EMPTY_MESSAGE.to_string())
            }
            ModalState::Loaded(items) => ModalBody::Table(self.table(items)),
        };

        ModalView::Shown {
            title: self.modal.title.clone(),
            body,
        }
    }

    fn table(&self, items: &[T]) -> ModalTable {
        let mut headers = self.modal.columns.clone();
        headers.push(ACTIONS_HEADER.to_string());

        let rows = items
            .iter()
            .map(|item| {
                let id = item.id();
                ModalRow {
                    id,
                    cells: (self.modal.render_row)(item),
                    action: id.map(|_| REACTIVATE_LABEL),
                }
            })
            .collect();

        ModalTable { headers, rows }
    }

    async fn load(&self, generation: u64) {
        let result = self.source.fetch_inactive().await;

        let mut inner = self.lock();
        if !inner.is_current(generation) {
            tracing::debug!(generation, "discarding stale inactive list");
            return;
        }
        inner.state = match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "inactive records loaded");
                ModalState::Loaded(items)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load inactive records");
                ModalState::Error(e.user_message(LOAD_FAILED))
            }
        };
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Inner<T> {
    fn is_current(&self, generation: u64) -> bool {
        self.visible && self.generation == generation
    }
}
