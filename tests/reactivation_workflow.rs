//! Behavior of the reactivation modal against a scripted source

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use academia::core::{
    EntityId, EntityKind, InactiveModal, ModalBody, ModalState, ModalView, ReactivateOutcome,
    ReactivationSource, ReactivationWorkflow, Record, ServiceError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Person {
    id: Option<EntityId>,
    nome: String,
    ativo: Option<bool>,
}

impl Record for Person {
    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn active_flag(&self) -> Option<bool> {
        self.ativo
    }

    fn set_active(&mut self, active: bool) {
        self.ativo = Some(active);
    }

    fn matches(&self, term: &str) -> bool {
        self.nome.to_lowercase().contains(&term.to_lowercase())
    }

    fn label(&self) -> String {
        self.nome.clone()
    }
}

fn person(id: u64, nome: &str) -> Person {
    Person {
        id: Some(EntityId::new(id).unwrap()),
        nome: nome.to_string(),
        ativo: Some(false),
    }
}

fn id(n: u64) -> EntityId {
    EntityId::new(n).unwrap()
}

/// Replays fetch results in order (an empty list once exhausted) and
/// records every call. Gates hold a call until notified.
#[derive(Default)]
struct Scripted {
    fetch_results: Mutex<VecDeque<Result<Vec<Person>, ServiceError>>>,
    reactivate_error: Mutex<Option<ServiceError>>,
    fetches: AtomicUsize,
    reactivated: Mutex<Vec<EntityId>>,
    fetch_gate: Option<Arc<Notify>>,
    fetch_entered: Notify,
    reactivate_gate: Option<Arc<Notify>>,
    reactivate_entered: Notify,
}

impl Scripted {
    fn new(results: Vec<Result<Vec<Person>, ServiceError>>) -> Self {
        Self {
            fetch_results: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    fn failing_reactivation(self, error: ServiceError) -> Self {
        *self.reactivate_error.lock().unwrap() = Some(error);
        self
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn reactivated(&self) -> Vec<EntityId> {
        self.reactivated.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReactivationSource<Person> for Scripted {
    async fn fetch_inactive(&self) -> Result<Vec<Person>, ServiceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_entered.notify_one();
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        self.fetch_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn reactivate(&self, id: EntityId) -> Result<(), ServiceError> {
        self.reactivated.lock().unwrap().push(id);
        self.reactivate_entered.notify_one();
        if let Some(gate) = &self.reactivate_gate {
            gate.notified().await;
        }
        match self.reactivate_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn workflow(source: Arc<Scripted>) -> ReactivationWorkflow<Person> {
    let modal = InactiveModal::new("Inactive Students", &["ID", "Name"], |p: &Person| {
        vec![
            p.id.map(|id| id.to_string()).unwrap_or_default(),
            p.nome.clone(),
        ]
    });
    ReactivationWorkflow::new(modal, source)
}

fn body(view: ModalView) -> ModalBody {
    match view {
        ModalView::Shown { body, .. } => body,
        ModalView::Hidden => panic!("modal is hidden"),
    }
}

fn server_error(message: Option<&str>) -> ServiceError {
    ServiceError::Status {
        status: 500,
        message: message.map(str::to_string),
    }
}

#[tokio::test]
async fn test_open_fetches_exactly_once() {
    let source = Arc::new(Scripted::new(vec![Ok(vec![person(1, "Ana")])]));
    let wf = workflow(source.clone());

    wf.open().await;
    wf.open().await;

    assert!(wf.is_visible());
    assert_eq!(source.fetches(), 1);
    assert_eq!(wf.state(), ModalState::Loaded(vec![person(1, "Ana")]));
}

#[tokio::test]
async fn test_reopening_fetches_again() {
    let source = Arc::new(Scripted::new(vec![
        Ok(vec![person(1, "Ana")]),
        Ok(vec![person(1, "Ana"), person(2, "Bruno")]),
    ]));
    let wf = workflow(source.clone());

    wf.open().await;
    wf.close();
    wf.open().await;

    assert_eq!(source.fetches(), 2);
    match body(wf.view()) {
        ModalBody::Table(table) => assert_eq!(table.rows.len(), 2),
        other => panic!("unexpected body: {:?}", other),
    }
}

#[tokio::test]
async fn test_loading_is_shown_while_fetch_is_pending() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(Scripted {
        fetch_gate: Some(gate.clone()),
        ..Scripted::new(vec![Ok(vec![person(1, "Ana")])])
    });
    let wf = workflow(source.clone());

    tokio::join!(wf.open(), async {
        source.fetch_entered.notified().await;
        assert_eq!(
            body(wf.view()),
            ModalBody::Loading("Loading inactive records...".to_string())
        );
        gate.notify_one();
    });

    assert!(matches!(body(wf.view()), ModalBody::Table(_)));
}

#[tokio::test]
async fn test_fetch_failure_shows_server_message() {
    let source = Arc::new(Scripted::new(vec![Err(server_error(Some(
        "Banco de dados indisponível",
    )))]));
    let wf = workflow(source);

    wf.open().await;

    assert_eq!(
        body(wf.view()),
        ModalBody::Error("Banco de dados indisponível".to_string())
    );
}

#[tokio::test]
async fn test_fetch_failure_without_message_uses_fallback() {
    let source = Arc::new(Scripted::new(vec![Err(server_error(None))]));
    let wf = workflow(source);

    wf.open().await;

    assert_eq!(
        wf.state(),
        ModalState::Error("Failed to load records".to_string())
    );
}

#[tokio::test]
async fn test_empty_result_shows_empty_message() {
    let source = Arc::new(Scripted::new(vec![Ok(Vec::new())]));
    let wf = workflow(source);

    wf.open().await;

    assert_eq!(
        body(wf.view()),
        ModalBody::Empty("No inactive records found.".to_string())
    );
}

#[tokio::test]
async fn test_reactivating_the_only_record_empties_the_modal() {
    let source = Arc::new(Scripted::new(vec![Ok(vec![person(1, "Ana")]), Ok(Vec::new())]));
    let wf = workflow(source.clone());

    wf.open().await;
    match body(wf.view()) {
        ModalBody::Table(table) => {
            assert_eq!(table.headers, vec!["ID", "Name", "Actions"]);
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0].cells, vec!["1", "Ana"]);
            assert_eq!(table.rows[0].action, Some("Reactivate"));
        }
        other => panic!("unexpected body: {:?}", other),
    }

    let outcome = wf.reactivate(id(1)).await;

    assert_eq!(outcome, ReactivateOutcome::Reactivated);
    assert_eq!(source.reactivated(), vec![id(1)]);
    assert_eq!(source.fetches(), 2);
    assert_eq!(
        body(wf.view()),
        ModalBody::Empty("No inactive records found.".to_string())
    );
}

#[tokio::test]
async fn test_reactivation_failure_shows_error_without_refetch() {
    let source = Arc::new(
        Scripted::new(vec![Ok(vec![person(1, "Ana")])])
            .failing_reactivation(server_error(Some("Aluno com matrícula duplicada"))),
    );
    let wf = workflow(source.clone());
    wf.open().await;

    let outcome = wf.reactivate(id(1)).await;

    assert_eq!(
        outcome,
        ReactivateOutcome::Failed("Aluno com matrícula duplicada".to_string())
    );
    assert_eq!(source.fetches(), 1);
    assert_eq!(
        body(wf.view()),
        ModalBody::Error("Aluno com matrícula duplicada".to_string())
    );
}

#[tokio::test]
async fn test_reactivation_failure_without_message_uses_fallback() {
    let source = Arc::new(
        Scripted::new(vec![Ok(vec![person(1, "Ana")])]).failing_reactivation(server_error(None)),
    );
    let wf = workflow(source);
    wf.open().await;

    let outcome = wf.reactivate(id(1)).await;

    assert_eq!(
        outcome,
        ReactivateOutcome::Failed("Failed to reactivate record".to_string())
    );
}

#[tokio::test]
async fn test_reactivate_while_closed_sends_nothing() {
    let source = Arc::new(Scripted::new(vec![Ok(vec![person(1, "Ana")])]));
    let wf = workflow(source.clone());

    assert_eq!(wf.reactivate(id(1)).await, ReactivateOutcome::Ignored);
    assert!(source.reactivated().is_empty());
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn test_close_hides_modal_and_calls_on_close() {
    let closed = Arc::new(AtomicUsize::new(0));
    let counter = closed.clone();
    let source = Arc::new(Scripted::new(vec![Ok(vec![person(1, "Ana")])]));
    let wf = workflow(source).with_on_close(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    wf.open().await;
    wf.close();

    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(!wf.is_visible());
    assert_eq!(wf.view(), ModalView::Hidden);
    assert_eq!(wf.state(), ModalState::Idle);
}

#[tokio::test]
async fn test_fetch_resolving_after_close_is_discarded() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(Scripted {
        fetch_gate: Some(gate.clone()),
        ..Scripted::new(vec![Ok(vec![person(1, "Ana")])])
    });
    let wf = workflow(source.clone());

    tokio::join!(wf.open(), async {
        source.fetch_entered.notified().await;
        wf.close();
        gate.notify_one();
    });

    assert_eq!(source.fetches(), 1);
    assert_eq!(wf.state(), ModalState::Idle);
    assert_eq!(wf.view(), ModalView::Hidden);
}

#[tokio::test]
async fn test_reactivation_resolving_after_close_skips_reload() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(Scripted {
        reactivate_gate: Some(gate.clone()),
        ..Scripted::new(vec![Ok(vec![person(1, "Ana")])])
    });
    let wf = workflow(source.clone());
    wf.open().await;

    let (outcome, _) = tokio::join!(wf.reactivate(id(1)), async {
        source.reactivate_entered.notified().await;
        wf.close();
        gate.notify_one();
    });

    assert_eq!(outcome, ReactivateOutcome::Reactivated);
    assert_eq!(source.fetches(), 1);
    assert_eq!(wf.view(), ModalView::Hidden);
}

#[tokio::test]
async fn test_concurrent_reactivations_last_reload_wins() {
    let source = Arc::new(Scripted::new(vec![
        Ok(vec![person(1, "Ana"), person(2, "Bruno")]),
        Ok(vec![person(2, "Bruno")]),
        Ok(Vec::new()),
    ]));
    let wf = workflow(source.clone());
    wf.open().await;

    let (first, second) = tokio::join!(wf.reactivate(id(1)), wf.reactivate(id(2)));

    assert_eq!(first, ReactivateOutcome::Reactivated);
    assert_eq!(second, ReactivateOutcome::Reactivated);
    assert_eq!(source.reactivated(), vec![id(1), id(2)]);
    assert_eq!(source.fetches(), 3);
    assert_eq!(wf.state(), ModalState::Loaded(Vec::new()));
}
