//! Core module - records, services and the screen controllers built on them

pub mod config;
pub mod entity;
pub mod identity;
pub mod listing;
#[cfg(test)]
pub mod memory;
pub mod reactivation;
pub mod rest;
pub mod route;
pub mod service;

pub use config::{Config, ConfigError};
pub use entity::{Record, Status};
pub use identity::{EntityId, EntityKind, IdParseError};
pub use listing::ListController;
pub use reactivation::{
    FnSource, InactiveModal, ModalBody, ModalRow, ModalState, ModalTable, ModalView,
    ReactivateOutcome, ReactivationSource, ReactivationWorkflow,
};
pub use rest::{ApiClient, RestService};
pub use route::{Route, RouteError};
pub use service::{EntityService, ServiceError};
