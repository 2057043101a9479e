//! Page routes
//!
//! ```text
//! /                         home
//! /{entity}                 list
//! /{entity}/novo            create form
//! /{entity}/editar/{id}     edit form
//! /{entity}/{id}            detail
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::identity::{EntityId, EntityKind, IdParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    List(EntityKind),
    New(EntityKind),
    Edit(EntityKind, EntityId),
    Detail(EntityKind, EntityId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Entity(#[from] IdParseError),

    #[error("no page at '{0}'")]
    Unknown(String),
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let Some((first, rest)) = segments.split_first() else {
            return Ok(Route::Home);
        };
        let kind = EntityKind::from_str(first)?;

        match rest {
            [] => Ok(Route::List(kind)),
            ["novo"] => Ok(Route::New(kind)),
            ["editar", id] => Ok(Route::Edit(kind, id.parse()?)),
            [id] => Ok(Route::Detail(kind, id.parse()?)),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Route::Home => None,
            Route::List(kind) | Route::New(kind) => Some(*kind),
            Route::Edit(kind, _) | Route::Detail(kind, _) => Some(*kind),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::List(kind) => write!(f, "/{}", kind.resource()),
            Route::New(kind) => write!(f, "/{}/novo", kind.resource()),
            Route::Edit(kind, id) => write!(f, "/{}/editar/{}", kind.resource(), id),
            Route::Detail(kind, id) => write!(f, "/{}/{}", kind.resource(), id),
        }
    }
}
