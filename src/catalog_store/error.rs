//! Error taxonomy for catalog store operations.

use thiserror::Error;

/// Errors surfaced by catalog write and lookup operations.
///
/// `NotFound` is the subject of the operation being absent, while
/// `MissingReference` is a dangling foreign key in the submitted data; the
/// two map to different messages even though both end up as HTTP 404.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },

    #[error("referenced {entity} with id {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("{entity} with id {id} still has {count} dependent {dependents}")]
    HasDependents {
        entity: &'static str,
        id: i64,
        count: i64,
        dependents: &'static str,
    },

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
