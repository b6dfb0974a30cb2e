//! Domain-specific errors for the balance store.
//!
//! All three variants are local, recoverable outcomes: the stored state is
//! left untouched and the caller decides what to do next. Only `Conflict` is
//! retryable (re-load, recompute the expected balance, retry the change);
//! the store itself never retries.

use thiserror::Error;

use crate::model::{Purse, UserId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `load` or `change` targeted a key absent from the store.
    #[error("there is no such user {0}")]
    NotFound(UserId),

    /// `put_if_absent` targeted a key already present. The stored record is
    /// unchanged, indistinguishable from a no-op.
    #[error("can't put user {0} into the storage: already present")]
    AlreadyExists(UserId),

    /// The balance read for verification went stale before `change` ran.
    #[error("balance of user {id} has changed since last read: expected {expected}, found {actual}")]
    Conflict {
        id: UserId,
        expected: Purse,
        actual: Purse,
    },
}

impl Error {
    /// True for the one retryable variant.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}
