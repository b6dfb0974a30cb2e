//! Storage layer for the balance store. Provides:
//! - The repository and CAS transaction contracts ([`Storage`], [`Transaction`])
//! - A single-threaded in-memory implementation ([`MemoryStore`])
//! - A reader/writer-locked wrapper for concurrent callers ([`SharedStore`])

mod memory;
mod shared;

pub use memory::MemoryStore;
pub use shared::SharedStore;

use crate::error::Error;
use crate::model::{BalancesView, Purse, User, UserId};

/// CAS-style transactional operations.
///
/// Both operations are check-then-write sequences that each implementation
/// must execute as one indivisible unit with respect to every other call into
/// the same store instance.
pub trait Transaction {
    /// Inserts the user only if the key is absent. Fails with
    /// [`Error::AlreadyExists`] otherwise, leaving the stored record intact.
    fn put_if_absent(&mut self, user: User) -> Result<(), Error>;

    /// Applies `delta` to the stored balance of `id`, but only if the stored
    /// balance still equals `expected`. Fails with [`Error::NotFound`] for an
    /// absent key and [`Error::Conflict`] for a stale `expected`; either way
    /// the stored value is untouched.
    ///
    /// A single attempt may legitimately fail under contention. Callers that
    /// need eventual success must re-`load`, recompute `expected` and retry.
    fn change(&mut self, id: UserId, delta: i64, expected: Purse) -> Result<(), Error>;
}

/// Repository contract for account records.
pub trait Storage {
    /// Returns a value snapshot of the record, never an alias into internal
    /// state. Fails with [`Error::NotFound`] if the key is absent.
    fn load(&self, id: UserId) -> Result<User, Error>;

    /// Unconditionally inserts or overwrites the record keyed by `user.id`.
    /// Last writer wins; composing this with a separate `load` is unsafe
    /// whenever other writers can run in the window between the two calls.
    fn save(&mut self, user: User) -> Result<(), Error>;

    /// Returns an independent snapshot copy of all current balances.
    fn list(&self) -> BalancesView;

    /// Returns the handle exposing the CAS-style operations.
    fn transaction(&mut self) -> &mut dyn Transaction;
}
