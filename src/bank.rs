//! Account-keeping facade over the storage layer.
//!
//! The bank is a consumer of the store's contract, not an extension of it:
//! balance inquiries go through `load`/`list`, transfers through a single CAS
//! `change` verified against the balance just observed. A conflicting or
//! missing account surfaces to the caller as-is; the bank never retries on
//! its own.

use crate::error::Error;
use crate::model::{BalancesView, Purse, User, UserId};
use crate::store::{MemoryStore, SharedStore, Storage};

/// Every account opens with this balance.
const OPENING_BALANCE: Purse = Purse(100);

pub struct Bank<S = MemoryStore> {
    store: SharedStore<S>,
}

impl Bank<MemoryStore> {
    pub fn in_memory() -> Self {
        Bank::new(SharedStore::new(MemoryStore::new()))
    }
}

impl<S: Storage> Bank<S> {
    pub fn new(store: SharedStore<S>) -> Self {
        Self { store }
    }

    /// Opens a new account with the standard opening balance. Fails with
    /// [`Error::AlreadyExists`] if the account is already open.
    pub fn open_account(&self, id: UserId) -> Result<(), Error> {
        self.store.put_if_absent(User::new(id, OPENING_BALANCE))
    }

    pub fn balance(&self, id: UserId) -> Result<Purse, Error> {
        self.store.load(id).map(|user| user.purse)
    }

    pub fn balances(&self) -> BalancesView {
        self.store.list()
    }

    /// Applies a signed amount to an account in one CAS attempt. A stale read
    /// comes back as [`Error::Conflict`]; retrying is the caller's decision.
    pub fn transfer(&self, id: UserId, amount: i64) -> Result<(), Error> {
        let user = self.store.load(id)?;
        self.store.change(user.id, amount, user.purse)
    }
}
