use parking_lot::RwLock;

use crate::error::Error;
use crate::model::{BalancesView, Purse, User, UserId};
use crate::store::{MemoryStore, Storage, Transaction};

/// Thread-safe wrapper around any [`Storage`] implementation.
///
/// The wrapper owns the decorated store and a reader/writer lock, and
/// delegates every call while holding the lock for the whole delegated
/// call. `load`/`list` run under the shared lock,
/// `save`/`put_if_absent`/`change` under the exclusive lock, so each
/// individual call is atomic with respect to every other call on the same
/// wrapper instance.
///
/// The guarantee is whole-call, not whole-session: a caller's own `load`
/// followed by a separate `save` is NOT atomic, and another writer may run in
/// between. Use [`Transaction::change`] with the balance observed by the
/// `load` to detect exactly that.
#[derive(Debug, Default)]
pub struct SharedStore<S = MemoryStore> {
    inner: RwLock<S>,
}

impl<S: Storage> SharedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Consumes the wrapper and returns the decorated store.
    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }

    pub fn load(&self, id: UserId) -> Result<User, Error> {
        self.inner.read().load(id)
    }

    pub fn list(&self) -> BalancesView {
        self.inner.read().list()
    }

    pub fn save(&self, user: User) -> Result<(), Error> {
        self.inner.write().save(user)
    }

    pub fn put_if_absent(&self, user: User) -> Result<(), Error> {
        self.inner.write().transaction().put_if_absent(user)
    }

    pub fn change(&self, id: UserId, delta: i64, expected: Purse) -> Result<(), Error> {
        self.inner.write().transaction().change(id, delta, expected)
    }
}

/// A wrapped store still satisfies the sequential contract, so it can stand
/// in wherever a plain [`Storage`] is expected.
impl<S: Storage> Storage for SharedStore<S> {
    fn load(&self, id: UserId) -> Result<User, Error> {
        SharedStore::load(self, id)
    }

    fn save(&mut self, user: User) -> Result<(), Error> {
        SharedStore::save(self, user)
    }

    fn list(&self) -> BalancesView {
        SharedStore::list(self)
    }

    fn transaction(&mut self) -> &mut dyn Transaction {
        self
    }
}

impl<S: Storage> Transaction for SharedStore<S> {
    fn put_if_absent(&mut self, user: User) -> Result<(), Error> {
        SharedStore::put_if_absent(self, user)
    }

    fn change(&mut self, id: UserId, delta: i64, expected: Purse) -> Result<(), Error> {
        SharedStore::change(self, id, delta, expected)
    }
}
