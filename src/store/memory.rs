use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::Error;
use crate::model::{BalancesView, Purse, User, UserId};
use crate::store::{Storage, Transaction};

/// Single-threaded in-memory store backed by an owned map, with no internal
/// locking.
///
/// The check-then-write sequences in [`Transaction`] are atomic here only
/// because mutating operations take `&mut self`: the borrow checker guarantees
/// a single logical thread of control executes the whole sequence. That also
/// means the concurrent misuse this store would not survive does not compile:
///
/// ```compile_fail
/// use purse_ledger::{MemoryStore, Purse, Storage, User, UserId};
///
/// let mut store = MemoryStore::new();
/// std::thread::scope(|s| {
///     s.spawn(|| store.save(User::new(UserId(1), Purse(1))));
///     s.spawn(|| store.save(User::new(UserId(1), Purse(2))));
/// });
/// ```
///
/// Wrap it in [`crate::SharedStore`] to share it between threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: HashMap<UserId, Purse>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl Storage for MemoryStore {
    fn load(&self, id: UserId) -> Result<User, Error> {
        self.data
            .get(&id)
            .map(|&purse| User::new(id, purse))
            .ok_or(Error::NotFound(id))
    }

    fn save(&mut self, user: User) -> Result<(), Error> {
        self.data.insert(user.id, user.purse);
        Ok(())
    }

    fn list(&self) -> BalancesView {
        self.data.clone()
    }

    fn transaction(&mut self) -> &mut dyn Transaction {
        self
    }
}

impl Transaction for MemoryStore {
    fn put_if_absent(&mut self, user: User) -> Result<(), Error> {
        match self.data.entry(user.id) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(user.id)),
            Entry::Vacant(slot) => {
                slot.insert(user.purse);
                Ok(())
            }
        }
    }

    fn change(&mut self, id: UserId, delta: i64, expected: Purse) -> Result<(), Error> {
        let current = self.load(id)?;
        if current.purse != expected {
            tracing::trace!(%id, %expected, actual = %current.purse, "stale change rejected");
            return Err(Error::Conflict {
                id,
                expected,
                actual: current.purse,
            });
        }
        self.save(User::new(id, current.purse.apply(delta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_of_missing_user_fails() {
        let store = MemoryStore::new();

        let err = store.load(UserId(1)).unwrap_err();
        assert_eq!(err, Error::NotFound(UserId(1)));
        assert_eq!(err.to_string(), "there is no such user 1");
    }

    #[test]
    fn test_save_creates_user() {
        let mut store = MemoryStore::new();
        let u1 = User::new(UserId(1), Purse(1));

        store.save(u1).unwrap();
        assert_eq!(store.load(u1.id).unwrap(), u1);
    }

    #[test]
    fn test_save_rewrites_existing_user() {
        let mut store = MemoryStore::new();
        let u1 = User::new(UserId(1), Purse(1));
        let u2 = User::new(UserId(2), Purse(3));
        let u3 = User::new(UserId(1), Purse(2));

        store.save(u1).unwrap();
        store.save(u2).unwrap();
        store.save(u3).unwrap();

        assert_eq!(store.load(u1.id).unwrap(), u3);
        // Other users are untouched by the rewrite.
        assert_eq!(store.load(u2.id).unwrap(), u2);
    }

    #[test]
    fn test_load_returns_snapshot() {
        let mut store = MemoryStore::new();
        store.save(User::new(UserId(1), Purse(5))).unwrap();

        let mut loaded = store.load(UserId(1)).unwrap();
        loaded.purse = Purse(999);

        // Mutating the returned record never reaches the store.
        assert_eq!(store.load(UserId(1)).unwrap().purse, Purse(5));
    }

    #[test]
    fn test_list_returns_independent_snapshot() {
        let mut store = MemoryStore::new();
        store.save(User::new(UserId(1), Purse(1))).unwrap();
        store.save(User::new(UserId(2), Purse(2))).unwrap();

        let mut view = store.list();
        assert_eq!(view.len(), 2);
        assert_eq!(view[&UserId(1)], Purse(1));

        view.remove(&UserId(1));
        assert_eq!(store.load(UserId(1)).unwrap().purse, Purse(1));
    }

    #[test]
    fn test_put_if_absent_does_not_rewrite() {
        let mut store = MemoryStore::new();
        let u1 = User::new(UserId(1), Purse(1));
        let u2 = User::new(UserId(1), Purse(2));

        store.transaction().put_if_absent(u1).unwrap();

        let err = store.transaction().put_if_absent(u1).unwrap_err();
        assert_eq!(err, Error::AlreadyExists(u1.id));
        assert_eq!(
            store.transaction().put_if_absent(u2).unwrap_err(),
            Error::AlreadyExists(u2.id)
        );

        // Failed puts leave the stored record untouched.
        assert_eq!(store.load(u1.id).unwrap(), u1);
    }

    #[test]
    fn test_change_rejects_unexpected_balance() {
        let mut store = MemoryStore::new();
        let u1 = User::new(UserId(1), Purse(1));
        store.transaction().put_if_absent(u1).unwrap();

        let err = store.transaction().change(u1.id, 1, Purse(2)).unwrap_err();
        assert_eq!(
            err,
            Error::Conflict {
                id: u1.id,
                expected: Purse(2),
                actual: Purse(1),
            }
        );
        assert!(err.is_conflict());
        assert_eq!(store.load(u1.id).unwrap(), u1);

        store.transaction().change(u1.id, 1, Purse(1)).unwrap();
        assert_eq!(store.load(u1.id).unwrap().purse, Purse(2));
    }

    #[test]
    fn test_change_of_missing_user_fails() {
        let mut store = MemoryStore::new();

        assert_eq!(
            store.transaction().change(UserId(1), 1, Purse::ZERO),
            Err(Error::NotFound(UserId(1)))
        );
    }

    #[test]
    fn test_change_allows_negative_balance() {
        let mut store = MemoryStore::new();
        store
            .transaction()
            .put_if_absent(User::new(UserId(1), Purse::ZERO))
            .unwrap();

        store.transaction().change(UserId(1), -1, Purse(0)).unwrap();
        store.transaction().change(UserId(1), -1, Purse(-1)).unwrap();
        assert_eq!(store.load(UserId(1)).unwrap().purse, Purse(-2));

        // A stale expected value still conflicts below zero.
        let err = store.transaction().change(UserId(1), 5, Purse(0)).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.load(UserId(1)).unwrap().purse, Purse(-2));
    }
}
