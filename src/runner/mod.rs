//! The runner is responsible for replaying a CSV file of operations against a
//! store and writing the final balance report to a writer.
//!
//! This module provides both a synchronous and an asynchronous runner
//! implementation. Both treat malformed CSV as fatal and store-level
//! rejections (account already open, unknown account, stale balance) as
//! per-operation noise: logged, skipped, and the replay continues.

mod async_runner;
mod sync_runner;

pub use async_runner::run as run_async;
pub use sync_runner::run;

use crate::error::Error;
use crate::model::{OpKind, Operation, Purse, User};
use crate::store::{Storage, Transaction};

/// Applies one replay operation to the store. `open` maps to the guarded
/// insert, `transfer` to a CAS change verified against the balance just
/// loaded, which in this serialized replay cannot conflict.
fn apply_operation<S: Storage>(store: &mut S, operation: &Operation) -> Result<(), Error> {
    match operation.kind {
        OpKind::Open => store
            .transaction()
            .put_if_absent(User::new(operation.user, Purse(operation.amount))),
        OpKind::Transfer => {
            let user = store.load(operation.user)?;
            store
                .transaction()
                .change(user.id, operation.amount, user.purse)
        }
    }
}
