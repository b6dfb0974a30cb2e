//! Concurrency verification harness.
//!
//! Drives many concurrent workers against a [`SharedStore`] with one of
//! several access patterns and reports the balance the store converged to.
//! The patterns span the correctness boundary this crate is about:
//!
//! - [`naive_increment`]: `load` + `save` as two separate top-level calls.
//!   Each call is atomic through the wrapper, the two-call sequence is not,
//!   so concurrent workers overwrite each other and increments get lost.
//! - [`single_attempt_increment`]: one CAS `change` per step. Conflicts are
//!   detected instead of silently lost, but a worker gives up on the first
//!   one, so the total still falls short.
//! - [`spin_increment`]: re-load and retry the CAS until it lands. Every
//!   increment is eventually applied and the total converges exactly.

use std::thread;

use thiserror::Error;

use crate::error::Error as StoreError;
use crate::model::{Purse, User, UserId};
use crate::store::{SharedStore, Storage};

/// Contention scenario: `workers` threads, each performing `round * steps`
/// step calls per round, for at most `max_rounds` escalating rounds.
#[derive(Debug, Clone)]
pub struct Contention {
    pub workers: usize,
    pub steps: u64,
    pub max_rounds: u64,
}

impl Default for Contention {
    fn default() -> Self {
        Self {
            workers: 8,
            steps: 100,
            max_rounds: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The round budget ran out before the verdict predicate held. The bound
    /// lives here, outside the store: the spin-retry pattern itself has no
    /// retry cap and may starve under adversarial scheduling.
    #[error("no verdict after {0} rounds")]
    RoundsExhausted(u64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The expected aggregate balance after a clean round: every worker lands
/// every one of its `round * steps` unit increments.
pub fn expected_total(cfg: &Contention, round: u64) -> Purse {
    Purse(cfg.workers as i64 * (round * cfg.steps) as i64)
}

/// Read-modify-write increment as two separate store calls. Lost updates
/// under concurrency; correct only when callers are serialized.
pub fn naive_increment<S: Storage>(store: &SharedStore<S>, id: UserId) -> Result<(), StoreError> {
    let user = store.load(id)?;
    store.save(User::new(user.id, user.purse.apply(1)))
}

/// One CAS attempt verified against the balance just loaded. Legitimately
/// fails with a conflict whenever another writer interleaved.
pub fn single_attempt_increment<S: Storage>(
    store: &SharedStore<S>,
    id: UserId,
) -> Result<(), StoreError> {
    let user = store.load(id)?;
    store.change(user.id, 1, user.purse)
}

/// Re-load and retry the CAS until it lands. Converts conflicts into eventual
/// success; unbounded, so starvation under contention is the caller's risk.
pub fn spin_increment<S: Storage>(store: &SharedStore<S>, id: UserId) -> Result<(), StoreError> {
    loop {
        let user = store.load(id)?;
        match store.change(user.id, 1, user.purse) {
            Ok(()) => return Ok(()),
            Err(err) if err.is_conflict() => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Runs escalating contention rounds until `done(balance, round)` holds.
///
/// Each round resets the account to zero, fans out `cfg.workers` threads each
/// performing `round * cfg.steps` calls of `step`, joins them, and loads the
/// aggregate balance. A worker that hits a store error stops its remaining
/// steps, exactly as a real caller giving up mid-sequence would.
///
/// Returns the observed balance and the round that produced it, or
/// [`HarnessError::RoundsExhausted`] once the external bound is spent.
pub fn run_rounds<S, F, D>(
    store: &SharedStore<S>,
    cfg: &Contention,
    id: UserId,
    step: F,
    done: D,
) -> Result<(Purse, u64), HarnessError>
where
    S: Storage + Send + Sync,
    F: Fn(&SharedStore<S>, UserId) -> Result<(), StoreError> + Sync,
    D: Fn(Purse, u64) -> bool,
{
    for round in 1..=cfg.max_rounds {
        store.save(User::new(id, Purse::ZERO))?;
        tracing::debug!(round, workers = cfg.workers, "starting round");

        thread::scope(|scope| {
            for _ in 0..cfg.workers {
                scope.spawn(|| {
                    for _ in 0..round * cfg.steps {
                        if let Err(err) = step(store, id) {
                            tracing::debug!(%err, "worker stopped early");
                            break;
                        }
                    }
                });
            }
        });

        let observed = store.load(id)?.purse;
        if done(observed, round) {
            tracing::debug!(round, balance = observed.0, "verdict reached");
            return Ok((observed, round));
        }
    }
    Err(HarnessError::RoundsExhausted(cfg.max_rounds))
}
