mod bank;
mod csv_utils;
mod error;
mod harness;
mod model;
mod runner;
mod store;

pub use bank::Bank;
pub use error::Error;
pub use harness::{
    expected_total, naive_increment, run_rounds, single_attempt_increment, spin_increment,
    Contention, HarnessError,
};
pub use model::{BalanceRow, BalancesView, OpKind, Operation, Purse, User, UserId};
pub use runner::{run, run_async};
pub use store::{MemoryStore, SharedStore, Storage, Transaction};
