use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque account identifier. Comparable and hashable, not semantically numeric.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed account balance. May legitimately go negative; the storage layer
/// enforces no floor or ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Purse(pub i64);

impl Purse {
    pub const ZERO: Purse = Purse(0);

    /// Returns this balance shifted by a signed delta.
    pub fn apply(self, delta: i64) -> Purse {
        Purse(self.0 + delta)
    }
}

impl fmt::Display for Purse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account record. Plain value type: equality is structural, and copies
/// never alias storage internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub purse: Purse,
}

impl User {
    pub fn new(id: UserId, purse: Purse) -> Self {
        Self { id, purse }
    }
}

/// Snapshot of all balances, keyed by account. Owned copy; mutating it never
/// affects the store it came from.
pub type BalancesView = HashMap<UserId, Purse>;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Open,
    Transfer,
}

/// One row of a replay input file: `op,user,amount`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    #[serde(rename = "op")]
    pub kind: OpKind,
    pub user: UserId,
    pub amount: i64,
}

/// One row of the balance report: `user,purse`.
#[derive(Debug, Serialize, PartialEq)]
pub struct BalanceRow {
    pub user: UserId,
    pub purse: Purse,
}

impl From<(UserId, Purse)> for BalanceRow {
    fn from((user, purse): (UserId, Purse)) -> Self {
        Self { user, purse }
    }
}
