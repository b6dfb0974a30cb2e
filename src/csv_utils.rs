//! CSV helpers for the replay surface: reading operation files and writing
//! the balance report.

use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;

use crate::model::{BalanceRow, BalancesView};

/// Creates an iterator that reads CSV records from a file.
/// Each record is deserialized into type T.
pub fn read_csv<T, P>(path: P) -> csv::Result<impl Iterator<Item = csv::Result<T>>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?
        .into_deserialize())
}

/// Writes a balance report to the given writer, one `user,purse` row per
/// account, sorted by user id for deterministic output.
pub fn write_balances<W>(writer: W, view: BalancesView) -> csv::Result<()>
where
    W: Write,
{
    let mut balances: Vec<_> = view.into_iter().map(BalanceRow::from).collect();
    balances.sort_by_key(|row| row.user);

    let mut wtr = csv::Writer::from_writer(writer);
    for row in balances {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpKind, Operation, Purse, UserId};

    #[test]
    fn test_read_csv() -> csv::Result<()> {
        let operations: Vec<Operation> =
            read_csv("data/example_ops.csv")?.collect::<Result<_, _>>()?;

        let expected_operations = vec![
            Operation {
                kind: OpKind::Open,
                user: UserId(1),
                amount: 100,
            },
            Operation {
                kind: OpKind::Open,
                user: UserId(2),
                amount: 50,
            },
            Operation {
                kind: OpKind::Transfer,
                user: UserId(1),
                amount: 25,
            },
            Operation {
                kind: OpKind::Transfer,
                user: UserId(2),
                amount: -75,
            },
            Operation {
                kind: OpKind::Transfer,
                user: UserId(3),
                amount: 10,
            },
            Operation {
                kind: OpKind::Open,
                user: UserId(1),
                amount: 999,
            },
            Operation {
                kind: OpKind::Transfer,
                user: UserId(2),
                amount: 5,
            },
        ];
        assert_eq!(operations, expected_operations);

        Ok(())
    }

    #[test]
    fn test_write_balances_sorts_by_user() -> csv::Result<()> {
        let mut view = BalancesView::new();
        view.insert(UserId(3), Purse(-7));
        view.insert(UserId(1), Purse(42));
        view.insert(UserId(2), Purse(0));

        let mut output = Vec::new();
        write_balances(&mut output, view)?;

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "user,purse\n1,42\n2,0\n3,-7\n"
        );
        Ok(())
    }
}
