use std::error::Error;
use std::io::Write;
use std::path::Path;

use crate::{
    csv_utils::{read_csv, write_balances},
    model::Operation,
    store::{MemoryStore, Storage},
};

/// Replays the operations in the given input file and writes the balance
/// report to the provided writer.
///
/// # Arguments
/// * `input_path` - Path to the input CSV file containing operations
/// * `writer` - Where to write the final balances (e.g. stdout)
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read
/// * The CSV is malformed
/// * Writing to the output fails
pub fn run<P, W>(input_path: P, writer: W) -> Result<(), Box<dyn Error>>
where
    P: AsRef<Path>,
    W: Write,
{
    let mut store = MemoryStore::new();

    let operations = read_csv::<Operation, _>(input_path)?;
    for operation in operations {
        // CSV parsing errors are critical - propagate them
        let operation = operation?;
        // Store-level rejections are tolerated; the replay is best-effort
        if let Err(err) = super::apply_operation(&mut store, &operation) {
            tracing::warn!(%err, ?operation, "operation skipped");
        }
    }

    write_balances(writer, store.list())?;
    Ok(())
}
