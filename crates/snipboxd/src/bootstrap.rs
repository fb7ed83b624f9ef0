//! Database bootstrap: automatic first-run init and the `init-db` command.

use std::io::{BufRead, Write};

use snipbox_store::{Store, StoreResult};
use tracing::info;

/// Result of the `init-db` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// No database existed; the schema was created.
    Created,
    /// The existing database was deleted and recreated.
    Reinitialized,
    /// The operator declined; nothing changed.
    Cancelled,
}

/// Create the schema if the database file is absent. Returns whether it did.
pub fn ensure_initialized(store: &Store) -> StoreResult<bool> {
    if store.exists() {
        return Ok(false);
    }
    info!(database = %store, "database not found, initializing");
    store.init_schema()?;
    Ok(true)
}

/// (Re)initialize the database, asking before destroying an existing one.
///
/// Only an explicit `y` (any case) confirms. Anything else, including end
/// of input or surrounding whitespace, cancels.
pub fn init_db_command<R: BufRead, W: Write>(
    store: &Store,
    mut input: R,
    mut output: W,
) -> anyhow::Result<InitOutcome> {
    let outcome = if store.exists() {
        write!(
            output,
            "Database '{store}' already exists. Re-initializing will delete all data. Continue? [y/N]: "
        )?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let answer = answer.trim_end_matches(['\n', '\r']);
        if !answer.eq_ignore_ascii_case("y") {
            writeln!(output, "Database initialization cancelled.")?;
            return Ok(InitOutcome::Cancelled);
        }
        store.destroy()?;
        InitOutcome::Reinitialized
    } else {
        InitOutcome::Created
    };

    store.init_schema()?;
    writeln!(output, "Initialized the database.")?;
    Ok(outcome)
}
