//! Creates the database schema for the application.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, account::create_account_table, journal::create_journal_table};

/// Create the tables for the application's domain models.
///
/// Safe to call on a database that already has the tables.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = OFF;")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_journal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
