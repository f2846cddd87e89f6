//! Defines the journal: the posting model, its database table and the
//! queries for recording and listing postings.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, PostingId},
};

/// A dated debit/credit amount entry against one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// The ID of the posting.
    pub id: PostingId,
    /// The date of the transaction.
    pub date: Date,
    /// The ID of the account the posting is recorded against.
    pub account_id: AccountId,
    /// The amount entered in the debit column. Always greater than zero.
    pub debit: f64,
    /// The amount entered in the credit column. Always greater than zero.
    pub credit: f64,
}

/// A posting joined with the name of its account, as shown in the journal
/// listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRow {
    /// The ID of the posting.
    pub id: PostingId,
    /// The date of the transaction.
    pub date: Date,
    /// The name of the account the posting is recorded against.
    pub account_name: String,
    /// The amount entered in the debit column.
    pub debit: f64,
    /// The amount entered in the credit column.
    pub credit: f64,
}

/// Create the journal entries table in the database.
///
/// The foreign key is declared but not enforced, so deleting an account can
/// leave postings behind that no longer resolve. Joined listings exclude
/// such postings.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_journal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS journal_entries (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                debit REAL NOT NULL,
                credit REAL NOT NULL,
                FOREIGN KEY(account_id) REFERENCES accounts(id)
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Posting].
pub(crate) fn map_posting_row(row: &Row) -> Result<Posting, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let account_id = row.get(2)?;
    let debit = row.get(3)?;
    let credit = row.get(4)?;

    Ok(Posting {
        id,
        date,
        account_id,
        debit,
        credit,
    })
}

/// Insert a posting into the journal.
///
/// This is the raw insert: it does not validate the amounts or touch the
/// account balance. Use [apply_posting](crate::posting::apply_posting) to
/// record a posting the way the presentation layer submits one.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an unexpected
/// SQL error.
pub fn create_posting(
    date: Date,
    account_id: AccountId,
    debit: f64,
    credit: f64,
    connection: &Connection,
) -> Result<Posting, Error> {
    let posting = connection
        .prepare(
            "INSERT INTO journal_entries (date, account_id, debit, credit)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, account_id, debit, credit",
        )?
        .query_row((date, account_id, debit, credit), map_posting_row)?;

    Ok(posting)
}

/// Delete a posting by ID and reverse its effect on the account balance.
///
/// The posting's net effect (`debit - credit`) is subtracted from the
/// referenced account inside the same SQL transaction as the delete. If the
/// account no longer exists the reversal is skipped and a warning is logged.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingPosting] if `id` does not refer to a valid posting,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_posting(id: PostingId, connection: &Connection) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let posting = tx
        .prepare("SELECT id, date, account_id, debit, credit FROM journal_entries WHERE id = :id")?
        .query_row(&[(":id", &id)], map_posting_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingPosting,
            error => error.into(),
        })?;

    let rows_affected = tx.execute(
        "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2",
        (posting.debit - posting.credit, posting.account_id),
    )?;

    if rows_affected == 0 {
        tracing::warn!(
            "posting {} references missing account {}, balance not reversed",
            posting.id,
            posting.account_id
        );
    }

    tx.execute("DELETE FROM journal_entries WHERE id = ?1", [id])?;

    tx.commit()?;

    Ok(())
}

/// Get every posting joined with its account name, in insertion order.
///
/// Postings whose account no longer exists are excluded (inner join).
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_journal(connection: &Connection) -> Result<Vec<JournalRow>, Error> {
    connection
        .prepare(
            "SELECT je.id, je.date, a.name, je.debit, je.credit
             FROM journal_entries AS je
             INNER JOIN accounts AS a ON je.account_id = a.id
             ORDER BY je.id ASC",
        )?
        .query_map([], |row| {
            Ok(JournalRow {
                id: row.get(0)?,
                date: row.get(1)?,
                account_name: row.get(2)?,
                debit: row.get(3)?,
                credit: row.get(4)?,
            })
        })?
        .map(|row_result| row_result.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod create_journal_table_tests {
    use rusqlite::Connection;

    use super::create_journal_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_journal_table(&connection));
    }
}

#[cfg(test)]
mod journal_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountType, create_account, delete_account, get_account},
        db::initialize,
    };

    use super::{Posting, create_posting, delete_posting, list_journal};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_posting_stores_all_fields() {
        let conn = get_test_connection();
        create_account(
            "Cash",
            AccountType::Asset,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        let got = create_posting(date!(2024 - 02 - 14), 1, 250.0, 10.0, &conn).unwrap();
        let want = Posting {
            id: 1,
            date: date!(2024 - 02 - 14),
            account_id: 1,
            debit: 250.0,
            credit: 10.0,
        };

        assert_eq!(want, got, "want posting {want:?}, got {got:?}");
    }

    #[test]
    fn delete_posting_reverses_account_balance() {
        let conn = get_test_connection();
        let account = create_account(
            "Cash",
            AccountType::Asset,
            1000.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        let posting = create_posting(date!(2024 - 02 - 14), account.id, 500.0, 100.0, &conn).unwrap();
        conn.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
            (posting.debit - posting.credit, account.id),
        )
        .unwrap();
        assert_eq!(1400.0, get_account(account.id, &conn).unwrap().balance);

        delete_posting(posting.id, &conn).unwrap();

        assert_eq!(1000.0, get_account(account.id, &conn).unwrap().balance);
        assert!(list_journal(&conn).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_posting_fails() {
        let conn = get_test_connection();

        assert_eq!(Err(Error::DeleteMissingPosting), delete_posting(42, &conn));
    }

    #[test]
    fn delete_posting_with_missing_account_still_deletes() {
        let conn = get_test_connection();
        let account = create_account(
            "Cash",
            AccountType::Asset,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        let posting = create_posting(date!(2024 - 02 - 14), account.id, 5.0, 1.0, &conn).unwrap();

        delete_account(account.id, &conn).unwrap();

        assert_eq!(Ok(()), delete_posting(posting.id, &conn));
        let count: i64 = conn
            .query_row("SELECT COUNT(id) FROM journal_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(0, count);
    }

    #[test]
    fn journal_listing_joins_account_names() {
        let conn = get_test_connection();
        create_account(
            "Cash",
            AccountType::Asset,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        create_account(
            "Sales",
            AccountType::Income,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        create_posting(date!(2024 - 02 - 01), 1, 100.0, 1.0, &conn).unwrap();
        create_posting(date!(2024 - 02 - 02), 2, 50.0, 2.0, &conn).unwrap();

        let rows = list_journal(&conn).unwrap();
        let names: Vec<_> = rows.iter().map(|row| row.account_name.as_str()).collect();

        assert_eq!(vec!["Cash", "Sales"], names);
    }

    #[test]
    fn journal_listing_excludes_dangling_postings() {
        let conn = get_test_connection();
        create_account(
            "Cash",
            AccountType::Asset,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        create_account(
            "Sales",
            AccountType::Income,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        create_posting(date!(2024 - 02 - 01), 1, 100.0, 1.0, &conn).unwrap();
        create_posting(date!(2024 - 02 - 02), 2, 50.0, 2.0, &conn).unwrap();

        delete_account(2, &conn).unwrap();

        let rows = list_journal(&conn).unwrap();

        assert_eq!(1, rows.len());
        assert_eq!("Cash", rows[0].account_name);
    }
}
