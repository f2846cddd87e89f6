//! Computes the ledger view: postings in date order with a running balance
//! per account.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, PostingId},
};

/// One ledger line: a posting joined with its account name and the running
/// balance of that account after the posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The ID of the posting.
    pub id: PostingId,
    /// The date of the transaction.
    pub date: Date,
    /// The ID of the account the posting is recorded against.
    pub account_id: AccountId,
    /// The name of the account the posting is recorded against.
    pub account_name: String,
    /// The amount entered in the debit column.
    pub debit: f64,
    /// The amount entered in the credit column.
    pub credit: f64,
    /// The account's cumulative net posting effect up to and including this
    /// row, accumulated from zero in date-then-ID order.
    pub balance: f64,
}

/// Compute the ledger from the journal.
///
/// Rows are ordered by date then posting ID. Each row carries a running
/// balance: the sum of `debit - credit` over the account's postings so far.
/// Postings whose account no longer exists are excluded (inner join).
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn ledger(connection: &Connection) -> Result<Vec<LedgerRow>, Error> {
    let postings: Vec<LedgerRow> = connection
        .prepare(
            "SELECT je.id, je.date, je.account_id, a.name, je.debit, je.credit
             FROM journal_entries AS je
             INNER JOIN accounts AS a ON je.account_id = a.id
             ORDER BY je.date ASC, je.id ASC",
        )?
        .query_map([], |row| {
            Ok(LedgerRow {
                id: row.get(0)?,
                date: row.get(1)?,
                account_id: row.get(2)?,
                account_name: row.get(3)?,
                debit: row.get(4)?,
                credit: row.get(5)?,
                balance: 0.0,
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut running_balances: HashMap<AccountId, f64> = HashMap::new();

    let rows = postings
        .into_iter()
        .map(|mut row| {
            let balance = running_balances.entry(row.account_id).or_insert(0.0);
            *balance += row.debit - row.credit;
            row.balance = *balance;
            row
        })
        .collect();

    Ok(rows)
}
