//! The posting engine: validates a journal posting as submitted by the
//! presentation layer and applies it to the stores.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::{Account, get_account},
    database_id::AccountId,
    journal::{Posting, create_posting},
};

/// Validate and record a posting, adjusting the account's running balance.
///
/// `debit_text` and `credit_text` are the raw strings from the entry fields.
/// Both must parse as decimal numbers strictly greater than zero. The net
/// effect `debit - credit` is added to the account's balance.
///
/// The posting insert and the balance update run inside one SQL transaction:
/// either both are committed or neither is.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingField] if no account is selected or an amount field is
///   empty,
/// - [Error::InvalidAmount] if an amount does not parse as a decimal number,
/// - [Error::NonPositiveAmount] if an amount is zero or negative,
/// - [Error::InvalidAccount] if `account_id` does not refer to a valid
///   account (the posting is rolled back),
/// - or [Error::SqlError] if there is some other SQL error.
///
/// On any validation failure neither store is changed.
pub fn apply_posting(
    date: Date,
    account_id: Option<AccountId>,
    debit_text: &str,
    credit_text: &str,
    connection: &Connection,
) -> Result<(Posting, Account), Error> {
    let account_id = account_id.ok_or(Error::MissingField("account"))?;

    let debit_text = debit_text.trim();
    let credit_text = credit_text.trim();

    if debit_text.is_empty() {
        return Err(Error::MissingField("debit"));
    }

    if credit_text.is_empty() {
        return Err(Error::MissingField("credit"));
    }

    let debit: f64 = debit_text
        .parse()
        .map_err(|_| Error::InvalidAmount(debit_text.to_owned()))?;
    let credit: f64 = credit_text
        .parse()
        .map_err(|_| Error::InvalidAmount(credit_text.to_owned()))?;

    // Written as a negated comparison so that NaN is rejected too.
    if !(debit > 0.0) {
        return Err(Error::NonPositiveAmount(debit));
    }

    if !(credit > 0.0) {
        return Err(Error::NonPositiveAmount(credit));
    }

    let tx = connection.unchecked_transaction()?;

    let posting = create_posting(date, account_id, debit, credit, &tx)?;

    let rows_affected = tx.execute(
        "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
        (debit - credit, account_id),
    )?;

    if rows_affected == 0 {
        // Dropping the transaction without committing rolls back the insert.
        return Err(Error::InvalidAccount(account_id));
    }

    let account = get_account(account_id, &tx)?;

    tx.commit()?;

    Ok((posting, account))
}
