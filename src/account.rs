//! Defines the chart of accounts: the account model, its database table and
//! the queries the presentation layer drives it with.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::AccountId};

/// The accounting category an account belongs to.
///
/// The type decides which reports an account appears in: Asset, Liability
/// and Equity accounts make up the balance sheet, while Income and Expense
/// accounts make up the income statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Things owned, e.g. cash, bank accounts, equipment.
    Asset,
    /// Things owed, e.g. loans, credit cards.
    Liability,
    /// The owner's stake in the business.
    Equity,
    /// Money earned, e.g. sales, interest.
    Income,
    /// Money spent, e.g. rent, wages.
    Expense,
}

impl AccountType {
    /// The text stored in the database for this account type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Equity => "Equity",
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad rather than write! so that format width specifiers apply.
        f.pad(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Asset" => Ok(AccountType::Asset),
            "Liability" => Ok(AccountType::Liability),
            "Equity" => Ok(AccountType::Equity),
            "Income" => Ok(AccountType::Income),
            "Expense" => Ok(AccountType::Expense),
            _ => Err(Error::UnknownAccountType(s.to_owned())),
        }
    }
}

/// A named bucket of one accounting type with a running balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account. Uniqueness is not enforced.
    pub name: String,
    /// The accounting category of the account.
    pub account_type: AccountType,
    /// The running net effect of all postings against this account,
    /// initialized to the opening balance supplied at creation.
    pub balance: f64,
    /// When the account was created, as supplied by the user.
    pub created_date: Date,
}

/// An account's ID and display name, used to populate the account selector
/// in the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountName {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
}

/// Create the accounts table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                balance REAL NOT NULL,
                created_date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub(crate) fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    let type_text: String = row.get(2)?;
    let account_type: AccountType = type_text.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(error))
    })?;

    let balance = row.get(3)?;
    let created_date = row.get(4)?;

    Ok(Account {
        id,
        name,
        account_type,
        balance,
        created_date,
    })
}

/// Create a new account in the database.
///
/// The `balance` is the opening balance; postings applied later adjust it.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an unexpected
/// SQL error.
pub fn create_account(
    name: &str,
    account_type: AccountType,
    balance: f64,
    created_date: Date,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "INSERT INTO accounts (name, type, balance, created_date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, type, balance, created_date",
        )?
        .query_row(
            (name, account_type.as_str(), balance, created_date),
            map_account_row,
        )?;

    Ok(account)
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare("SELECT id, name, type, balance, created_date FROM accounts WHERE id = :id")?
        .query_row(&[(":id", &id)], map_account_row)?;

    Ok(account)
}

/// Overwrite all mutable fields of the account with the matching `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingAccount] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    id: AccountId,
    name: &str,
    account_type: AccountType,
    balance: f64,
    created_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE accounts SET name = ?1, type = ?2, balance = ?3, created_date = ?4 WHERE id = ?5",
        (name, account_type.as_str(), balance, created_date, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Delete an account by ID.
///
/// Postings that reference the account are left in place. They no longer
/// resolve to an account, so joined listings exclude them; a warning is
/// logged with the number of postings left dangling.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingAccount] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM accounts WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    let dangling: i64 = connection.query_row(
        "SELECT COUNT(id) FROM journal_entries WHERE account_id = ?1",
        [id],
        |row| row.get(0),
    )?;

    if dangling > 0 {
        tracing::warn!(
            "deleted account {} is still referenced by {} journal posting(s)",
            id,
            dangling
        );
    }

    Ok(())
}

/// Find accounts whose name contains `pattern`.
///
/// Matching uses SQL `LIKE`, so it is case-insensitive for ASCII text. An
/// empty pattern matches every account.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn search_accounts(pattern: &str, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, balance, created_date FROM accounts
             WHERE name LIKE ?1 ORDER BY id ASC",
        )?
        .query_map([format!("%{pattern}%")], map_account_row)?
        .map(|account_result| account_result.map_err(|error| error.into()))
        .collect()
}

/// Get all accounts, ordered by ID ascending (insertion order).
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, type, balance, created_date FROM accounts ORDER BY id ASC")?
        .query_map([], map_account_row)?
        .map(|account_result| account_result.map_err(|error| error.into()))
        .collect()
}

/// Get the ID and name of every account, ordered by ID ascending.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_account_names(connection: &Connection) -> Result<Vec<AccountName>, Error> {
    connection
        .prepare("SELECT id, name FROM accounts ORDER BY id ASC")?
        .query_map([], |row| {
            Ok(AccountName {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .map(|name_result| name_result.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod create_account_table_tests {
    use rusqlite::Connection;

    use super::create_account_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_account_table(&connection));
    }
}

#[cfg(test)]
mod account_type_tests {
    use super::AccountType;

    #[test]
    fn round_trips_through_text() {
        let types = [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Income,
            AccountType::Expense,
        ];

        for account_type in types {
            let text = account_type.to_string();
            let parsed: AccountType = text.parse().unwrap();

            assert_eq!(account_type, parsed, "want {account_type:?}, got {parsed:?}");
        }
    }

    #[test]
    fn rejects_unknown_text() {
        let result = "Widget".parse::<AccountType>();

        assert_eq!(
            Err(crate::Error::UnknownAccountType("Widget".to_owned())),
            result
        );
    }
}
