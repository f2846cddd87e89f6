//! Defines the app level error type.

use crate::database_id::AccountId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required posting field was left empty.
    ///
    /// Holds the name of the offending field. The operation is rejected
    /// before anything is written, so the caller can re-prompt the user and
    /// retry.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A debit or credit amount could not be parsed as a decimal number.
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    /// A debit or credit amount was zero or negative.
    ///
    /// Every posting must carry both a debit and a credit strictly greater
    /// than zero.
    #[error("{0} is not greater than zero")]
    NonPositiveAmount(f64),

    /// A string did not name one of the five account types.
    #[error("unknown account type {0:?}")]
    UnknownAccountType(String),

    /// The account ID on a posting does not refer to a valid account.
    #[error("the account ID {0} does not refer to a valid account")]
    InvalidAccount(AccountId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to delete a journal posting that does not exist
    #[error("tried to delete a posting that is not in the database")]
    DeleteMissingPosting,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
