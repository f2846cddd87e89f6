//! Bookkeeper is the accounting core behind a single-user desktop
//! bookkeeping app: a chart of accounts and a journal of postings kept in a
//! local SQLite database, with the standard financial reports derived from
//! them on demand.
//!
//! The presentation layer owns the window and the widgets; this library
//! owns the rules. It exposes [AppState], which holds the database
//! connection and provides one method per operation the presentation layer
//! can invoke: account CRUD and search, posting entry and deletion, and the
//! balance sheet, income statement, cash flow statement, trial balance and
//! ledger views.

#![warn(missing_docs)]

mod account;
mod database_id;
mod db;
mod error;
mod journal;
mod posting;
pub mod report;
mod state;

pub use account::{
    Account, AccountName, AccountType, create_account, delete_account, get_account,
    list_account_names, list_accounts, search_accounts, update_account,
};
pub use database_id::{AccountId, DatabaseId, PostingId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use journal::{JournalRow, Posting, create_posting, delete_posting, list_journal};
pub use posting::apply_posting;
pub use state::AppState;
