//! Implements the struct that owns the database connection and exposes the
//! operations the presentation layer calls.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    account::{self, Account, AccountName, AccountType},
    database_id::{AccountId, PostingId},
    db,
    journal::{self, JournalRow, Posting},
    posting,
    report::{self, BalanceSheet, CashFlowStatement, IncomeStatement, LedgerRow, TrialBalance},
};

/// The state of the application: the owned database connection, plus one
/// method per operation the presentation layer can invoke.
///
/// The connection is acquired once at construction and released when the
/// last clone is dropped, regardless of exit path. Every method locks the
/// connection for the duration of one synchronous operation; there is no
/// background work and no caching.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        db::initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.db_connection
            .lock()
            .expect("Could not acquire database lock")
    }

    /// Create a new account with an opening balance.
    pub fn create_account(
        &self,
        name: &str,
        account_type: AccountType,
        balance: f64,
        created_date: Date,
    ) -> Result<Account, Error> {
        account::create_account(name, account_type, balance, created_date, &self.connection())
    }

    /// Overwrite all mutable fields of an existing account.
    pub fn update_account(
        &self,
        id: AccountId,
        name: &str,
        account_type: AccountType,
        balance: f64,
        created_date: Date,
    ) -> Result<(), Error> {
        account::update_account(
            id,
            name,
            account_type,
            balance,
            created_date,
            &self.connection(),
        )
    }

    /// Delete an account. Referencing postings are left dangling.
    pub fn delete_account(&self, id: AccountId) -> Result<(), Error> {
        account::delete_account(id, &self.connection())
    }

    /// Find accounts whose name contains `pattern`.
    pub fn search_accounts(&self, pattern: &str) -> Result<Vec<Account>, Error> {
        account::search_accounts(pattern, &self.connection())
    }

    /// Get all accounts, ordered by ID ascending.
    pub fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        account::list_accounts(&self.connection())
    }

    /// Get the ID and name of every account, for the account selector.
    pub fn account_names(&self) -> Result<Vec<AccountName>, Error> {
        account::list_account_names(&self.connection())
    }

    /// Validate and record a journal posting, returning the stored posting
    /// and the account with its updated balance.
    pub fn apply_posting(
        &self,
        date: Date,
        account_id: Option<AccountId>,
        debit_text: &str,
        credit_text: &str,
    ) -> Result<(Posting, Account), Error> {
        posting::apply_posting(date, account_id, debit_text, credit_text, &self.connection())
    }

    /// Delete a posting and reverse its effect on the account balance.
    pub fn delete_posting(&self, id: PostingId) -> Result<(), Error> {
        journal::delete_posting(id, &self.connection())
    }

    /// Get every posting joined with its account name.
    pub fn journal(&self) -> Result<Vec<JournalRow>, Error> {
        journal::list_journal(&self.connection())
    }

    /// Compute the balance sheet.
    pub fn balance_sheet(&self) -> Result<BalanceSheet, Error> {
        report::balance_sheet(&self.connection())
    }

    /// Compute the income statement.
    pub fn income_statement(&self) -> Result<IncomeStatement, Error> {
        report::income_statement(&self.connection())
    }

    /// Compute the cash flow statement.
    pub fn cash_flow_statement(&self) -> Result<CashFlowStatement, Error> {
        report::cash_flow_statement(&self.connection())
    }

    /// Compute the trial balance.
    pub fn trial_balance(&self) -> Result<TrialBalance, Error> {
        report::trial_balance(&self.connection())
    }

    /// Compute the ledger rows.
    pub fn ledger(&self) -> Result<Vec<LedgerRow>, Error> {
        report::ledger(&self.connection())
    }
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, account::AccountType};

    use super::AppState;

    fn get_test_state() -> AppState {
        let conn = Connection::open_in_memory().unwrap();
        AppState::new(conn).unwrap()
    }

    #[test]
    fn posting_scenario_flows_through_reports() {
        let state = get_test_state();

        let cash = state
            .create_account("Cash", AccountType::Asset, 1000.0, date!(2024 - 01 - 01))
            .unwrap();
        let sales = state
            .create_account("Sales", AccountType::Income, 0.0, date!(2024 - 01 - 01))
            .unwrap();

        let (_, updated) = state
            .apply_posting(date!(2024 - 02 - 14), Some(sales.id), "500", "1")
            .unwrap();

        assert_eq!(499.0, updated.balance);

        let sheet = state.balance_sheet().unwrap();
        assert_eq!(1000.0, sheet.total_assets);
        assert!(sheet.assets.iter().any(|account| account.id == cash.id));
        assert!(!sheet.assets.iter().any(|account| account.id == sales.id));

        let statement = state.income_statement().unwrap();
        assert_eq!(499.0, statement.total_income);
        assert_eq!(499.0, statement.net_income());

        let cash_flow = state.cash_flow_statement().unwrap();
        assert_eq!(500.0, cash_flow.operating);
        assert_eq!(500.0, cash_flow.net_cash_flow());

        let rows = state.ledger().unwrap();
        assert_eq!(1, rows.len());
        assert_eq!(499.0, rows[0].balance);
    }

    #[test]
    fn rejected_posting_leaves_stores_unchanged() {
        let state = get_test_state();
        let sales = state
            .create_account("Sales", AccountType::Income, 0.0, date!(2024 - 01 - 01))
            .unwrap();

        let result = state.apply_posting(date!(2024 - 02 - 14), Some(sales.id), "0", "1");

        assert_eq!(Err(Error::NonPositiveAmount(0.0)), result);
        assert!(state.journal().unwrap().is_empty());
        assert_eq!(0.0, state.list_accounts().unwrap()[0].balance);
    }

    #[test]
    fn account_search_and_names_work_through_state() {
        let state = get_test_state();
        state
            .create_account("Cash", AccountType::Asset, 0.0, date!(2024 - 01 - 01))
            .unwrap();
        state
            .create_account("Sales", AccountType::Income, 0.0, date!(2024 - 01 - 01))
            .unwrap();

        assert_eq!(1, state.search_accounts("Cash").unwrap().len());
        assert_eq!(2, state.account_names().unwrap().len());
    }

    #[test]
    fn deleting_posting_restores_balance() {
        let state = get_test_state();
        let cash = state
            .create_account("Cash", AccountType::Asset, 1000.0, date!(2024 - 01 - 01))
            .unwrap();

        let (posting, updated) = state
            .apply_posting(date!(2024 - 02 - 14), Some(cash.id), "500", "100")
            .unwrap();
        assert_eq!(1400.0, updated.balance);

        state.delete_posting(posting.id).unwrap();

        assert_eq!(1000.0, state.list_accounts().unwrap()[0].balance);
    }
}
