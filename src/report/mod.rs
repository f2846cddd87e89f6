//! The read side of the application: stateless computations over the
//! account and journal stores that produce the financial reports.
//!
//! Every generator re-reads the stores and recomputes from scratch; nothing
//! is cached between calls.

mod balance_sheet;
mod cash_flow;
mod format;
mod income_statement;
mod ledger;
mod trial_balance;

pub use balance_sheet::{BalanceSheet, balance_sheet};
pub use cash_flow::{Activity, CashFlowStatement, cash_flow_statement};
pub use income_statement::{IncomeStatement, income_statement};
pub use ledger::{LedgerRow, ledger};
pub use trial_balance::{TrialBalance, TrialBalanceRow, trial_balance};
