//! Computes and renders the trial balance.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, report::format::currency};

const NAME_WIDTH: usize = 24;
const BALANCE_WIDTH: usize = 16;

/// Totals that agree to the cent are considered balanced.
const BALANCE_TOLERANCE: f64 = 0.005;

/// One account's name and balance as listed on the trial balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The name of the account.
    pub name: String,
    /// The account's running balance.
    pub balance: f64,
}

/// Every account's balance, with positive balances summed as debits and
/// negative balances summed as credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// One row per account, in store order.
    pub rows: Vec<TrialBalanceRow>,
    /// The sum of all strictly-positive balances.
    pub total_debit: f64,
    /// The sum of the absolute values of all strictly-negative balances.
    pub total_credit: f64,
}

impl TrialBalance {
    /// Whether the debit and credit totals agree to the cent.
    ///
    /// A balanced ledger conventionally has equal totals; a mismatch is
    /// surfaced as a warning rather than an error.
    pub fn is_balanced(&self) -> bool {
        (self.total_debit - self.total_credit).abs() < BALANCE_TOLERANCE
    }

    /// Render the trial balance as a text block.
    ///
    /// A warning line is appended when the totals do not agree.
    pub fn render(&self) -> String {
        let mut output = String::from("TRIAL BALANCE\n");
        output.push_str(&format!(
            "{:<name_w$}{:>balance_w$}\n",
            "Account",
            "Balance",
            name_w = NAME_WIDTH,
            balance_w = BALANCE_WIDTH,
        ));

        for row in &self.rows {
            output.push_str(&format!(
                "{:<name_w$}{:>balance_w$}\n",
                row.name,
                currency(row.balance),
                name_w = NAME_WIDTH,
                balance_w = BALANCE_WIDTH,
            ));
        }

        output.push_str(&format!("\nTotal Debit: {}\n", currency(self.total_debit)));
        output.push_str(&format!("Total Credit: {}\n", currency(self.total_credit)));

        if !self.is_balanced() {
            output.push_str(&format!(
                "WARNING: debits and credits differ by {}\n",
                currency((self.total_debit - self.total_credit).abs())
            ));
        }

        output
    }
}

/// Compute the trial balance from the account store.
///
/// Logs a warning when the debit and credit totals do not agree; the report
/// is still produced.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn trial_balance(connection: &Connection) -> Result<TrialBalance, Error> {
    let rows: Vec<TrialBalanceRow> = connection
        .prepare("SELECT name, balance FROM accounts")?
        .query_map([], |row| {
            Ok(TrialBalanceRow {
                name: row.get(0)?,
                balance: row.get(1)?,
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut total_debit = 0.0;
    let mut total_credit = 0.0;

    for row in &rows {
        if row.balance > 0.0 {
            total_debit += row.balance;
        } else if row.balance < 0.0 {
            total_credit += row.balance.abs();
        }
    }

    let report = TrialBalance {
        rows,
        total_debit,
        total_credit,
    };

    if !report.is_balanced() {
        tracing::warn!(
            "trial balance does not balance: total debit {} vs total credit {}",
            report.total_debit,
            report.total_credit
        );
    }

    Ok(report)
}

#[cfg(test)]
mod trial_balance_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        account::{AccountType, create_account},
        db::initialize,
    };

    use super::trial_balance;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn sums_positive_and_negative_balances_separately() {
        let conn = get_test_connection();
        create_account(
            "Cash",
            AccountType::Asset,
            1000.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        create_account(
            "Bank Loan",
            AccountType::Liability,
            -800.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        create_account(
            "Owner Capital",
            AccountType::Equity,
            -200.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        let report = trial_balance(&conn).unwrap();

        assert_eq!(1000.0, report.total_debit);
        assert_eq!(1000.0, report.total_credit);
        assert!(report.is_balanced());
    }

    #[test]
    fn zero_balances_count_towards_neither_total() {
        let conn = get_test_connection();
        create_account(
            "Dormant",
            AccountType::Asset,
            0.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        let report = trial_balance(&conn).unwrap();

        assert_eq!(0.0, report.total_debit);
        assert_eq!(0.0, report.total_credit);
        assert_eq!(1, report.rows.len());
    }

    #[test]
    fn mismatched_totals_are_flagged() {
        let conn = get_test_connection();
        create_account(
            "Cash",
            AccountType::Asset,
            1000.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        let report = trial_balance(&conn).unwrap();

        assert!(!report.is_balanced());
        assert!(report.render().contains("WARNING"));
    }

    #[test]
    fn balanced_render_has_no_warning() {
        let conn = get_test_connection();
        create_account(
            "Cash",
            AccountType::Asset,
            500.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();
        create_account(
            "Owner Capital",
            AccountType::Equity,
            -500.0,
            date!(2024 - 01 - 01),
            &conn,
        )
        .unwrap();

        let text = trial_balance(&conn).unwrap().render();

        assert!(text.contains("Total Debit: $500.00"));
        assert!(text.contains("Total Credit: $500.00"));
        assert!(!text.contains("WARNING"));
    }
}
