//! Computes and renders the cash flow statement.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, account::AccountType, report::format::currency};

/// The cash flow category a posting is classified into, decided by the type
/// of the account it was recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    /// Postings against Income and Expense accounts.
    Operating,
    /// Postings against Asset accounts.
    Investing,
    /// Postings against Liability and Equity accounts.
    Financing,
}

impl From<AccountType> for Activity {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Income | AccountType::Expense => Activity::Operating,
            AccountType::Asset => Activity::Investing,
            AccountType::Liability | AccountType::Equity => Activity::Financing,
        }
    }
}

/// The per-activity cash flow totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// Net cash flow from postings against Income and Expense accounts.
    pub operating: f64,
    /// Net cash flow from postings against Asset accounts.
    pub investing: f64,
    /// Net cash flow from postings against Liability and Equity accounts.
    pub financing: f64,
}

impl CashFlowStatement {
    /// The sum of the three activity totals.
    pub fn net_cash_flow(&self) -> f64 {
        self.operating + self.investing + self.financing
    }

    /// Render the cash flow statement as a text block.
    pub fn render(&self) -> String {
        format!(
            "OPERATING ACTIVITIES: {}\nINVESTING ACTIVITIES: {}\nFINANCING ACTIVITIES: {}\n\nNET CASH FLOW: {}\n",
            currency(self.operating),
            currency(self.investing),
            currency(self.financing),
            currency(self.net_cash_flow()),
        )
    }
}

/// Compute the cash flow statement from the journal.
///
/// Each posting contributes to exactly one activity: its debit amount when
/// the debit is positive, otherwise its credit amount negated. Postings
/// whose account no longer exists are skipped, as are postings where
/// neither side is positive.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn cash_flow_statement(connection: &Connection) -> Result<CashFlowStatement, Error> {
    let rows: Vec<(String, f64, f64)> = connection
        .prepare(
            "SELECT a.type, je.debit, je.credit
             FROM journal_entries AS je
             INNER JOIN accounts AS a ON je.account_id = a.id",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<_, _>>()?;

    let mut statement = CashFlowStatement {
        operating: 0.0,
        investing: 0.0,
        financing: 0.0,
    };

    for (type_text, debit, credit) in rows {
        let account_type: AccountType = type_text.parse()?;

        // The debit side wins when both are positive.
        let amount = if debit > 0.0 {
            debit
        } else if credit > 0.0 {
            -credit
        } else {
            continue;
        };

        match Activity::from(account_type) {
            Activity::Operating => statement.operating += amount,
            Activity::Investing => statement.investing += amount,
            Activity::Financing => statement.financing += amount,
        }
    }

    Ok(statement)
}
