//! Computes and renders the income statement.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{Account, AccountType, list_accounts},
    report::format::currency,
};

/// The Income and Expense accounts and their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Income accounts, in store order.
    pub income: Vec<Account>,
    /// Expense accounts, in store order.
    pub expenses: Vec<Account>,
    /// The sum of the income account balances.
    pub total_income: f64,
    /// The sum of the expense account balances.
    pub total_expense: f64,
}

impl IncomeStatement {
    /// Total income less total expenses.
    pub fn net_income(&self) -> f64 {
        self.total_income - self.total_expense
    }

    /// Render the income statement as a text block.
    pub fn render(&self) -> String {
        let mut output = String::from("INCOME\n");

        for account in &self.income {
            output.push_str(&format!("{}: {}\n", account.name, currency(account.balance)));
        }
        output.push_str(&format!("Total Income: {}\n\n", currency(self.total_income)));

        output.push_str("EXPENSES\n");
        for account in &self.expenses {
            output.push_str(&format!("{}: {}\n", account.name, currency(account.balance)));
        }
        output.push_str(&format!(
            "Total Expenses: {}\n\n",
            currency(self.total_expense)
        ));

        output.push_str(&format!("NET INCOME: {}\n", currency(self.net_income())));

        output
    }
}

/// Compute the income statement from the account store.
///
/// Only Income and Expense accounts contribute; all other account types are
/// skipped.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn income_statement(connection: &Connection) -> Result<IncomeStatement, Error> {
    let mut income = Vec::new();
    let mut expenses = Vec::new();

    for account in list_accounts(connection)? {
        match account.account_type {
            AccountType::Income => income.push(account),
            AccountType::Expense => expenses.push(account),
            _ => {}
        }
    }

    let total_income = income.iter().map(|account| account.balance).sum();
    let total_expense = expenses.iter().map(|account| account.balance).sum();

    Ok(IncomeStatement {
        income,
        expenses,
        total_income,
        total_expense,
    })
}
