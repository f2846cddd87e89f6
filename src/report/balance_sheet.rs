//! Computes and renders the balance sheet.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{Account, AccountType, list_accounts},
    report::format::currency,
};

const ID_WIDTH: usize = 4;
const NAME_WIDTH: usize = 40;
const TYPE_WIDTH: usize = 9;
const BALANCE_WIDTH: usize = 18;

/// The full width of a rendered table row, borders and padding included.
const TABLE_WIDTH: usize = ID_WIDTH + NAME_WIDTH + TYPE_WIDTH + BALANCE_WIDTH + 13;

/// The width of the label cell on a section total row.
const TOTAL_LABEL_WIDTH: usize = ID_WIDTH + NAME_WIDTH + TYPE_WIDTH + 6;

/// A snapshot of the Asset, Liability and Equity accounts and their totals.
///
/// Income and Expense accounts are excluded; they belong to the
/// [income statement](crate::report::IncomeStatement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Asset accounts, ordered by ID ascending.
    pub assets: Vec<Account>,
    /// Liability accounts, ordered by ID ascending.
    pub liabilities: Vec<Account>,
    /// Equity accounts, ordered by ID ascending.
    pub equity: Vec<Account>,
    /// The sum of the asset account balances.
    pub total_assets: f64,
    /// The sum of the liability account balances.
    pub total_liabilities: f64,
    /// The sum of the equity account balances.
    pub total_equity: f64,
}

impl BalanceSheet {
    /// The combined total of liabilities and equity.
    pub fn total_liabilities_and_equity(&self) -> f64 {
        self.total_liabilities + self.total_equity
    }

    /// Render the balance sheet as fixed-width text tables.
    ///
    /// Column widths are fixed constants; names longer than the name column
    /// overflow the layout rather than being truncated.
    pub fn render(&self) -> String {
        let mut output = String::new();

        write_section(
            &mut output,
            "ASSETS",
            &self.assets,
            "Total Assets",
            self.total_assets,
        );
        output.push('\n');
        write_section(
            &mut output,
            "LIABILITIES",
            &self.liabilities,
            "Total Liabilities",
            self.total_liabilities,
        );
        output.push('\n');
        write_section(
            &mut output,
            "EQUITY",
            &self.equity,
            "Total Equity",
            self.total_equity,
        );
        output.push('\n');

        let rule = "-".repeat(TABLE_WIDTH);
        output.push_str(&rule);
        output.push('\n');
        output.push_str(&total_row(
            "Total Liabilities and Equity",
            self.total_liabilities_and_equity(),
        ));
        output.push_str(&rule);
        output.push('\n');

        output
    }
}

/// Compute the balance sheet from the account store.
///
/// Accounts are partitioned by type into the Asset, Liability and Equity
/// buckets; Income and Expense accounts are skipped. Each bucket is ordered
/// by ID ascending.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn balance_sheet(connection: &Connection) -> Result<BalanceSheet, Error> {
    let mut assets = Vec::new();
    let mut liabilities = Vec::new();
    let mut equity = Vec::new();

    // list_accounts returns accounts ordered by ID, so each bucket is too.
    for account in list_accounts(connection)? {
        match account.account_type {
            AccountType::Asset => assets.push(account),
            AccountType::Liability => liabilities.push(account),
            AccountType::Equity => equity.push(account),
            AccountType::Income | AccountType::Expense => {}
        }
    }

    let total_assets = assets.iter().map(|account| account.balance).sum();
    let total_liabilities = liabilities.iter().map(|account| account.balance).sum();
    let total_equity = equity.iter().map(|account| account.balance).sum();

    Ok(BalanceSheet {
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
    })
}

fn write_section(
    output: &mut String,
    title: &str,
    accounts: &[Account],
    total_label: &str,
    total: f64,
) {
    let rule = "-".repeat(TABLE_WIDTH);

    output.push_str(&rule);
    output.push('\n');
    output.push_str(&format!(
        "|{title:^width$}|\n",
        width = TABLE_WIDTH - 2
    ));
    output.push_str(&rule);
    output.push('\n');
    output.push_str(&format!(
        "| {:<id_w$} | {:<name_w$} | {:<type_w$} | {:>balance_w$} |\n",
        "ID",
        "Name",
        "Type",
        "Balance",
        id_w = ID_WIDTH,
        name_w = NAME_WIDTH,
        type_w = TYPE_WIDTH,
        balance_w = BALANCE_WIDTH,
    ));
    output.push_str(&rule);
    output.push('\n');

    for account in accounts {
        output.push_str(&format!(
            "| {:<id_w$} | {:<name_w$} | {:<type_w$} | {:>balance_w$} |\n",
            account.id,
            account.name,
            account.account_type,
            currency(account.balance),
            id_w = ID_WIDTH,
            name_w = NAME_WIDTH,
            type_w = TYPE_WIDTH,
            balance_w = BALANCE_WIDTH,
        ));
    }

    output.push_str(&rule);
    output.push('\n');
    output.push_str(&total_row(total_label, total));
    output.push_str(&rule);
    output.push('\n');
}

fn total_row(label: &str, total: f64) -> String {
    format!(
        "| {label:<label_w$} | {amount:>balance_w$} |\n",
        amount = currency(total),
        label_w = TOTAL_LABEL_WIDTH,
        balance_w = BALANCE_WIDTH,
    )
}
