use crate::finance::Balance;
use crate::format::{format_month, return_month, DATE_FORMAT};
use crate::model::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How transactions are grouped by date in [`aggregate_by_key`].
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One group per calendar day, keyed `yyyy-MM-dd`.
    #[default]
    Day,
    /// One group per month of year, keyed `MM`. The same month of different years shares a key,
    /// so only feed this a single year of transactions.
    Month,
    /// One group per calendar month, keyed `yyyy-MM`.
    YearMonth,
}

serde_plain::derive_display_from_serialize!(Granularity);

impl Granularity {
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Day => date.format(DATE_FORMAT).to_string(),
            Granularity::Month => return_month(date),
            Granularity::YearMonth => format_month(date),
        }
    }
}

/// Groups transactions by a key derived from their date and totals each group.
///
/// Only keys that occur in the input are present: days or months without transactions are not
/// zero-filled.
pub fn aggregate_by_key<'a, I>(
    transactions: I,
    granularity: Granularity,
) -> BTreeMap<String, Balance>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: BTreeMap<String, Balance> = BTreeMap::new();
    for transaction in transactions {
        groups
            .entry(granularity.key(transaction.date()))
            .or_default()
            .add(transaction);
    }
    groups
}

/// Per-day totals, as shown on each calendar cell.
pub fn daily_balances<'a, I>(transactions: I) -> BTreeMap<String, Balance>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    aggregate_by_key(transactions, Granularity::Day)
}

/// Per-month totals keyed by month of year (`MM`), as used by the yearly report.
pub fn monthly_balances<'a, I>(transactions: I) -> BTreeMap<String, Balance>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    aggregate_by_key(transactions, Granularity::Month)
}
