use crate::finance::{aggregate, aggregate_by_category, Balance};
use crate::model::{Amount, Transaction, TransactionType};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeSet;

/// Percentage change from `previous` to `current`, rounded to a whole percent.
///
/// A zero `previous` has no meaningful ratio: the rate is `100` if `current` is positive and `0`
/// otherwise. Halves round away from zero. A rate too large for `i64` saturates at `i64::MAX` or
/// `i64::MIN`.
pub fn change_rate(current: Amount, previous: Amount) -> i64 {
    if previous.is_zero() {
        return if current.is_positive() { 100 } else { 0 };
    }
    let (current, previous) = (current.value(), previous.value());
    let rate = current
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
        .and_then(|change| change.checked_mul(Decimal::ONE_HUNDRED))
        // -0.5% rounds to -1 as well, not toward positive infinity.
        .map(|percent| percent.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|percent| percent.to_i64());
    match rate {
        Some(rate) => rate,
        None if current.is_sign_positive() == previous.is_sign_positive() => i64::MAX,
        None => i64::MIN,
    }
}

/// Change rates for each field of a [`Balance`].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChangeRates {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

/// Totals of two periods side by side with their change rates.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ComparisonData {
    pub current: Balance,
    pub previous: Balance,
    pub change_rates: ChangeRates,
}

/// Aggregates both periods and derives the change rate of income, expense and balance.
pub fn compare<'a, C, P>(current: C, previous: P) -> ComparisonData
where
    C: IntoIterator<Item = &'a Transaction>,
    P: IntoIterator<Item = &'a Transaction>,
{
    let current = aggregate(current);
    let previous = aggregate(previous);
    ComparisonData {
        current,
        previous,
        change_rates: ChangeRates {
            income: change_rate(current.income(), previous.income()),
            expense: change_rate(current.expense(), previous.expense()),
            balance: change_rate(current.balance(), previous.balance()),
        },
    }
}

/// One category's totals in two periods.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryComparison {
    pub category: String,
    pub current: Amount,
    pub previous: Amount,
    pub change_rate: i64,
    pub has_current_data: bool,
    pub has_previous_data: bool,
}

/// Compares per-category totals of one transaction type across two periods.
///
/// Every category seen in either period appears exactly once, sorted by label. A category that
/// only occurs in one period reports `0` for the other.
pub fn compare_by_category<'a, C, P>(
    current: C,
    previous: P,
    transaction_type: TransactionType,
) -> Vec<CategoryComparison>
where
    C: IntoIterator<Item = &'a Transaction>,
    P: IntoIterator<Item = &'a Transaction>,
{
    let current = aggregate_by_category(current, Some(transaction_type));
    let previous = aggregate_by_category(previous, Some(transaction_type));

    let categories: BTreeSet<&String> = current.keys().chain(previous.keys()).collect();

    categories
        .into_iter()
        .map(|category| {
            let current = current.get(category).copied().unwrap_or_default();
            let previous = previous.get(category).copied().unwrap_or_default();
            CategoryComparison {
                category: category.clone(),
                current,
                previous,
                change_rate: change_rate(current, previous),
                has_current_data: current.is_positive(),
                has_previous_data: previous.is_positive(),
            }
        })
        .filter(|c| c.has_current_data || c.has_previous_data)
        .collect()
}
