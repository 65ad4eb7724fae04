//! The finance aggregation and comparison engine.
//!
//! Every function here is pure: it reads the transactions it is given, builds its result from
//! scratch and touches nothing else. Results do not depend on the order of the input.

mod balance;
mod category;
mod comparison;
mod keyed;
mod period;
mod score;

pub use balance::{aggregate, Balance};
pub use category::aggregate_by_category;
pub use comparison::{
    change_rate, compare, compare_by_category, CategoryComparison, ChangeRates, ComparisonData,
};
pub use keyed::{aggregate_by_key, daily_balances, monthly_balances, Granularity};
pub use period::{format_period_label, PeriodLabel, ViewType};
pub use score::Rating;
