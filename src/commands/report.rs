//! Read-only reports over a transactions file.

use crate::args::{CategoriesArgs, CompareArgs, DailyArgs, MonthlyArgs, SummaryArgs};
use crate::cache::TransactionCache;
use crate::commands::Out;
use crate::finance::{
    aggregate, aggregate_by_category, aggregate_by_key, compare as compare_periods,
    compare_by_category, daily_balances, format_period_label, Balance, CategoryComparison,
    ComparisonData, PeriodLabel, Rating,
};
use crate::format::{format_jp_month, format_jp_year};
use crate::model::{Amount, Period, Transactions};
use crate::Result;
use anyhow::{bail, Context};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Balances keyed by day (`yyyy-MM-dd`) or month (`MM` or `yyyy-MM`).
pub type KeyedBalances = BTreeMap<String, Balance>;

/// The structured output of `kakeibo compare`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Comparison {
    pub labels: PeriodLabel,
    #[serde(flatten)]
    pub detail: ComparisonDetail,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonDetail {
    Totals {
        data: ComparisonData,
        score: u8,
        rating: Rating,
    },
    Categories(Vec<CategoryComparison>),
}

pub async fn summary(args: &SummaryArgs) -> Result<Out<Balance>> {
    let all = Transactions::load(args.file()).await?;
    let (title, selected) = match args.period() {
        Some(period) => (heading(period), all.in_period(period)),
        None => ("全期間".to_string(), all),
    };
    let balance = aggregate(&selected);
    Ok(Out::new(
        format!(
            "{title}: 収入 ¥{} / 支出 ¥{} / 残高 ¥{}",
            balance.income(),
            balance.expense(),
            balance.balance()
        ),
        balance,
    ))
}

pub async fn daily(args: &DailyArgs) -> Result<Out<KeyedBalances>> {
    let period = args.month();
    if !matches!(period, Period::Month { .. }) {
        bail!("--month must be a month (YYYY-MM), got '{period}'")
    }
    let selected = Transactions::load(args.file()).await?.in_period(period);
    let balances = daily_balances(&selected);
    Ok(Out::new(
        format!(
            "{}: {} days with transactions",
            heading(period),
            balances.len()
        ),
        balances,
    ))
}

pub async fn monthly(args: &MonthlyArgs) -> Result<Out<KeyedBalances>> {
    let period = Period::Year(args.year());
    let selected = Transactions::load(args.file()).await?.in_period(period);
    let balances = aggregate_by_key(&selected, args.granularity());
    Ok(Out::new(
        format!(
            "{}: {} months with transactions",
            heading(period),
            balances.len()
        ),
        balances,
    ))
}

pub async fn categories(args: &CategoriesArgs) -> Result<Out<BTreeMap<String, Amount>>> {
    let all = Transactions::load(args.file()).await?;
    let selected = match args.period() {
        Some(period) => all.in_period(period),
        None => all,
    };
    let totals = aggregate_by_category(&selected, args.transaction_type());
    let message = match totals.iter().max_by_key(|(_, amount)| **amount) {
        Some((category, amount)) => format!(
            "{} categories, largest is {category} at ¥{amount}",
            totals.len()
        ),
        None => "No transactions matched".to_string(),
    };
    Ok(Out::new(message, totals))
}

/// Compares the selected period with the one before it, reading both through `cache`.
pub async fn compare(args: &CompareArgs, cache: &mut TransactionCache) -> Result<Out<Comparison>> {
    let period = args
        .period()
        .context("compare needs a period, pass --month or --year")?;
    let previous_period = period.previous();
    let all = Transactions::load(args.file()).await?;
    let current = fetch(cache, &all, period)?;
    let previous = fetch(cache, &all, previous_period)?;

    let labels = period_labels(period)?;
    let (message, detail) = match args.transaction_type() {
        Some(transaction_type) => {
            let rows = compare_by_category(&current, &previous, transaction_type);
            (
                format!(
                    "{} vs {}: {} {transaction_type} categories",
                    labels.current,
                    labels.previous,
                    rows.len()
                ),
                ComparisonDetail::Categories(rows),
            )
        }
        None => {
            let data = compare_periods(&current, &previous);
            let rating = data.rating();
            (
                format!(
                    "{} vs {}: 収入 {:+}% / 支出 {:+}% / 残高 {:+}%, スコア {} {} {}",
                    labels.current,
                    labels.previous,
                    data.change_rates.income,
                    data.change_rates.expense,
                    data.change_rates.balance,
                    data.score(),
                    rating.icon(),
                    rating.message()
                ),
                ComparisonDetail::Totals {
                    data,
                    score: data.score(),
                    rating,
                },
            )
        }
    };
    Ok(Out::new(message, Comparison { labels, detail }))
}

fn fetch(cache: &mut TransactionCache, all: &Transactions, period: Period) -> Result<Transactions> {
    let selected = cache.get_or_try_insert_with(period, || Ok(all.in_period(period)))?;
    debug!("{} transactions in {period}", selected.len());
    Ok(selected.clone())
}

fn period_labels(period: Period) -> Result<PeriodLabel> {
    let first_day = period
        .first_day()
        .with_context(|| format!("The period {period} is out of range"))?;
    let reference_month = match period {
        Period::Month { .. } => Some(first_day),
        Period::Year(_) => None,
    };
    Ok(format_period_label(
        first_day,
        reference_month,
        period.view_type(),
    ))
}

fn heading(period: Period) -> String {
    match (period, period.first_day()) {
        (Period::Month { .. }, Some(day)) => format_jp_month(day),
        (Period::Year(_), Some(day)) => format_jp_year(day),
        (_, None) => period.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::PeriodArgs;
    use crate::model::TransactionType;
    use crate::test::TestEnv;
    use std::time::Duration;

    const JSON: &str = r#"[
        {"id": "1", "type": "income", "date": "2024-04-25", "amount": 200000, "category": "給与"},
        {"id": "2", "type": "expense", "date": "2024-04-03", "amount": 40000, "category": "食費"},
        {"id": "3", "type": "income", "date": "2024-05-25", "amount": 220000, "category": "給与"},
        {"id": "4", "type": "expense", "date": "2024-05-01", "amount": 500, "category": "食費"},
        {"id": "5", "type": "expense", "date": "2024-05-01", "amount": 300, "category": "食費"},
        {"id": "6", "type": "expense", "date": "2024-05-10", "amount": 1200, "category": "交通費"}
    ]"#;

    fn may() -> PeriodArgs {
        PeriodArgs::new(Some(Period::month(2024, 5).unwrap()), None)
    }

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        let file = env.write_file("t.json", JSON);

        let out = summary(&SummaryArgs::new(&file, may())).await.unwrap();
        let balance = out.structure().unwrap();
        assert_eq!(balance.income(), Amount::yen(220_000));
        assert_eq!(balance.expense(), Amount::yen(2_000));
        assert_eq!(
            out.message(),
            "2024年05月: 収入 ¥220,000 / 支出 ¥2,000 / 残高 ¥218,000"
        );

        let out = summary(&SummaryArgs::new(&file, PeriodArgs::default()))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().balance(), Amount::yen(378_000));
    }

    #[tokio::test]
    async fn test_daily_and_monthly() {
        let env = TestEnv::new().await;
        let file = env.write_file("t.json", JSON);

        let out = daily(&DailyArgs::new(&file, Period::month(2024, 5).unwrap()))
            .await
            .unwrap();
        let days = out.structure().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days["2024-05-01"].expense(), Amount::yen(800));
        assert_eq!(days["2024-05-01"].balance(), Amount::yen(-800));

        assert!(daily(&DailyArgs::new(&file, Period::Year(2024))).await.is_err());

        let out = monthly(&MonthlyArgs::new(&file, 2024, false)).await.unwrap();
        let months = out.structure().unwrap();
        assert_eq!(
            months.keys().collect::<Vec<_>>(),
            vec!["2024-04", "2024-05"]
        );
        let out = monthly(&MonthlyArgs::new(&file, 2024, true)).await.unwrap();
        assert!(out.structure().unwrap().contains_key("05"));
    }

    #[tokio::test]
    async fn test_categories() {
        let env = TestEnv::new().await;
        let file = env.write_file("t.json", JSON);
        let args = CategoriesArgs::new(&file, Some(TransactionType::Expense), may());
        let out = categories(&args).await.unwrap();
        let totals = out.structure().unwrap();
        assert_eq!(totals["食費"], Amount::yen(800));
        assert_eq!(totals["交通費"], Amount::yen(1200));
        assert_eq!(out.message(), "2 categories, largest is 交通費 at ¥1,200");

        let args = CategoriesArgs::new(&file, Some(TransactionType::Income), may());
        let out = categories(&args).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_compare_totals() {
        let env = TestEnv::new().await;
        let file = env.write_file("t.json", JSON);
        let mut cache = TransactionCache::new(env.config().cache_ttl());

        let out = compare(&CompareArgs::new(&file, may(), None), &mut cache)
            .await
            .unwrap();
        let comparison = out.structure().unwrap();
        assert_eq!(comparison.labels.current, "2024年5月");
        assert_eq!(comparison.labels.previous, "2024年4月");
        let ComparisonDetail::Totals { data, score, .. } = &comparison.detail else {
            panic!("expected totals");
        };
        // 220000 vs 200000 income, 2000 vs 40000 expense, 218000 vs 160000 balance
        assert_eq!(data.change_rates.income, 10);
        assert_eq!(data.change_rates.expense, -95);
        assert_eq!(data.change_rates.balance, 36);
        // 50 + 5 + 25 + 10.8
        assert_eq!(*score, 91);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_compare_by_category_and_missing_period() {
        let env = TestEnv::new().await;
        let file = env.write_file("t.json", JSON);
        let mut cache = TransactionCache::new(Duration::from_secs(60));

        let args = CompareArgs::new(&file, may(), Some(TransactionType::Expense));
        let out = compare(&args, &mut cache).await.unwrap();
        let ComparisonDetail::Categories(rows) = &out.structure().unwrap().detail else {
            panic!("expected categories");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "交通費");
        assert!(!rows[0].has_previous_data);
        assert_eq!(rows[0].change_rate, 100);
        assert_eq!(rows[1].category, "食費");
        assert_eq!(rows[1].change_rate, -98);

        let args = CompareArgs::new(&file, PeriodArgs::default(), None);
        assert!(compare(&args, &mut cache).await.is_err());
    }
}
