use crate::model::{Amount, Transaction, TransactionType};
use std::collections::BTreeMap;

/// Sums amounts per category label.
///
/// With `type_filter`, transactions of the other type are skipped entirely: they add nothing and
/// their category does not appear. Without a filter every amount is added regardless of type.
pub fn aggregate_by_category<'a, I>(
    transactions: I,
    type_filter: Option<TransactionType>,
) -> BTreeMap<String, Amount>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();
    for transaction in transactions {
        if type_filter.is_some_and(|t| t != transaction.transaction_type()) {
            continue;
        }
        *totals
            .entry(transaction.category().to_string())
            .or_default() += transaction.amount();
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, expense, income};

    fn sample() -> Vec<Transaction> {
        vec![
            expense("a", "2024-05-01", 500, "food"),
            expense("b", "2024-05-01", 300, "food"),
        ]
    }

    #[test]
    fn test_filter_excludes_other_type() {
        assert!(aggregate_by_category(&sample(), Some(TransactionType::Income)).is_empty());
    }

    #[test]
    fn test_sums_per_category() {
        let mut transactions = sample();
        transactions.push(expense("c", "2024-05-02", 1200, "transport"));
        transactions.push(income("d", "2024-05-25", 1000, "salary"));
        let expenses = aggregate_by_category(&transactions, Some(TransactionType::Expense));
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses["food"], Amount::yen(800));
        assert_eq!(expenses["transport"], Amount::yen(1200));
        assert!(!expenses.contains_key("salary"));
    }

    #[test]
    fn test_no_filter_merges_types() {
        let transactions = vec![
            expense("a", "2024-05-01", 500, "misc"),
            income("b", "2024-05-02", 200, "misc"),
        ];
        let all = aggregate_by_category(&transactions, None);
        assert_eq!(all.len(), 1);
        assert_eq!(all["misc"], Amount::yen(700));
    }

    #[test]
    fn test_category_total_saturates() {
        let max = Amount::new(rust_decimal::Decimal::MAX);
        let huge = |id| {
            Transaction::new(id, TransactionType::Expense, date("2024-05-01"), max, "food")
        };
        let totals = aggregate_by_category(&[huge("a"), huge("b")], None);
        assert_eq!(totals["food"], max);
    }
}
