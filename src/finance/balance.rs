use crate::model::{Amount, Transaction, TransactionType};
use serde::Serialize;

/// Income and expense totals for a set of transactions.
///
/// `balance` is always `income - expense`. It is recomputed on every change and may be negative.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Balance {
    income: Amount,
    expense: Amount,
    balance: Amount,
}

impl Balance {
    pub fn new(income: Amount, expense: Amount) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }

    pub fn income(&self) -> Amount {
        self.income
    }

    pub fn expense(&self) -> Amount {
        self.expense
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Adds one transaction to the totals.
    pub fn add(&mut self, transaction: &Transaction) {
        match transaction.transaction_type() {
            TransactionType::Income => self.income += transaction.amount(),
            TransactionType::Expense => self.expense += transaction.amount(),
        }
        self.balance = self.income - self.expense;
    }
}

impl<'a> FromIterator<&'a Transaction> for Balance {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(iter: I) -> Self {
        iter.into_iter().fold(Balance::default(), |mut acc, t| {
            acc.add(t);
            acc
        })
    }
}

/// Sums `transactions` into income, expense and balance. An empty input gives all zeros.
pub fn aggregate<'a, I>(transactions: I) -> Balance
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().collect()
}
