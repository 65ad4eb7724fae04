use crate::model::TransactionType;
use serde::{Deserialize, Serialize};

/// One selectable category label and the icon shown next to it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryItem {
    pub label: String,
    pub icon: String,
}

impl CategoryItem {
    pub fn new(label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
        }
    }
}

/// The category catalog: the ordered expense and income categories a transaction may use.
///
/// The first entry of each list is the default selection when entering a new transaction.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Categories {
    expense: Vec<CategoryItem>,
    income: Vec<CategoryItem>,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            expense: vec![
                CategoryItem::new("食費", "Fastfood"),
                CategoryItem::new("日用品", "Alarm"),
                CategoryItem::new("住居費", "AddHome"),
                CategoryItem::new("交際費", "Diversity3"),
                CategoryItem::new("娯楽", "SportsTennis"),
                CategoryItem::new("交通費", "Train"),
            ],
            income: vec![
                CategoryItem::new("給与", "Work"),
                CategoryItem::new("副収入", "AddBusiness"),
                CategoryItem::new("お小遣い", "Savings"),
            ],
        }
    }
}

impl Categories {
    pub fn new(expense: Vec<CategoryItem>, income: Vec<CategoryItem>) -> Self {
        Self { expense, income }
    }

    pub fn of_type(&self, transaction_type: TransactionType) -> &[CategoryItem] {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    /// The label a new transaction of this type starts with, if the catalog has any.
    pub fn default_label(&self, transaction_type: TransactionType) -> Option<&str> {
        self.of_type(transaction_type)
            .first()
            .map(|c| c.label.as_str())
    }

    pub fn contains(&self, transaction_type: TransactionType, label: &str) -> bool {
        self.of_type(transaction_type)
            .iter()
            .any(|c| c.label == label)
    }

    /// Looks up the icon for `label` among the categories of `transaction_type` only.
    pub fn icon_for(&self, transaction_type: TransactionType, label: &str) -> Option<&str> {
        self.of_type(transaction_type)
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.icon.as_str())
    }
}
