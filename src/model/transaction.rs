use crate::format::{format_currency, DATE_FORMAT};
use crate::model::{Amount, Categories, Period};
use crate::{utils, Result};
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

/// Whether money came in or went out. Every transaction is exactly one of the two.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single recorded income or expense.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: String,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    date: NaiveDate,
    amount: Amount,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        transaction_type: TransactionType,
        date: NaiveDate,
        amount: Amount,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            transaction_type,
            date,
            amount,
            category: category.into(),
            content: None,
            icon: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// An in-memory list of transactions, e.g. everything fetched for one month.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transactions {
    data: Vec<Transaction>,
}

impl Transactions {
    pub fn new(data: Vec<Transaction>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<Transaction> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.data.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.data.iter().find(|t| t.id == id)
    }

    /// The transactions recorded on `date`, as shown in the day's transaction menu.
    pub fn on_day(&self, date: NaiveDate) -> Transactions {
        self.filtered(|t| t.date == date)
    }

    pub fn in_month(&self, year: i32, month: u32) -> Transactions {
        self.filtered(|t| t.date.year() == year && t.date.month() == month)
    }

    pub fn in_year(&self, year: i32) -> Transactions {
        self.filtered(|t| t.date.year() == year)
    }

    pub fn in_period(&self, period: Period) -> Transactions {
        self.filtered(|t| period.contains(t.date))
    }

    fn filtered(&self, f: impl Fn(&Transaction) -> bool) -> Transactions {
        Transactions::new(self.data.iter().filter(|t| f(t)).cloned().collect())
    }

    /// Validates `input`, attaches the icon `categories` has for its category, assigns a fresh id
    /// and appends it. Returns the stored transaction.
    pub fn insert(
        &mut self,
        input: &TransactionInput,
        categories: &Categories,
    ) -> Result<&Transaction> {
        let id = uuid::Uuid::new_v4().to_string();
        let transaction = input.to_transaction(id, categories)?;
        debug!("Inserting transaction {}", transaction.id);
        self.data.push(transaction);
        self.data
            .last()
            .context("The transaction list was empty after an insert")
    }

    /// Replaces the fields of the transaction with `id` with those of `input`, keeping the id.
    pub fn update(
        &mut self,
        id: &str,
        input: &TransactionInput,
        categories: &Categories,
    ) -> Result<&Transaction> {
        let updated = input.to_transaction(id, categories)?;
        let existing = self
            .data
            .iter_mut()
            .find(|t| t.id == id)
            .with_context(|| format!("No transaction with id '{id}'"))?;
        *existing = updated;
        Ok(existing)
    }

    /// Removes every transaction whose id is in `ids` and returns how many were removed.
    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let before = self.data.len();
        self.data
            .retain(|t| !ids.iter().any(|id| id.as_ref() == t.id));
        before - self.data.len()
    }

    /// Parses a JSON array of transactions.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Unable to parse transactions JSON")
    }

    /// Parses CSV with the headers `id,type,date,amount,category,content,icon`. The `id`, `content`
    /// and `icon` columns may be empty or missing. Rows without an id are given a UUID.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut data = Vec::new();
        for (ix, result) in rdr.deserialize().enumerate() {
            let record: CsvRecord =
                result.with_context(|| format!("Unable to read CSV record at row {}", ix + 2))?;
            data.push(
                record
                    .into_transaction()
                    .with_context(|| format!("Invalid transaction at CSV row {}", ix + 2))?,
            );
        }
        Ok(Self { data })
    }

    /// Loads a transactions file. Files ending in `.csv` are read as CSV, anything else as JSON.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = utils::read(path).await?;
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let transactions = if is_csv {
            Self::from_csv(content.as_bytes())
        } else {
            Self::from_json(&content)
        }
        .with_context(|| format!("Unable to load transactions from {}", path.display()))?;
        debug!(
            "Loaded {} transactions from {}",
            transactions.len(),
            path.display()
        );
        Ok(transactions)
    }

    /// Writes the transactions to `path` as a pretty-printed JSON array.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Unable to serialize transactions")?;
        utils::write(path, json).await?;
        debug!("Saved {} transactions to {}", self.len(), path.display());
        Ok(())
    }
}

impl From<Vec<Transaction>> for Transactions {
    fn from(data: Vec<Transaction>) -> Self {
        Transactions::new(data)
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl AsRef<[Transaction]> for Transactions {
    fn as_ref(&self) -> &[Transaction] {
        &self.data
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
struct CsvRecord {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    date: String,
    amount: String,
    category: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    icon: String,
}

impl CsvRecord {
    fn into_transaction(self) -> Result<Transaction> {
        let id = if self.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            self.id
        };
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .with_context(|| format!("Invalid date '{}'", self.date))?;
        let amount = Amount::from_str(&self.amount)?;
        trace!("Parsed CSV transaction {id}");
        Ok(Transaction {
            id,
            transaction_type: self.transaction_type,
            date,
            amount,
            category: self.category,
            content: non_empty(self.content),
            icon: non_empty(self.icon),
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

const MAX_AMOUNT_CHARS: usize = 10;
const MAX_CONTENT_CHARS: usize = 50;

/// A single rule violation found by [`TransactionInput::validate`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// The values a user enters to record or edit a transaction, before an id is assigned.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: String,
    pub amount: Amount,
    #[serde(default)]
    pub content: Option<String>,
    pub category: String,
}

impl TransactionInput {
    /// Checks the entry form rules and returns every violation found, in field order.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.date.trim().is_empty() {
            errors.push(FieldError {
                field: "date",
                message: "日付は必須です".into(),
            });
        }
        if self.amount.is_zero() {
            errors.push(FieldError {
                field: "amount",
                message: "金額は必須です".into(),
            });
        } else if self.amount.is_negative() {
            errors.push(FieldError {
                field: "amount",
                message: "金額は0より大きい値にしてください".into(),
            });
        } else if format_currency(self.amount.value()).chars().count() > MAX_AMOUNT_CHARS {
            errors.push(FieldError {
                field: "amount",
                message: "金額は10桁以内にしてください".into(),
            });
        }
        if let Some(content) = &self.content {
            if content.chars().count() > MAX_CONTENT_CHARS {
                errors.push(FieldError {
                    field: "content",
                    message: "内容は50文字以内にしてください。".into(),
                });
            }
        }
        if self.category.is_empty() {
            errors.push(FieldError {
                field: "category",
                message: "カテゴリを選択してください".into(),
            });
        }
        errors
    }

    fn to_transaction(
        &self,
        id: impl Into<String>,
        categories: &Categories,
    ) -> Result<Transaction> {
        let errors = self.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join(", ");
            bail!("Invalid transaction: {joined}");
        }
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .with_context(|| format!("Invalid date '{}'", self.date))?;
        Ok(Transaction {
            id: id.into(),
            transaction_type: self.transaction_type,
            date,
            amount: self.amount,
            category: self.category.clone(),
            content: self.content.clone(),
            icon: categories
                .icon_for(self.transaction_type, &self.category)
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, expense, income};

    fn input(amount: i64, category: &str) -> TransactionInput {
        TransactionInput {
            transaction_type: TransactionType::Expense,
            date: "2024-05-01".into(),
            amount: Amount::yen(amount),
            content: None,
            category: category.into(),
        }
    }

    #[test]
    fn test_transaction_type_plain_strings() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(
            TransactionType::from_str("expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::from_str("transfer").is_err());
    }

    #[test]
    fn test_json_round_trip_field_names() {
        let t = expense("a", "2024-05-01", 500, "食費").with_content("lunch");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["amount"], 500);
        assert!(json.get("icon").is_none());
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"[{"id":"x","type":"gift","date":"2024-05-01","amount":1,"category":"c"}]"#;
        assert!(Transactions::from_json(json).is_err());
    }

    #[test]
    fn test_from_csv() {
        let csv = "id,type,date,amount,category,content,icon\n\
                   a,income,2024-05-25,\"250,000\",給与,,Work\n\
                   ,expense,2024-05-26,1200,食費,dinner,\n";
        let transactions = Transactions::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);
        let first = &transactions.data()[0];
        assert_eq!(first.id(), "a");
        assert_eq!(first.amount(), Amount::yen(250_000));
        assert_eq!(first.icon(), Some("Work"));
        assert_eq!(first.content(), None);
        let second = &transactions.data()[1];
        assert!(!second.id().is_empty());
        assert_eq!(second.content(), Some("dinner"));
    }

    #[test]
    fn test_from_csv_bad_date() {
        let csv = "id,type,date,amount,category\na,income,May 5th,1,給与\n";
        assert!(Transactions::from_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_period_filters() {
        let transactions = Transactions::new(vec![
            expense("a", "2024-05-01", 500, "食費"),
            expense("b", "2024-05-02", 300, "食費"),
            income("c", "2024-04-25", 1000, "給与"),
            income("d", "2023-05-25", 1000, "給与"),
        ]);
        assert_eq!(transactions.on_day(date("2024-05-01")).len(), 1);
        assert_eq!(transactions.in_month(2024, 5).len(), 2);
        assert_eq!(transactions.in_year(2024).len(), 3);
        let may = Period::from_str("2024-05").unwrap();
        assert_eq!(transactions.in_period(may.previous()).len(), 1);
    }

    #[test]
    fn test_validate_ok() {
        assert!(input(500, "食費").validate().is_empty());
    }

    #[test]
    fn test_validate_violations() {
        let mut bad = input(0, "");
        bad.date = String::new();
        bad.content = Some("あ".repeat(51));
        let fields: Vec<_> = bad.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["date", "amount", "content", "category"]);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let errors = input(-500, "食費").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "amount");
        assert_eq!(errors[0].message, "金額は0より大きい値にしてください");
    }

    #[test]
    fn test_validate_amount_length() {
        // "1,000,000,000" is 13 characters once grouped.
        assert_eq!(input(1_000_000_000, "食費").validate().len(), 1);
        // "999,999,999" is 11.
        assert_eq!(input(999_999_999, "食費").validate().len(), 1);
        // "9,999,999" is 9.
        assert!(input(9_999_999, "食費").validate().is_empty());
    }

    #[test]
    fn test_insert_update_remove() {
        let categories = Categories::default();
        let mut transactions = Transactions::default();
        let id = transactions
            .insert(&input(500, "食費"), &categories)
            .unwrap()
            .id()
            .to_string();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions.get(&id).unwrap().icon(), Some("Fastfood"));

        let updated = transactions
            .update(&id, &input(700, "交通費"), &categories)
            .unwrap();
        assert_eq!(updated.amount(), Amount::yen(700));
        assert_eq!(updated.icon(), Some("Train"));

        assert!(transactions
            .update("missing", &input(1, "食費"), &categories)
            .is_err());
        assert!(transactions.insert(&input(0, "食費"), &categories).is_err());

        assert_eq!(transactions.remove(&[id.as_str(), "missing"]), 1);
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let json_path = dir.path().join("transactions.json");
        let original = Transactions::new(vec![
            expense("a", "2024-05-01", 500, "食費").with_content("昼食"),
            income("b", "2024-05-25", 250_000, "給与"),
        ]);
        original.save(&json_path).await.unwrap();
        assert_eq!(Transactions::load(&json_path).await.unwrap(), original);

        let csv_path = dir.path().join("transactions.CSV");
        crate::utils::write(
            &csv_path,
            "id,type,date,amount,category\na,expense,2024-05-01,500,食費\n",
        )
        .await
        .unwrap();
        let loaded = Transactions::load(&csv_path).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("a").unwrap().amount(), Amount::yen(500));
    }
}
