use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{Amount, Transaction, TransactionInput, Transactions};
use crate::{Config, Result};
use anyhow::{bail, Context};
use std::str::FromStr;
use tracing::info;

/// Validates the entered fields and appends the new transaction to a JSON transactions file.
///
/// The icon is looked up in the configured category catalog. When no category is given, the first
/// category of the transaction type is used.
///
/// # Errors
/// - The file is a CSV file, or it exists and cannot be parsed.
/// - Any field fails validation. Every violation is listed in the error.
pub async fn add(config: &Config, args: &AddArgs) -> Result<Out<Transaction>> {
    let path = args.file();
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    {
        bail!("Transactions can only be added to a JSON file, got '{}'", path.display())
    }

    let categories = config.categories();
    let category = match args.category() {
        Some(category) => category.to_string(),
        None => categories
            .default_label(args.transaction_type())
            .unwrap_or_default()
            .to_string(),
    };
    let amount = Amount::from_str(args.amount())
        .with_context(|| format!("Invalid amount '{}'", args.amount()))?;
    let input = TransactionInput {
        transaction_type: args.transaction_type(),
        date: args.date().to_string(),
        amount,
        content: args.content().map(str::to_string),
        category,
    };

    let mut transactions = if path.is_file() {
        Transactions::load(path).await?
    } else {
        info!("Starting a new transactions file at {}", path.display());
        Transactions::default()
    };
    let added = transactions.insert(&input, &categories)?.clone();
    transactions.save(path).await?;

    Ok(Out::new(
        format!(
            "Added {} {} ¥{} on {} ({} transactions in file)",
            added.transaction_type(),
            added.category(),
            added.amount(),
            added.date(),
            transactions.len()
        ),
        added,
    ))
}
