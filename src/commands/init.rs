use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` with default settings.
///
/// # Errors
/// - Returns an error if any file operations fail or the directory already has a config.
pub async fn init(kakeibo_home: &Path) -> Result<Out<()>> {
    let config = Config::create(kakeibo_home)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the kakeibo directory and config at {}",
        config.root().display()
    )
    .into())
}
