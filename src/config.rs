//! Configuration file handling for kakeibo.
//!
//! The configuration file is stored at `$KAKEIBO_HOME/config.json` and holds the cache TTL and
//! optional overrides of the category catalog.

use crate::model::{Categories, CategoryItem, TransactionType};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const APP_NAME: &str = "kakeibo";
const CONFIG_VERSION: u8 = 1;
const CACHE_TTL_SECS: u64 = 300;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$KAKEIBO_HOME` and from there it loads `$KAKEIBO_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` with default settings.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail, or if a `config.json` already exists.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the kakeibo home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!("A config file already exists at '{}'", config_path.display())
        }
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;
        debug!("Wrote {}", config_path.display());

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Validates that `kakeibo_home` exists and holds a valid `config.json`, then loads it.
    pub async fn load(kakeibo_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = kakeibo_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Kakeibo home is missing, run 'kakeibo init' first")?;
        if !utils::is_dir(&root).await {
            bail!("Kakeibo home is not a directory '{}'", root.display())
        }

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// How long a cached period's transactions stay fresh.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config_file.cache_ttl_secs)
    }

    /// The category catalog, where either list may be overridden by the config file.
    pub fn categories(&self) -> Categories {
        let defaults = Categories::default();
        let expense = self
            .config_file
            .expense_categories
            .clone()
            .unwrap_or_else(|| defaults.of_type(TransactionType::Expense).to_vec());
        let income = self
            .config_file
            .income_categories
            .clone()
            .unwrap_or_else(|| defaults.of_type(TransactionType::Income).to_vec());
        Categories::new(expense, income)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "kakeibo",
///   "config_version": 1,
///   "cache_ttl_secs": 300,
///   "income_categories": [{ "label": "給与", "icon": "Work" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "kakeibo"
    app_name: String,

    config_version: u8,

    #[serde(default = "default_cache_ttl_secs")]
    cache_ttl_secs: u64,

    /// Replaces the built-in expense categories when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expense_categories: Option<Vec<CategoryItem>>,

    /// Replaces the built-in income categories when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    income_categories: Option<Vec<CategoryItem>>,
}

fn default_cache_ttl_secs() -> u64 {
    CACHE_TTL_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            cache_ttl_secs: CACHE_TTL_SECS,
            expense_categories: None,
            income_categories: None,
        }
    }
}

impl ConfigFile {
    /// Loads and validates a ConfigFile.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if its `app_name` or
    /// `config_version` is not one this program understands.
    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Failed to load the config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("kakeibo_home");

        let created = Config::create(&home_dir).await.unwrap();
        assert!(created.config_path().is_file());
        assert_eq!(created.cache_ttl(), Duration::from_secs(300));

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(loaded.root(), created.root());
        assert_eq!(loaded.categories(), Categories::default());
    }

    #[tokio::test]
    async fn test_config_create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        assert!(Config::create(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
        // Exists but has no config.json.
        assert!(Config::load(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        utils::write(&path, r#"{"app_name": "other", "config_version": 1}"#)
            .await
            .unwrap();
        let err = ConfigFile::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_minimal_with_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{
            "app_name": "kakeibo",
            "config_version": 1,
            "income_categories": [{ "label": "年金", "icon": "Savings" }]
        }"#;
        utils::write(&path, json).await.unwrap();

        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(CACHE_TTL_SECS));
        let categories = config.categories();
        assert_eq!(
            categories.default_label(TransactionType::Income),
            Some("年金")
        );
        assert_eq!(
            categories.default_label(TransactionType::Expense),
            Some("食費")
        );
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let original = ConfigFile {
            cache_ttl_secs: 60,
            expense_categories: Some(vec![CategoryItem::new("外食", "Restaurant")]),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        assert_eq!(ConfigFile::load(&path).await.unwrap(), original);
    }
}
