//! These structs provide the CLI interface for the kakeibo CLI.

use crate::finance::Granularity;
use crate::model::{Period, TransactionType};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// kakeibo: A command-line household budget book.
///
/// Reads a file of income and expense transactions and reports balances per day, per month and
/// per category, or compares a month or year with the one before it.
///
/// Transaction files are either a JSON array or a CSV file with the headers
/// `id,type,date,amount,category,content,icon`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and a default config.json.
    ///
    /// The directory is --kakeibo-home, which defaults to $HOME/kakeibo. Edit the config.json
    /// afterwards to change the cache TTL or to replace the built-in category lists.
    Init,
    /// Total income, expense and balance for a month, a year, or the whole file.
    Summary(SummaryArgs),
    /// Per-day balances for one month.
    Daily(DailyArgs),
    /// Per-month balances for one year.
    Monthly(MonthlyArgs),
    /// Totals per category.
    Categories(CategoriesArgs),
    /// Compare a month or year with the one before it.
    Compare(CompareArgs),
    /// Validate a new transaction and append it to a JSON transactions file.
    Add(AddArgs),
    /// Evaluate an arithmetic expression like the amount field's calculator, e.g. "1200×3+500".
    Calc(CalcArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the kakeibo configuration is held. Defaults to ~/kakeibo
    #[arg(long, env = "KAKEIBO_HOME", default_value_t = default_kakeibo_home())]
    kakeibo_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, kakeibo_home: PathBuf) -> Self {
        Self {
            log_level,
            kakeibo_home: kakeibo_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn kakeibo_home(&self) -> &DisplayPath {
        &self.kakeibo_home
    }
}

/// Selects at most one reporting window.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct PeriodArgs {
    /// A month, as YYYY-MM.
    #[arg(long, conflicts_with = "year")]
    month: Option<Period>,

    /// A year, as YYYY.
    #[arg(long)]
    year: Option<i32>,
}

impl PeriodArgs {
    pub fn new(month: Option<Period>, year: Option<i32>) -> Self {
        Self { month, year }
    }

    /// The selected window, or `None` for everything in the file. A `--month` given as a bare
    /// year is treated as that year.
    pub fn period(&self) -> Option<Period> {
        self.month.or(self.year.map(Period::Year))
    }
}

/// (Not shown): Args for the `kakeibo summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The transactions file, JSON or CSV.
    #[arg(long)]
    file: PathBuf,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl SummaryArgs {
    pub fn new(file: impl Into<PathBuf>, period: PeriodArgs) -> Self {
        Self {
            file: file.into(),
            period,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn period(&self) -> Option<Period> {
        self.period.period()
    }
}

/// (Not shown): Args for the `kakeibo daily` command.
#[derive(Debug, Parser, Clone)]
pub struct DailyArgs {
    /// The transactions file, JSON or CSV.
    #[arg(long)]
    file: PathBuf,

    /// The month to break down, as YYYY-MM.
    #[arg(long)]
    month: Period,
}

impl DailyArgs {
    pub fn new(file: impl Into<PathBuf>, month: Period) -> Self {
        Self {
            file: file.into(),
            month,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn month(&self) -> Period {
        self.month
    }
}

/// (Not shown): Args for the `kakeibo monthly` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthlyArgs {
    /// The transactions file, JSON or CSV.
    #[arg(long)]
    file: PathBuf,

    /// The year to break down.
    #[arg(long)]
    year: i32,

    /// Key each month by its two-digit number ("05") instead of "2024-05".
    #[arg(long)]
    legacy_keys: bool,
}

impl MonthlyArgs {
    pub fn new(file: impl Into<PathBuf>, year: i32, legacy_keys: bool) -> Self {
        Self {
            file: file.into(),
            year,
            legacy_keys,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn granularity(&self) -> Granularity {
        if self.legacy_keys {
            Granularity::Month
        } else {
            Granularity::YearMonth
        }
    }
}

/// (Not shown): Args for the `kakeibo categories` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoriesArgs {
    /// The transactions file, JSON or CSV.
    #[arg(long)]
    file: PathBuf,

    /// Only count transactions of this type.
    #[arg(long = "type", value_enum)]
    transaction_type: Option<TransactionType>,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl CategoriesArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        transaction_type: Option<TransactionType>,
        period: PeriodArgs,
    ) -> Self {
        Self {
            file: file.into(),
            transaction_type,
            period,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    pub fn period(&self) -> Option<Period> {
        self.period.period()
    }
}

/// (Not shown): Args for the `kakeibo compare` command.
#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    /// The transactions file, JSON or CSV.
    #[arg(long)]
    file: PathBuf,

    #[clap(flatten)]
    period: PeriodArgs,

    /// Compare per category for this transaction type instead of the overall balance.
    #[arg(long = "type", value_enum)]
    transaction_type: Option<TransactionType>,
}

impl CompareArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        period: PeriodArgs,
        transaction_type: Option<TransactionType>,
    ) -> Self {
        Self {
            file: file.into(),
            period,
            transaction_type,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn period(&self) -> Option<Period> {
        self.period.period()
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }
}

/// (Not shown): Args for the `kakeibo add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The JSON transactions file to append to. It is created if it does not exist.
    #[arg(long)]
    file: PathBuf,

    #[arg(long = "type", value_enum, default_value_t = TransactionType::Expense)]
    transaction_type: TransactionType,

    /// The date, as YYYY-MM-DD.
    #[arg(long)]
    date: String,

    /// The amount; commas, a yen sign and full-width digits are accepted.
    #[arg(long)]
    amount: String,

    /// The category label. Defaults to the first category of the type.
    #[arg(long)]
    category: Option<String>,

    /// A note of up to 50 characters.
    #[arg(long)]
    content: Option<String>,
}

impl AddArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        transaction_type: TransactionType,
        date: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            transaction_type,
            date: date.into(),
            amount: amount.into(),
            category: None,
            content: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// (Not shown): Args for the `kakeibo calc` command.
#[derive(Debug, Parser, Clone)]
pub struct CalcArgs {
    /// The expression, e.g. "1200×3+500". Full-width digits and `×`/`÷` are accepted.
    expression: String,
}

impl CalcArgs {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

fn default_kakeibo_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("kakeibo"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --kakeibo-home or KAKEIBO_HOME instead of relying on the \
                default kakeibo home directory.",
            );
            PathBuf::from("kakeibo")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
