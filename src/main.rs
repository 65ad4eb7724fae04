use clap::Parser;
use kakeibo::args::{Args, Command};
use kakeibo::cache::TransactionCache;
use kakeibo::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().kakeibo_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),
        Command::Summary(summary_args) => commands::summary(summary_args).await?.print(),
        Command::Daily(daily_args) => commands::daily(daily_args).await?.print(),
        Command::Monthly(monthly_args) => commands::monthly(monthly_args).await?.print(),
        Command::Categories(categories_args) => {
            commands::categories(categories_args).await?.print()
        }
        Command::Compare(compare_args) => {
            let config = Config::load(home).await?;
            let mut cache = TransactionCache::new(config.cache_ttl());
            commands::compare(compare_args, &mut cache).await?.print()
        }
        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add(&config, add_args).await?.print()
        }
        Command::Calc(calc_args) => commands::calc(calc_args)?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
