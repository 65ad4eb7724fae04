//! kakeibo: a household budgeting engine.
//!
//! Transactions are reduced into daily, monthly and per-category balances, and two periods can be
//! compared with integer percentage change rates. See [`finance`] for the engine, [`model`] for
//! the data types and [`calc`] for the amount-entry calculator.

pub mod args;
pub mod cache;
pub mod calc;
pub mod commands;
mod config;
mod error;
pub mod finance;
pub mod format;
pub mod model;
mod utils;


pub use config::Config;
pub use error::{Error, Result};
