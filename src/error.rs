//! The crate-wide error type for everything outside the pure finance engine.

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
