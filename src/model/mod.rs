//! Types that represent the core data model, such as `Transaction` and `Categories`.
mod amount;
mod category;
mod period;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{Categories, CategoryItem};
pub use period::Period;
pub use transaction::{FieldError, Transaction, TransactionInput, TransactionType, Transactions};
