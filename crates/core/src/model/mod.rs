//! Domain records shared by all core modules.

pub mod account;
pub mod category;
pub mod split;
pub mod transaction;

pub use account::{Account, AccountType, Currency};
pub use category::Category;
pub use split::Split;
pub use transaction::{Transaction, TransactionKind};
