//! Mirror-transaction synchronization for shared expenses.
//!
//! A shared transaction owned by the payer is reflected into each
//! non-payer member's personal transaction list as a read-only mirror.
//! Mirrors are owned by this module: user edits route through the source
//! and resync, and deleting the source cascades.

pub mod error;
pub mod service;

#[cfg(test)]
mod tests;

pub use error::MirrorError;
pub use service::MirrorSync;
