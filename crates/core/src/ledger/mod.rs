//! Derived double-entry view and integrity audits.
//!
//! This module derives a debit/credit audit view from the transaction
//! history. It is used for integrity verification and reconciliation, not
//! for settlement itself.

pub mod balance;
pub mod entry;
pub mod integrity;
pub mod service;


pub use balance::expected_balance;
pub use entry::{LedgerEntry, TrialBalanceItem};
pub use integrity::{IntegrityResult, OrphanedTransaction, verify_integrity};
pub use service::LedgerService;
