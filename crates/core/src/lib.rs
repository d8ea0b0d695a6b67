//! Settlement and split-accounting core for Racha.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. The persistent store is an injected collaborator behind
//! the [`store::Store`] trait.
//!
//! # Modules
//!
//! - `model` - Domain records (transactions, splits, accounts)
//! - `split` - Percentage split computation and validation
//! - `ledger` - Derived double-entry view and integrity audits
//! - `settlement` - Split settlement state machine with compensation
//! - `mirror` - Mirror-transaction synchronization for shared expenses
//! - `store` - Store trait, in-memory implementation, and outbox

pub mod ledger;
pub mod mirror;
pub mod model;
pub mod settlement;
pub mod split;
pub mod store;
