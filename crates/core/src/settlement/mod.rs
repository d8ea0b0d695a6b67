//! Split settlement state machine.
//!
//! A split moves `PENDING -> SETTLED` through [`SettlementService::settle`]
//! and back through [`SettlementService::unsettle`]. No other transitions
//! exist. The store offers no multi-statement transactions, so every
//! multi-step sequence here is ordered check-then-act with explicit
//! compensating actions for steps that can fail after an earlier commit.

pub mod compensation;
pub mod error;
pub mod service;
pub mod types;


pub use error::SettlementError;
pub use service::SettlementService;
pub use types::{SettleRequest, SettlementResult};
