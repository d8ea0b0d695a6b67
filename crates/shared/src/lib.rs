//! Shared types, errors, and configuration for Racha.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money type (integer minor units, no floats ever)
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{Money, MoneyError};
