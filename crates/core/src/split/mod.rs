//! Percentage split computation and validation.

pub mod engine;
pub mod error;

#[cfg(test)]
mod engine_props;

pub use engine::{ShareInput, SplitEngine};
pub use error::SplitError;
