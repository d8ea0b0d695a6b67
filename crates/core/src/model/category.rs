//! Transaction category.

use serde::{Deserialize, Serialize};

use racha_shared::types::CategoryId;

/// A transaction category, used as the counter-side of ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}
