//! Question catalog row.

use serde::{Deserialize, Serialize};

/// One yes/no question from the catalog.
///
/// Rows are owned by the catalog (seeded by migration); the core treats
/// them as immutable reference data. `display_order` defines both the
/// presentation order and the answer iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Catalog row id, referenced by answer rows.
    pub id: i64,
    /// Unique stable key used by `AnswerSet` and external callers.
    pub question_key: String,
    /// Prompt text shown to the user.
    pub question_text: String,
    /// Presentation icon identifier. Opaque to the core.
    pub icon_name: String,
    pub display_order: i64,
    pub is_active: bool,
}
