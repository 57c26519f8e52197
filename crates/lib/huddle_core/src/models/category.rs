//! Event categories.

use serde::{Deserialize, Serialize};

/// Event category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub color_code: String,
}
