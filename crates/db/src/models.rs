//! Plain records for the two tables in the inventory schema.
//!
//! These carry no behaviour; handlers pass them straight to the views.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// categories
// ---------------------------------------------------------------------------

/// A named grouping of tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Fields submitted when creating or editing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// tools
// ---------------------------------------------------------------------------

/// A catalogued tool.
///
/// `category` is only filled in by queries that join `categories`; the
/// edit fetch leaves it at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category: Category,
    pub url: String,
    pub rating: i64,
    pub notes: String,
}

/// Fields submitted when creating or editing a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInput {
    pub name: String,
    pub category_id: i64,
    pub url: String,
    pub rating: i64,
    pub notes: String,
}
