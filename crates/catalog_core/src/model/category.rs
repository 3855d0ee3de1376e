//! Category domain model.
//!
//! # Invariants
//! - `parent_id`, when set, references an existing category.
//! - Parent links never form a cycle (checked on assignment by the service).
//! - `name` is stored trimmed and non-blank.

use crate::model::asset::AssetRef;
use serde::{Deserialize, Serialize};

/// Store-generated category identifier.
pub type CategoryId = i64;

/// Node of the self-referential category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display label; products copy this value into `Product::category`.
    pub name: String,
    pub description: Option<String>,
    /// Owned image blob.
    pub image: Option<AssetRef>,
    pub enabled: bool,
    /// `None` means top-level.
    pub parent_id: Option<CategoryId>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Category {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Insert model for a new category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<AssetRef>,
    pub enabled: bool,
    pub parent_id: Option<CategoryId>,
}

/// Trims a category name, returning `None` when nothing is left.
pub fn normalize_category_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
