//! Category reference resolution for product writes.
//!
//! A product names its category either by numeric id or by literal name.
//! All-digit input is always treated as an id, so a category whose name is
//! purely numeric cannot be referenced by that name.

use crate::model::category::CategoryId;
use crate::repo::category_repo::CategoryRepository;
use crate::service::error::{CatalogError, CatalogResult};
use once_cell::sync::Lazy;
use regex::Regex;

static CATEGORY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid category id regex"));

/// Turns a product-side category input into a canonical category name.
///
/// # Errors
/// - `CategoryNotFound` when `input` is all digits and no category has that id
///   (including ids too large to be stored).
pub fn resolve_category_ref<C>(categories: &C, input: &str) -> CatalogResult<String>
where
    C: CategoryRepository + ?Sized,
{
    if !CATEGORY_ID_RE.is_match(input) {
        return Ok(input.to_string());
    }

    let id: CategoryId = input
        .parse()
        .map_err(|_| CatalogError::CategoryNotFound(input.to_string()))?;
    categories
        .get_category(id)?
        .map(|category| category.name)
        .ok_or_else(|| CatalogError::CategoryNotFound(input.to_string()))
}

/// Returns whether `input` would be resolved as a category id.
pub fn is_category_id_ref(input: &str) -> bool {
    CATEGORY_ID_RE.is_match(input)
}
