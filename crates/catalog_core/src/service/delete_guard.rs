//! Structural delete checks for categories.

use crate::model::category::Category;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::service::error::{CatalogError, CatalogResult};

/// Fails when deleting `category` would orphan products or child categories.
///
/// Product references are by name only, so a product pointing at another
/// category with the same name also blocks the delete.
pub fn ensure_category_deletable<C, P>(
    categories: &C,
    products: &P,
    category: &Category,
) -> CatalogResult<()>
where
    C: CategoryRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    if products.exists_by_category_name(&category.name)? {
        return Err(CatalogError::CategoryInUse {
            id: category.id,
            name: category.name.clone(),
        });
    }
    if categories.has_children(category.id)? {
        return Err(CatalogError::CategoryHasChildren(category.id));
    }
    Ok(())
}
