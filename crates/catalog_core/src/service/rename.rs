//! Rename propagation from categories to denormalized product rows.
//!
//! # Invariants
//! - Matching is exact and case-sensitive on `Product::category`.
//! - Callers run this inside the same transaction as the category rename;
//!   any failure is reported as `Propagation` so the rename rolls back.

use crate::repo::product_repo::ProductRepository;
use crate::repo::RepoError;
use crate::service::error::{CatalogError, CatalogResult};
use log::{error, info};

/// Rewrites `category` from `old_name` to `new_name` on every product.
///
/// Returns the number of rewritten products. Identical names are a no-op.
pub fn propagate_category_rename<P>(
    products: &P,
    old_name: &str,
    new_name: &str,
) -> CatalogResult<usize>
where
    P: ProductRepository + ?Sized,
{
    if old_name == new_name {
        return Ok(0);
    }

    rewrite_dependents(products, old_name, new_name).map_err(|source| {
        error!(
            "event=category_rename_propagate module=category status=error error={source}"
        );
        CatalogError::Propagation {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            source,
        }
    })
}

fn rewrite_dependents<P>(products: &P, old_name: &str, new_name: &str) -> Result<usize, RepoError>
where
    P: ProductRepository + ?Sized,
{
    let dependents = products.find_by_category_name(old_name)?;
    for product in &dependents {
        products.set_category(product.id, new_name)?;
    }
    info!(
        "event=category_rename_propagate module=category status=ok products={}",
        dependents.len()
    );
    Ok(dependents.len())
}
