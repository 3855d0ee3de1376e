//! Category use-case service.
//!
//! # Responsibility
//! - Validate names and parent links above the repository layer.
//! - Coordinate rename propagation, delete checks and the category image
//!   lifecycle with the category store.
//!
//! # Invariants
//! - Category names are unique among categories (checked here, not in schema).
//! - Parent assignment never creates a cycle.
//! - Rename and product rewrite commit or roll back together.
//! - An identical name on update performs no product pass.

use crate::asset::AssetStore;
use crate::model::asset::AssetUpload;
use crate::model::category::{normalize_category_name, Category, CategoryId, NewCategory};
use crate::model::page::{Page, PageRequest, SortDirection, DEFAULT_PAGE_SIZE};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::repo::UnitOfWork;
use crate::service::asset_lifecycle::{
    commit_with_new_assets, release_asset, release_replaced, store_upload,
};
use crate::service::delete_guard::ensure_category_deletable;
use crate::service::error::{CatalogError, CatalogResult, EntityKind};
use crate::service::listing::{build_tree, list_page, render_hierarchy, CategoryNode};
use crate::service::rename::propagate_category_rename;
use crate::service::view::{CategoryTreeView, CategoryView};
use log::{error, info};
use std::collections::HashSet;

/// Create/update input for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    /// `None` keeps the stored flag on update and means `true` on create.
    pub enabled: Option<bool>,
    /// `None` makes the category top-level, also on update.
    pub parent_id: Option<CategoryId>,
    /// Empty or absent keeps the current image.
    pub image: Option<AssetUpload>,
}

impl CategoryDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Result of a category update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUpdateOutcome {
    pub category: Category,
    /// Number of products rewritten; `None` when the name did not change.
    pub renamed_products: Option<usize>,
}

/// Category service facade.
///
/// `categories` and `products` must share one connection so that
/// `UnitOfWork` covers writes through both.
pub struct CategoryService<C, P, A>
where
    C: CategoryRepository + UnitOfWork,
    P: ProductRepository,
    A: AssetStore,
{
    categories: C,
    products: P,
    assets: A,
    default_page_size: u32,
}

impl<C, P, A> CategoryService<C, P, A>
where
    C: CategoryRepository + UnitOfWork,
    P: ProductRepository,
    A: AssetStore,
{
    pub fn new(categories: C, products: P, assets: A) -> Self {
        Self {
            categories,
            products,
            assets,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size used when callers omit one.
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Creates one category, storing its image first when supplied.
    pub fn create(&self, draft: CategoryDraft) -> CatalogResult<Category> {
        let name = normalize_category_name(&draft.name).ok_or(CatalogError::InvalidName)?;

        let image = store_upload(&self.assets, draft.image.as_ref())?;
        let created = commit_with_new_assets(&self.assets, image.as_slice(), || {
            self.categories.in_transaction(|| {
                if self.categories.find_by_name(&name)?.is_some() {
                    return Err(CatalogError::DuplicateName(name));
                }
                let created = self.categories.create_category(&NewCategory {
                    name,
                    description: draft.description,
                    image: image.clone(),
                    enabled: draft.enabled.unwrap_or(true),
                    parent_id: draft.parent_id,
                })?;
                Ok::<_, CatalogError>(created)
            })
        })?;

        info!(
            "event=category_create module=category status=ok category_id={} has_image={}",
            created.id,
            created.image.is_some()
        );
        Ok(created)
    }

    /// Updates one category.
    ///
    /// A changed name is propagated to every product carrying the old name in
    /// the same transaction as the rename.
    pub fn update(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> CatalogResult<CategoryUpdateOutcome> {
        let name = normalize_category_name(&draft.name).ok_or(CatalogError::InvalidName)?;
        let new_image = store_upload(&self.assets, draft.image.as_ref())?;

        // The stored row is read under the write lock; its name drives propagation.
        let (previous, renamed_products) =
            commit_with_new_assets(&self.assets, new_image.as_slice(), || {
                self.categories.in_transaction(|| {
                    let existing = self.get(id)?;
                    let renaming = name != existing.name;
                    if renaming {
                        if let Some(other) = self.categories.find_by_name(&name)? {
                            if other.id != id {
                                return Err(CatalogError::DuplicateName(name));
                            }
                        }
                    }
                    if let Some(parent_id) = draft.parent_id {
                        self.ensure_parent_assignable(id, parent_id)?;
                    }

                    let updated = Category {
                        name,
                        description: draft.description,
                        image: new_image.clone().or_else(|| existing.image.clone()),
                        enabled: draft.enabled.unwrap_or(existing.enabled),
                        parent_id: draft.parent_id,
                        ..existing.clone()
                    };
                    let renamed = if renaming {
                        Some(propagate_category_rename(
                            &self.products,
                            &existing.name,
                            &updated.name,
                        )?)
                    } else {
                        None
                    };
                    self.categories.update_category(&updated)?;
                    Ok::<_, CatalogError>((existing, renamed))
                })
            })
            .inspect_err(|err| {
                error!(
                    "event=category_update module=category status=error category_id={id} error_code={}",
                    err.code()
                );
            })?;

        if new_image.is_some() {
            release_replaced(&self.assets, previous.image.as_ref(), new_image.as_ref());
        }

        info!(
            "event=category_update module=category status=ok category_id={id} renamed_products={}",
            renamed_products.unwrap_or(0)
        );
        Ok(CategoryUpdateOutcome {
            category: self.get(id)?,
            renamed_products,
        })
    }

    /// Loads one category.
    pub fn get(&self, id: CategoryId) -> CatalogResult<Category> {
        self.categories
            .get_category(id)?
            .ok_or(CatalogError::NotFound {
                kind: EntityKind::Category,
                id,
            })
    }

    /// Checks whether `id` could be deleted right now.
    pub fn can_delete(&self, id: CategoryId) -> CatalogResult<()> {
        let category = self.get(id)?;
        ensure_category_deletable(&self.categories, &self.products, &category)
    }

    /// Deletes one category, then releases its image.
    pub fn delete(&self, id: CategoryId) -> CatalogResult<()> {
        let category = self
            .categories
            .in_transaction(|| {
                let category = self.get(id)?;
                ensure_category_deletable(&self.categories, &self.products, &category)?;
                self.categories.delete_category(id)?;
                Ok::<_, CatalogError>(category)
            })
            .inspect_err(|err| {
                info!(
                    "event=category_delete module=category status=skipped category_id={id} error_code={}",
                    err.code()
                );
            })?;

        if let Some(image) = category.image.as_ref() {
            release_asset(&self.assets, image);
        }
        info!("event=category_delete module=category status=ok category_id={id}");
        Ok(())
    }

    /// Lists direct children of `parent_id`, or top-level categories.
    pub fn list_children(&self, parent_id: Option<CategoryId>) -> CatalogResult<Vec<Category>> {
        if let Some(parent_id) = parent_id {
            self.get(parent_id)?;
        }
        self.categories
            .list_children(parent_id)
            .map_err(Into::into)
    }

    /// Lists one page, top-level first, then by name in `sort` direction.
    ///
    /// `sort` accepts `asc`/`desc` in any case; anything else is ascending.
    pub fn list_page(
        &self,
        page: Option<u32>,
        size: Option<u32>,
        sort: &str,
    ) -> CatalogResult<Page<Category>> {
        let request = PageRequest::new(page, size, self.default_page_size);
        list_page(&self.categories, request, SortDirection::parse(sort))
    }

    /// Builds the nested category tree.
    pub fn tree(&self, direction: SortDirection) -> CatalogResult<Vec<CategoryNode>> {
        build_tree(&self.categories, direction)
    }

    /// Renders the tree as lines prefixed by `--` per depth level.
    pub fn hierarchy_text(&self, direction: SortDirection) -> CatalogResult<String> {
        Ok(render_hierarchy(&self.tree(direction)?).join("\n"))
    }

    pub fn view(&self, category: &Category) -> CategoryView {
        CategoryView::new(category, &self.assets)
    }

    pub fn tree_view(&self, nodes: &[CategoryNode]) -> Vec<CategoryTreeView> {
        nodes
            .iter()
            .map(|node| CategoryTreeView::new(node, &self.assets))
            .collect()
    }

    fn ensure_parent_assignable(&self, id: CategoryId, parent_id: CategoryId) -> CatalogResult<()> {
        if parent_id == id || self.would_create_cycle(id, parent_id)? {
            return Err(CatalogError::CycleDetected {
                category_id: id,
                parent_id,
            });
        }
        Ok(())
    }

    fn would_create_cycle(
        &self,
        id: CategoryId,
        candidate_parent_id: CategoryId,
    ) -> CatalogResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent_id);
        while let Some(current) = cursor {
            if current == id {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(true);
            }

            let category = self
                .categories
                .get_category(current)?
                .ok_or(CatalogError::ParentNotFound(current))?;
            cursor = category.parent_id;
        }
        Ok(false)
    }
}
