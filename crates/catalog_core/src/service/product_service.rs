//! Product use-case service.
//!
//! # Responsibility
//! - Resolve product-side category input into canonical names.
//! - Couple main and additional image blobs to product record mutations.
//!
//! # Invariants
//! - Blobs are written before the record referencing them commits, and old
//!   blobs are released only after the record stops referencing them.
//! - `update` re-resolves `category` only when a new input is supplied.
//! - Details are replaced wholesale on update; dimension only when supplied.

use crate::asset::AssetStore;
use crate::model::asset::{AssetRef, AssetUpload};
use crate::model::page::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use crate::model::product::{
    BoxDimension, Product, ProductDetail, ProductFields, ProductId, ProductImageId,
};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::repo::UnitOfWork;
use crate::service::asset_lifecycle::{
    commit_with_new_assets, release_asset, release_assets, release_replaced, store_upload,
    store_uploads,
};
use crate::service::category_ref::resolve_category_ref;
use crate::service::error::{CatalogError, CatalogResult, EntityKind};
use crate::service::view::ProductView;
use log::info;
use rust_decimal::Decimal;

/// Create/update input for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub brand: Option<String>,
    /// Category id (all digits) or literal category name.
    pub category: Option<String>,
    pub list_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub enabled: bool,
    pub in_stock: bool,
    pub dimension: Option<BoxDimension>,
    pub details: Vec<ProductDetail>,
    /// Empty or absent keeps the current main image.
    pub main_image: Option<AssetUpload>,
    /// Appended after any existing additional images.
    pub additional_images: Vec<AssetUpload>,
}

impl ProductDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Product service facade.
///
/// `products` and `categories` must share one connection.
pub struct ProductService<P, C, A>
where
    P: ProductRepository + UnitOfWork,
    C: CategoryRepository,
    A: AssetStore,
{
    products: P,
    categories: C,
    assets: A,
    default_page_size: u32,
}

impl<P, C, A> ProductService<P, C, A>
where
    P: ProductRepository + UnitOfWork,
    C: CategoryRepository,
    A: AssetStore,
{
    pub fn new(products: P, categories: C, assets: A) -> Self {
        Self {
            products,
            categories,
            assets,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size used when callers omit one.
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Creates one product with its owned rows and uploaded images.
    pub fn create(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let name = normalize_product_name(&draft.name)?;
        let category = draft
            .category
            .as_deref()
            .map(|input| resolve_category_ref(&self.categories, input))
            .transpose()?;

        let main_image = store_upload(&self.assets, draft.main_image.as_ref())?;
        let extras = commit_with_new_assets(&self.assets, main_image.as_slice(), || {
            store_uploads(&self.assets, &draft.additional_images)
        })?;
        let new_assets: Vec<AssetRef> = main_image.iter().chain(&extras).cloned().collect();

        let fields = ProductFields {
            name,
            short_description: draft.short_description,
            full_description: draft.full_description,
            brand: draft.brand,
            category,
            main_image,
            list_price: draft.list_price,
            discount: draft.discount,
            cost: draft.cost,
            enabled: draft.enabled,
            in_stock: draft.in_stock,
            dimension: draft.dimension,
            details: draft.details,
        };
        let id = commit_with_new_assets(&self.assets, &new_assets, || {
            self.products.in_transaction(|| {
                let id = self.products.create_product(&fields)?;
                for image in &extras {
                    self.products.add_image(id, image)?;
                }
                Ok::<_, CatalogError>(id)
            })
        })?;

        info!(
            "event=product_create module=product status=ok product_id={id} images={}",
            new_assets.len()
        );
        self.get(id)
    }

    /// Updates one product.
    pub fn update(&self, id: ProductId, draft: ProductDraft) -> CatalogResult<Product> {
        let name = normalize_product_name(&draft.name)?;

        let new_main_image = store_upload(&self.assets, draft.main_image.as_ref())?;
        let extras = commit_with_new_assets(&self.assets, new_main_image.as_slice(), || {
            store_uploads(&self.assets, &draft.additional_images)
        })?;
        let new_assets: Vec<AssetRef> = new_main_image.iter().chain(&extras).cloned().collect();

        let previous = commit_with_new_assets(&self.assets, &new_assets, || {
            self.products.in_transaction(|| {
                let existing = self.get(id)?;
                let category = match draft.category.as_deref() {
                    Some(input) => Some(resolve_category_ref(&self.categories, input)?),
                    None => existing.category.clone(),
                };
                let fields = ProductFields {
                    name,
                    short_description: draft.short_description,
                    full_description: draft.full_description,
                    brand: draft.brand,
                    category,
                    main_image: new_main_image
                        .clone()
                        .or_else(|| existing.main_image.clone()),
                    list_price: draft.list_price,
                    discount: draft.discount,
                    cost: draft.cost,
                    enabled: draft.enabled,
                    in_stock: draft.in_stock,
                    dimension: draft.dimension.or_else(|| existing.dimension.clone()),
                    details: draft.details,
                };
                self.products.update_product(id, &fields)?;
                for image in &extras {
                    self.products.add_image(id, image)?;
                }
                Ok::<_, CatalogError>(existing)
            })
        })?;

        if new_main_image.is_some() {
            release_replaced(
                &self.assets,
                previous.main_image.as_ref(),
                new_main_image.as_ref(),
            );
        }
        info!("event=product_update module=product status=ok product_id={id}");
        self.get(id)
    }

    /// Replaces the main image. Absent or empty uploads return the product
    /// unchanged.
    pub fn update_main_image(
        &self,
        id: ProductId,
        upload: Option<&AssetUpload>,
    ) -> CatalogResult<Product> {
        let Some(new_image) = store_upload(&self.assets, upload)? else {
            return self.get(id);
        };

        let new_assets = std::slice::from_ref(&new_image);
        let previous = commit_with_new_assets(&self.assets, new_assets, || {
            self.products.in_transaction(|| {
                let existing = self.get(id)?;
                let mut fields = existing.fields();
                fields.main_image = Some(new_image.clone());
                self.products.update_product(id, &fields)?;
                Ok::<_, CatalogError>(existing)
            })
        })?;

        release_replaced(&self.assets, previous.main_image.as_ref(), Some(&new_image));
        info!("event=product_main_image module=product status=ok product_id={id}");
        self.get(id)
    }

    /// Appends additional images in upload order; empty uploads are skipped.
    pub fn add_additional_images(
        &self,
        id: ProductId,
        uploads: &[AssetUpload],
    ) -> CatalogResult<Product> {
        self.get(id)?;
        let stored = store_uploads(&self.assets, uploads)?;
        commit_with_new_assets(&self.assets, &stored, || {
            self.products.in_transaction(|| {
                for image in &stored {
                    self.products.add_image(id, image)?;
                }
                Ok::<_, CatalogError>(())
            })
        })?;

        info!(
            "event=product_images_add module=product status=ok product_id={id} images={}",
            stored.len()
        );
        self.get(id)
    }

    /// Removes one additional image row, then its blob.
    pub fn remove_additional_image(
        &self,
        id: ProductId,
        image_id: ProductImageId,
    ) -> CatalogResult<Product> {
        let removed = self.products.remove_image(id, image_id)?;
        release_asset(&self.assets, &removed.file_name);
        info!(
            "event=product_image_remove module=product status=ok product_id={id} image_id={image_id}"
        );
        self.get(id)
    }

    /// Loads one product.
    pub fn get(&self, id: ProductId) -> CatalogResult<Product> {
        self.products.get_product(id)?.ok_or(CatalogError::NotFound {
            kind: EntityKind::Product,
            id,
        })
    }

    /// Lists one page of products ordered by id.
    pub fn list(&self, page: Option<u32>, size: Option<u32>) -> CatalogResult<Page<Product>> {
        let request = PageRequest::new(page, size, self.default_page_size);
        let items = self.products.list_products(request)?;
        let total = self.products.count_products()?;
        Ok(Page::new(items, request, total))
    }

    /// Deletes one product, then releases every blob it owned.
    pub fn delete(&self, id: ProductId) -> CatalogResult<()> {
        let existing = self.products.in_transaction(|| {
            let existing = self.get(id)?;
            self.products.delete_product(id)?;
            Ok::<_, CatalogError>(existing)
        })?;
        release_assets(&self.assets, &existing.owned_assets());
        info!("event=product_delete module=product status=ok product_id={id}");
        Ok(())
    }

    pub fn view(&self, product: &Product) -> ProductView {
        ProductView::new(product, &self.assets)
    }
}

fn normalize_product_name(value: &str) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidName);
    }
    Ok(trimmed.to_string())
}
