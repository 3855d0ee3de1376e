//! Product domain model.
//!
//! # Invariants
//! - `category` is advisory free text; the rename propagator keeps it equal
//!   to a category name when it started out as one.
//! - Dimension, detail and additional-image rows are owned by the product
//!   and removed with it.

use crate::model::asset::AssetRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-generated product identifier.
pub type ProductId = i64;
/// Store-generated identifier of one additional-image row.
pub type ProductImageId = i64;

/// Package dimensions owned 1:1 by a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxDimension {
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub length: Option<Decimal>,
    pub weight: Option<Decimal>,
}

/// Arbitrary name/value attribute owned by a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub name: String,
    pub value: String,
}

impl ProductDetail {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Additional image row owned by a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub file_name: AssetRef,
}

/// Catalog item read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub brand: Option<String>,
    /// Denormalized category name.
    pub category: Option<String>,
    pub main_image: Option<AssetRef>,
    /// Ordered by insertion.
    pub additional_images: Vec<ProductImage>,
    pub list_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub enabled: bool,
    pub in_stock: bool,
    pub dimension: Option<BoxDimension>,
    pub details: Vec<ProductDetail>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Product {
    /// Returns the writable column set of this product.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            short_description: self.short_description.clone(),
            full_description: self.full_description.clone(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            main_image: self.main_image.clone(),
            list_price: self.list_price,
            discount: self.discount,
            cost: self.cost,
            enabled: self.enabled,
            in_stock: self.in_stock,
            dimension: self.dimension.clone(),
            details: self.details.clone(),
        }
    }

    /// Every blob this product owns: main image first, then additional ones.
    pub fn owned_assets(&self) -> Vec<AssetRef> {
        self.main_image
            .iter()
            .cloned()
            .chain(
                self.additional_images
                    .iter()
                    .map(|image| image.file_name.clone()),
            )
            .collect()
    }
}

/// Write model for product create/update.
///
/// Additional images are not part of this set; they are appended and removed
/// through dedicated repository calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub main_image: Option<AssetRef>,
    pub list_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub enabled: bool,
    pub in_stock: bool,
    /// `None` removes the dimension row.
    pub dimension: Option<BoxDimension>,
    /// Replaces the whole detail list.
    pub details: Vec<ProductDetail>,
}
