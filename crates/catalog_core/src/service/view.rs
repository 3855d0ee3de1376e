//! Response shapes with asset references rendered as URLs.

use crate::asset::AssetStore;
use crate::model::category::{Category, CategoryId};
use crate::model::product::{BoxDimension, Product, ProductDetail, ProductId, ProductImageId};
use crate::service::listing::CategoryNode;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub enabled: bool,
    pub parent_id: Option<CategoryId>,
}

impl CategoryView {
    pub fn new<A: AssetStore + ?Sized>(category: &Category, assets: &A) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            image_url: category.image.as_ref().map(|image| assets.url_for(image)),
            enabled: category.enabled,
            parent_id: category.parent_id,
        }
    }
}

/// Nested tree node as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTreeView {
    #[serde(flatten)]
    pub category: CategoryView,
    pub children: Vec<CategoryTreeView>,
}

impl CategoryTreeView {
    pub fn new<A: AssetStore + ?Sized>(node: &CategoryNode, assets: &A) -> Self {
        Self {
            category: CategoryView::new(&node.category, assets),
            children: node
                .children
                .iter()
                .map(|child| Self::new(child, assets))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductImageView {
    pub id: ProductImageId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub main_image_url: Option<String>,
    pub additional_images: Vec<ProductImageView>,
    pub list_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub enabled: bool,
    pub in_stock: bool,
    pub dimension: Option<BoxDimension>,
    pub details: Vec<ProductDetail>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProductView {
    pub fn new<A: AssetStore + ?Sized>(product: &Product, assets: &A) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            short_description: product.short_description.clone(),
            full_description: product.full_description.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            main_image_url: product
                .main_image
                .as_ref()
                .map(|image| assets.url_for(image)),
            additional_images: product
                .additional_images
                .iter()
                .map(|image| ProductImageView {
                    id: image.id,
                    url: assets.url_for(&image.file_name),
                })
                .collect(),
            list_price: product.list_price,
            discount: product.discount,
            cost: product.cost,
            enabled: product.enabled,
            in_stock: product.in_stock,
            dimension: product.dimension.clone(),
            details: product.details.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
