//! Core domain logic for the catalog backend.
//! This crate is the single source of truth for category, product and asset
//! consistency invariants.

pub mod asset;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use asset::{AssetError, AssetResult, AssetStore, FsAssetStore};
pub use config::CatalogConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::asset::{AssetRef, AssetUpload};
pub use model::category::{Category, CategoryId, NewCategory};
pub use model::page::{Page, PageRequest, SortDirection};
pub use model::product::{
    BoxDimension, Product, ProductDetail, ProductFields, ProductId, ProductImage, ProductImageId,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult, UnitOfWork};
pub use service::category_ref::resolve_category_ref;
pub use service::category_service::{CategoryDraft, CategoryService, CategoryUpdateOutcome};
pub use service::error::{CatalogError, CatalogResult, EntityKind};
pub use service::listing::CategoryNode;
pub use service::product_service::{ProductDraft, ProductService};
pub use service::view::{CategoryTreeView, CategoryView, ProductImageView, ProductView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
