pub mod mocks;

use catalog_core::{
    open_db_in_memory, AssetStore, AssetUpload, CategoryService, FsAssetStore, ProductService,
    SqliteCategoryRepository, SqliteProductRepository,
};
use rusqlite::Connection;
use tempfile::TempDir;

pub type TestCategoryService<'a, A> =
    CategoryService<SqliteCategoryRepository<'a>, SqliteProductRepository<'a>, A>;
pub type TestProductService<'a, A> =
    ProductService<SqliteProductRepository<'a>, SqliteCategoryRepository<'a>, A>;

/// Migrated in-memory database plus an asset store rooted in a temp dir.
pub struct Catalog {
    pub conn: Connection,
    pub assets: FsAssetStore,
    _asset_dir: TempDir,
}

#[allow(dead_code)]
impl Catalog {
    pub fn new() -> Self {
        let asset_dir = tempfile::tempdir().unwrap();
        let assets = FsAssetStore::open(asset_dir.path().join("user-images"), "/user-images")
            .unwrap();
        Self {
            conn: open_db_in_memory().unwrap(),
            assets,
            _asset_dir: asset_dir,
        }
    }

    pub fn categories(&self) -> TestCategoryService<'_, &FsAssetStore> {
        self.categories_with(&self.assets)
    }

    pub fn categories_with<A: AssetStore>(&self, assets: A) -> TestCategoryService<'_, A> {
        CategoryService::new(
            SqliteCategoryRepository::try_new(&self.conn).unwrap(),
            SqliteProductRepository::try_new(&self.conn).unwrap(),
            assets,
        )
    }

    pub fn products(&self) -> TestProductService<'_, &FsAssetStore> {
        self.products_with(&self.assets)
    }

    pub fn products_with<A: AssetStore>(&self, assets: A) -> TestProductService<'_, A> {
        ProductService::new(
            SqliteProductRepository::try_new(&self.conn).unwrap(),
            SqliteCategoryRepository::try_new(&self.conn).unwrap(),
            assets,
        )
    }

    /// File names currently present under the asset root, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.assets.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Makes every later write of a product's `category` column fail.
    pub fn block_product_category_rewrites(&self) {
        self.conn
            .execute_batch(
                "CREATE TRIGGER block_category_rewrite
                 BEFORE UPDATE OF category ON products
                 BEGIN
                    SELECT RAISE(ABORT, 'category rewrite blocked');
                 END;",
            )
            .unwrap();
    }
}

#[allow(dead_code)]
pub fn upload(name: &str, bytes: &[u8]) -> AssetUpload {
    AssetUpload::new(name, bytes.to_vec())
}
