use catalog_core::{
    AssetError, AssetRef, AssetResult, AssetStore, Category, CategoryId, CategoryRepository,
    DbError, FsAssetStore, NewCategory, PageRequest, RepoResult, SortDirection,
    SqliteCategoryRepository, UnitOfWork,
};
use std::cell::RefCell;
use std::io::{Error, ErrorKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Filesystem store whose writes or deletes can be forced to fail.
#[allow(dead_code)]
pub struct FlakyAssetStore<'a> {
    pub inner: &'a FsAssetStore,
    pub fail_store: bool,
    pub fail_delete: bool,
    pub delete_attempts: AtomicUsize,
}

#[allow(dead_code)]
impl<'a> FlakyAssetStore<'a> {
    pub fn failing_deletes(inner: &'a FsAssetStore) -> Self {
        Self {
            inner,
            fail_store: false,
            fail_delete: true,
            delete_attempts: AtomicUsize::new(0),
        }
    }

    pub fn failing_stores(inner: &'a FsAssetStore) -> Self {
        Self {
            inner,
            fail_store: true,
            fail_delete: false,
            delete_attempts: AtomicUsize::new(0),
        }
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }
}

impl AssetStore for FlakyAssetStore<'_> {
    fn store(&self, bytes: &[u8], original_name: &str) -> AssetResult<AssetRef> {
        if self.fail_store {
            return Err(AssetError::Io {
                operation: "store",
                asset: original_name.to_string(),
                source: Error::new(ErrorKind::Other, "disk full"),
            });
        }
        self.inner.store(bytes, original_name)
    }

    fn delete(&self, asset: &AssetRef) -> AssetResult<()> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(AssetError::Io {
                operation: "delete",
                asset: asset.to_string(),
                source: Error::new(ErrorKind::PermissionDenied, "read-only volume"),
            });
        }
        self.inner.delete(asset)
    }

    fn resolve(&self, asset: &AssetRef) -> AssetResult<PathBuf> {
        self.inner.resolve(asset)
    }

    fn url_for(&self, asset: &AssetRef) -> String {
        self.inner.url_for(asset)
    }
}

/// Category repository that runs a hook right before its next transaction
/// opens, to interleave a write from another connection.
#[allow(dead_code)]
pub struct InterleavedCategories<'a> {
    inner: SqliteCategoryRepository<'a>,
    before_transaction: RefCell<Option<Box<dyn FnOnce() + 'a>>>,
}

#[allow(dead_code)]
impl<'a> InterleavedCategories<'a> {
    pub fn new(inner: SqliteCategoryRepository<'a>, hook: impl FnOnce() + 'a) -> Self {
        Self {
            inner,
            before_transaction: RefCell::new(Some(Box::new(hook))),
        }
    }
}

impl UnitOfWork for InterleavedCategories<'_> {
    fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DbError>,
    {
        let hook = self.before_transaction.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        self.inner.in_transaction(work)
    }
}

impl CategoryRepository for InterleavedCategories<'_> {
    fn create_category(&self, category: &NewCategory) -> RepoResult<Category> {
        self.inner.create_category(category)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.inner.update_category(category)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.inner.get_category(id)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.inner.delete_category(id)
    }

    fn list_children(&self, parent_id: Option<CategoryId>) -> RepoResult<Vec<Category>> {
        self.inner.list_children(parent_id)
    }

    fn list_ordered(
        &self,
        request: PageRequest,
        direction: SortDirection,
    ) -> RepoResult<Vec<Category>> {
        self.inner.list_ordered(request, direction)
    }

    fn count_categories(&self) -> RepoResult<u64> {
        self.inner.count_categories()
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        self.inner.find_by_name(name)
    }

    fn has_children(&self, id: CategoryId) -> RepoResult<bool> {
        self.inner.has_children(id)
    }
}
