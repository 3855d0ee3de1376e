//! Catalog service error taxonomy.

use crate::asset::AssetError;
use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Entity kind carried by `CatalogError::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Product,
    ProductImage,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => f.write_str("category"),
            Self::Product => f.write_str("product"),
            Self::ProductImage => f.write_str("product image"),
        }
    }
}

/// Error returned by catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// Addressed record does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Supplied `parent_id` does not reference an existing category.
    ParentNotFound(CategoryId),
    /// All-digit category reference did not match any category id.
    CategoryNotFound(String),
    /// At least one product still carries this category name.
    CategoryInUse { id: CategoryId, name: String },
    /// At least one category still has this category as parent.
    CategoryHasChildren(CategoryId),
    /// Parent assignment would make a category its own ancestor.
    CycleDetected {
        category_id: CategoryId,
        parent_id: CategoryId,
    },
    /// Another category already carries this name.
    DuplicateName(String),
    /// Category or product name is blank after trim.
    InvalidName,
    /// Blob could not be stored, resolved or removed.
    AssetIo(AssetError),
    /// Rewriting dependent products after a rename failed; the rename was
    /// rolled back.
    Propagation {
        old_name: String,
        new_name: String,
        source: RepoError,
    },
    /// Storage transport failure.
    Repo(RepoError),
}

impl CatalogError {
    /// Returns whether this error is caused by the request rather than the
    /// backend. Client errors are final and must not be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::ParentNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::CategoryInUse { .. }
                | Self::CategoryHasChildren(_)
                | Self::CycleDetected { .. }
                | Self::DuplicateName(_)
                | Self::InvalidName
        )
    }

    /// Stable machine-readable code, used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::ParentNotFound(_) => "parent_not_found",
            Self::CategoryNotFound(_) => "category_not_found",
            Self::CategoryInUse { .. } => "category_in_use",
            Self::CategoryHasChildren(_) => "category_has_children",
            Self::CycleDetected { .. } => "cycle_detected",
            Self::DuplicateName(_) => "duplicate_name",
            Self::InvalidName => "invalid_name",
            Self::AssetIo(_) => "asset_io",
            Self::Propagation { .. } => "propagation_failed",
            Self::Repo(_) => "repo",
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent category not found: {id}"),
            Self::CategoryNotFound(reference) => {
                write!(f, "no category with id `{reference}`")
            }
            Self::CategoryInUse { id, name } => write!(
                f,
                "category {id} (`{name}`) is still referenced by products"
            ),
            Self::CategoryHasChildren(id) => {
                write!(f, "category {id} still has child categories")
            }
            Self::CycleDetected {
                category_id,
                parent_id,
            } => write!(
                f,
                "parent {parent_id} would make category {category_id} its own ancestor"
            ),
            Self::DuplicateName(name) => write!(f, "category name already exists: `{name}`"),
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::AssetIo(err) => write!(f, "{err}"),
            Self::Propagation {
                old_name,
                new_name,
                source,
            } => write!(
                f,
                "failed to move products from `{old_name}` to `{new_name}`: {source}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AssetIo(err) => Some(err),
            Self::Propagation { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CategoryNotFound(id) => Self::NotFound {
                kind: EntityKind::Category,
                id,
            },
            RepoError::ParentNotFound(id) => Self::ParentNotFound(id),
            RepoError::ProductNotFound(id) => Self::NotFound {
                kind: EntityKind::Product,
                id,
            },
            RepoError::ProductImageNotFound { image_id, .. } => Self::NotFound {
                kind: EntityKind::ProductImage,
                id: image_id,
            },
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<AssetError> for CatalogError {
    fn from(value: AssetError) -> Self {
        Self::AssetIo(value)
    }
}
