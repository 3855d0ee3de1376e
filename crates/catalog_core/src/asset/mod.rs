//! Filesystem-backed blob storage for record-owned images.
//!
//! # Responsibility
//! - Store uploaded blobs under one process-wide root with generated names.
//! - Delete and resolve blobs by their stored file name (`AssetRef`).
//! - Render asset references as retrievable URLs for response shapes.
//!
//! # Invariants
//! - Stored names are bare file names; references never escape the root.
//! - Deleting a missing blob is not an error.
//! - The store never touches database records; lifecycle ordering lives in
//!   the service layer.

use crate::model::asset::AssetRef;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod fs_store;

pub use fs_store::{sanitize_original_name, FsAssetStore};

pub type AssetResult<T> = Result<T, AssetError>;

/// Errors from asset store operations.
#[derive(Debug)]
pub enum AssetError {
    /// Underlying filesystem failure.
    Io {
        operation: &'static str,
        asset: String,
        source: std::io::Error,
    },
    /// Reference is not a plain file name inside the store root.
    InvalidReference(String),
    /// Upload payload carried no bytes.
    EmptyPayload,
}

impl Display for AssetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                operation,
                asset,
                source,
            } => write!(f, "asset {operation} failed for `{asset}`: {source}"),
            Self::InvalidReference(value) => write!(f, "invalid asset reference `{value}`"),
            Self::EmptyPayload => write!(f, "asset payload is empty"),
        }
    }
}

impl Error for AssetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidReference(_) => None,
            Self::EmptyPayload => None,
        }
    }
}

/// Blob storage contract used by catalog services.
pub trait AssetStore {
    /// Writes `bytes` under a freshly generated name derived from
    /// `original_name` and returns its reference.
    fn store(&self, bytes: &[u8], original_name: &str) -> AssetResult<AssetRef>;
    /// Removes one blob. Missing blobs count as removed.
    fn delete(&self, asset: &AssetRef) -> AssetResult<()>;
    /// Resolves a reference to its on-disk path.
    fn resolve(&self, asset: &AssetRef) -> AssetResult<PathBuf>;
    /// Renders a reference as a client-retrievable URL path.
    fn url_for(&self, asset: &AssetRef) -> String;
}

impl<A: AssetStore + ?Sized> AssetStore for &A {
    fn store(&self, bytes: &[u8], original_name: &str) -> AssetResult<AssetRef> {
        (**self).store(bytes, original_name)
    }

    fn delete(&self, asset: &AssetRef) -> AssetResult<()> {
        (**self).delete(asset)
    }

    fn resolve(&self, asset: &AssetRef) -> AssetResult<PathBuf> {
        (**self).resolve(asset)
    }

    fn url_for(&self, asset: &AssetRef) -> String {
        (**self).url_for(asset)
    }
}
