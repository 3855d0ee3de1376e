//! Ordering rules that couple blob files to record mutations.
//!
//! # Invariants
//! - A new blob is written before the record that points at it is committed.
//! - An old blob is removed only after the record stops pointing at it.
//! - Removal of a blob no longer referenced is best-effort; failures are
//!   logged and never abort the mutation.
//!
//! A crash between steps can leave an orphan file but never a record that
//! references a missing file.

use crate::asset::AssetStore;
use crate::model::asset::{AssetRef, AssetUpload};
use crate::service::error::CatalogResult;
use log::{info, warn};

/// Stores `upload` when it carries bytes. Absent or empty uploads yield
/// `None` and touch nothing.
pub fn store_upload<A>(assets: &A, upload: Option<&AssetUpload>) -> CatalogResult<Option<AssetRef>>
where
    A: AssetStore + ?Sized,
{
    let Some(upload) = upload.filter(|upload| !upload.is_empty()) else {
        return Ok(None);
    };
    let stored = assets.store(&upload.bytes, &upload.original_name)?;
    info!("event=asset_store module=asset status=ok asset={stored}");
    Ok(Some(stored))
}

/// Stores every non-empty upload, in order. On failure blobs already written
/// by this call are discarded.
pub fn store_uploads<A>(assets: &A, uploads: &[AssetUpload]) -> CatalogResult<Vec<AssetRef>>
where
    A: AssetStore + ?Sized,
{
    let mut stored = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match store_upload(assets, Some(upload)) {
            Ok(Some(asset)) => stored.push(asset),
            Ok(None) => {}
            Err(err) => {
                discard_new_assets(assets, &stored);
                return Err(err);
            }
        }
    }
    Ok(stored)
}

/// Runs `commit` with freshly stored blobs and discards them if the commit
/// fails, so a failed write leaves no new file behind.
pub fn commit_with_new_assets<A, T, F>(
    assets: &A,
    new_assets: &[AssetRef],
    commit: F,
) -> CatalogResult<T>
where
    A: AssetStore + ?Sized,
    F: FnOnce() -> CatalogResult<T>,
{
    commit().inspect_err(|_| discard_new_assets(assets, new_assets))
}

/// Deletes a blob the committed record no longer references.
pub fn release_asset<A>(assets: &A, asset: &AssetRef)
where
    A: AssetStore + ?Sized,
{
    match assets.delete(asset) {
        Ok(()) => info!("event=asset_release module=asset status=ok asset={asset}"),
        Err(err) => {
            warn!("event=asset_release module=asset status=error asset={asset} error={err}")
        }
    }
}

/// Releases every blob in `released`.
pub fn release_assets<A>(assets: &A, released: &[AssetRef])
where
    A: AssetStore + ?Sized,
{
    for asset in released {
        release_asset(assets, asset);
    }
}

/// Releases the previous blob once a replacement has been committed.
///
/// Nothing happens when no replacement was supplied or the reference did not
/// change.
pub fn release_replaced<A>(assets: &A, previous: Option<&AssetRef>, current: Option<&AssetRef>)
where
    A: AssetStore + ?Sized,
{
    if let Some(previous) = previous {
        if current != Some(previous) {
            release_asset(assets, previous);
        }
    }
}

fn discard_new_assets<A>(assets: &A, new_assets: &[AssetRef])
where
    A: AssetStore + ?Sized,
{
    for asset in new_assets {
        if let Err(err) = assets.delete(asset) {
            warn!("event=asset_discard module=asset status=error asset={asset} error={err}");
        }
    }
}
