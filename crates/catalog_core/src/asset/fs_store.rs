//! Local filesystem asset store.

use super::{AssetError, AssetResult, AssetStore};
use crate::model::asset::AssetRef;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const FALLBACK_FILE_NAME: &str = "upload";
const MAX_ORIGINAL_NAME_CHARS: usize = 120;

static UNSAFE_FILE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid file name regex"));

/// Asset store rooted at one directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
    url_prefix: String,
}

impl FsAssetStore {
    /// Opens the store, creating `root` when it does not exist yet.
    ///
    /// `url_prefix` is prepended to stored names by `url_for`
    /// (e.g. `/user-images`).
    pub fn open(root: impl AsRef<Path>, url_prefix: impl Into<String>) -> AssetResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| AssetError::Io {
            operation: "init",
            asset: root.display().to_string(),
            source,
        })?;
        info!(
            "event=asset_store_open module=asset status=ok root={}",
            root.display()
        );
        Ok(Self {
            root,
            url_prefix: url_prefix.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> AssetResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| AssetError::Io {
            operation: "init",
            asset: self.root.display().to_string(),
            source,
        })
    }
}

impl AssetStore for FsAssetStore {
    fn store(&self, bytes: &[u8], original_name: &str) -> AssetResult<AssetRef> {
        if bytes.is_empty() {
            return Err(AssetError::EmptyPayload);
        }
        self.ensure_root()?;

        let sanitized = sanitize_original_name(original_name);
        let millis = epoch_millis();
        let primary = format!("{millis}_{sanitized}");
        let primary_path = self.root.join(&primary);

        let file_name = match write_new_file(&primary_path, bytes) {
            Ok(()) => primary,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                let suffix = Uuid::new_v4().simple().to_string();
                let retry = format!("{millis}_{}_{sanitized}", &suffix[..8]);
                write_new_file(&self.root.join(&retry), bytes).map_err(|source| {
                    AssetError::Io {
                        operation: "store",
                        asset: retry.clone(),
                        source,
                    }
                })?;
                retry
            }
            Err(source) => {
                return Err(AssetError::Io {
                    operation: "store",
                    asset: primary,
                    source,
                })
            }
        };

        debug!(
            "event=asset_store module=asset status=ok asset={} bytes={}",
            file_name,
            bytes.len()
        );
        Ok(AssetRef::new(file_name))
    }

    fn delete(&self, asset: &AssetRef) -> AssetResult<()> {
        let path = self.resolve(asset)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("event=asset_delete module=asset status=ok asset={asset}");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "event=asset_delete module=asset status=skipped reason=missing asset={asset}"
                );
                Ok(())
            }
            Err(source) => Err(AssetError::Io {
                operation: "delete",
                asset: asset.to_string(),
                source,
            }),
        }
    }

    fn resolve(&self, asset: &AssetRef) -> AssetResult<PathBuf> {
        validate_reference(asset.as_str())?;
        Ok(self.root.join(asset.as_str()))
    }

    fn url_for(&self, asset: &AssetRef) -> String {
        format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            asset.as_str()
        )
    }
}

/// Reduces a client-supplied file name to a safe single path component.
///
/// Keeps the last path segment, replaces runs of characters outside
/// `[A-Za-z0-9._-]` with `_`, strips leading/trailing dots and caps length.
pub fn sanitize_original_name(original_name: &str) -> String {
    let last_segment = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
        .trim();
    let replaced = UNSAFE_FILE_NAME_CHARS.replace_all(last_segment, "_");
    let cleaned: String = replaced
        .trim_matches('.')
        .chars()
        .take(MAX_ORIGINAL_NAME_CHARS)
        .collect();

    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

fn validate_reference(value: &str) -> AssetResult<()> {
    if value.is_empty() || value.contains(['/', '\\', '\0']) {
        return Err(AssetError::InvalidReference(value.to_string()));
    }

    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AssetError::InvalidReference(value.to_string())),
    }
}

fn write_new_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(err) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(err);
    }
    Ok(())
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
