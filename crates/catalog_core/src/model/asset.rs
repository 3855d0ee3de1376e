//! Asset reference and upload payload types.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stored file name of a blob held by the asset store.
///
/// This is a bare file name, not a path; the store resolves it against its
/// configured root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self(file_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uploaded blob accompanying a record mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    /// Client-supplied file name; only used to derive the stored name.
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl AssetUpload {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }

    /// An empty payload counts as "no upload supplied".
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
