//! Process-wide catalog settings.
//!
//! Values come from an optional TOML file, then `CATALOG__*` environment
//! variables (`CATALOG__ASSET_ROOT=/srv/images`), then serde defaults.

use crate::logging::default_log_level;
use crate::model::page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CATALOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Directory holding uploaded blobs; created on startup when missing.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Prefix of the URLs under which blobs are served.
    #[serde(default = "default_asset_url_prefix")]
    pub asset_url_prefix: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_level")]
    pub log_level: String,
    /// File logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("catalog.sqlite3")
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("user-images")
}

fn default_asset_url_prefix() -> String {
    "/user-images".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            asset_root: default_asset_root(),
            asset_url_prefix: default_asset_url_prefix(),
            default_page_size: default_page_size(),
            log_level: default_level(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Loads settings from `file` (when given) and the environment.
    ///
    /// A missing `file` is an error; an absent path means environment and
    /// defaults only.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks value ranges the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "database_path must not be empty".to_string(),
            ));
        }
        if self.asset_root.as_os_str().is_empty() {
            return Err(ConfigError::Message("asset_root must not be empty".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.default_page_size) {
            return Err(ConfigError::Message(format!(
                "default_page_size must be within 1..={MAX_PAGE_SIZE}, got {}",
                self.default_page_size
            )));
        }
        Ok(())
    }
}
