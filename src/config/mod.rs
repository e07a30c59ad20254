//! Catalog loading: `conf/cookbooks.toml` → [`Registry`].
pub mod cookbooks;
pub mod toml_loader;

use std::path::{Path, PathBuf};

use crate::catalog::Registry;
use crate::error::ConfigError;

/// Catalog location relative to the repository root.
pub const CATALOG_FILE: &str = "conf/cookbooks.toml";

/// Everything loaded for one invocation.
#[derive(Debug)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Frozen cookbook registry.
    pub registry: Registry,
}

impl Config {
    /// Load the catalog under `root`. Glob destinations are expanded with
    /// `home` substituted for `~`.
    ///
    /// A missing catalog file yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read, parsed or validated.
    pub fn load(root: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let file: cookbooks::CatalogFile = toml_loader::load_config(&root.join(CATALOG_FILE))?;
        let books = cookbooks::build(file, root, home)?;
        Ok(Self {
            root: root.to_path_buf(),
            registry: Registry::new(books),
        })
    }
}
