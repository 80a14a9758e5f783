//! Project directory layout shared with the external toolchain

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

pub const DEFAULT_SOURCES_DIR: &str = "./src";
pub const DEFAULT_CACHE_DIR: &str = "./cache";
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

/// Where the toolchain reads sources and writes its outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPaths {
    /// Contract sources, scanned by the compiler
    pub sources: PathBuf,
    /// Incremental compilation state
    pub cache: PathBuf,
    /// Compiled contract metadata
    pub artifacts: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            sources: PathBuf::from(DEFAULT_SOURCES_DIR),
            cache: PathBuf::from(DEFAULT_CACHE_DIR),
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

impl ProjectPaths {
    /// Anchor relative directories at `root`. Absolute paths are kept.
    pub fn resolved(&self, root: &Path) -> ProjectPaths {
        let anchor = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p.strip_prefix(".").unwrap_or(p))
            }
        };

        ProjectPaths {
            sources: anchor(&self.sources),
            cache: anchor(&self.cache),
            artifacts: anchor(&self.artifacts),
        }
    }

    /// Create the cache and artifact directories under `root`.
    ///
    /// The sources directory is left alone; a missing one is the user's
    /// problem, not something to paper over with an empty folder.
    pub fn ensure_output_dirs(&self, root: &Path) -> Result<(), ConfigError> {
        let resolved = self.resolved(root);
        for dir in [&resolved.cache, &resolved.artifacts] {
            if !dir.is_dir() {
                log::info!("creating {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, path) in [
            ("paths.sources", &self.sources),
            ("paths.cache", &self.cache),
            ("paths.artifacts", &self.artifacts),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }
        Ok(())
    }
}
