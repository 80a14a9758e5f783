//! Environment lookup layered over a local `.env` secrets file

use std::collections::HashMap;
use std::path::Path;

pub const DOTENV_FILE: &str = ".env";

/// Variable lookup: process environment first, then `.env` entries.
///
/// The `.env` file is parsed into memory instead of being exported into the
/// process, so resolving configuration never mutates global state.
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    process: bool,
    dotenv: HashMap<String, String>,
}

impl EnvLayer {
    /// Process environment plus `<root>/.env` if present
    pub fn load(root: &Path) -> Self {
        let path = root.join(DOTENV_FILE);
        let mut dotenv = HashMap::new();

        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    match item {
                        Ok((key, value)) => {
                            dotenv.insert(key, value);
                        }
                        Err(err) => log::warn!("skipping malformed entry in {}: {err}", path.display()),
                    }
                }
                log::debug!("loaded {} entries from {}", dotenv.len(), path.display());
            }
            Err(err) if err.not_found() => log::debug!("no {} found", path.display()),
            Err(err) => log::warn!("ignoring {}: {err}", path.display()),
        }

        Self {
            process: true,
            dotenv,
        }
    }

    /// Isolated layer built from explicit pairs; the process environment is
    /// not consulted.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            process: false,
            dotenv: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `key`, or `None` when unset.
    ///
    /// A process variable that is not valid Unicode counts as unset and
    /// falls through to the `.env` entry.
    pub fn var(&self, key: &str) -> Option<String> {
        if self.process {
            match std::env::var(key) {
                Ok(value) => return Some(value),
                Err(std::env::VarError::NotUnicode(_)) => {
                    log::warn!("{key} is not valid unicode, treating as unset");
                }
                Err(std::env::VarError::NotPresent) => {}
            }
        }
        self.dotenv.get(key).cloned()
    }
}
