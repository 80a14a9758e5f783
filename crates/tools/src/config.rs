//! Toolchain configuration for Base smart-contract projects
//!
//! This module resolves the record the contract toolchain is invoked with:
//! compiler version, directory layout, explorer API keys and RPC endpoints.
//! Values are resolved in priority order:
//!
//! 1. Process environment variables (`RPC_URL_BASE`, `ETHERSCAN_BASE_API_KEY`)
//! 2. Entries from a local `.env` file
//! 3. `basekit.toml` in the project root
//! 4. Built-in defaults
//!
//! An unset variable is never an error; its default is substituted.
//!
//! # Examples
//!
//! ```rust,no_run
//! use basekit_tools::config::Config;
//! use basekit_tools::network::Network;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! println!("solc {}", config.solidity());
//! println!("base rpc: {}", config.rpc_url(Network::Base));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compiler::SolcVersion;
use crate::env::EnvLayer;
use crate::explorer::{ApiKey, ExplorerConfig};
use crate::network::{Network, NetworkConfig};
use crate::paths::ProjectPaths;

pub const CONFIG_FILE: &str = "basekit.toml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid network: {0}. Must be one of: base")]
    InvalidNetwork(String),

    #[error("Invalid compiler version: {0:?}. Expected MAJOR.MINOR.PATCH")]
    InvalidCompilerVersion(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// `basekit.toml` contents. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasekitToml {
    #[serde(default)]
    pub compiler: Option<CompilerSection>,
    #[serde(default)]
    pub paths: Option<PathsSection>,
    #[serde(default)]
    pub networks: HashMap<String, NetworkSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub sources: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub artifacts: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkSection {
    pub url: Option<String>,
}

impl BasekitToml {
    /// Read `<root>/basekit.toml`, `Ok(None)` when the file does not exist
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("no {} found", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let parsed = toml::from_str(&content)?;
        log::debug!("loaded {}", path.display());
        Ok(Some(parsed))
    }
}

/// Resolved configuration record, immutable once built
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    solidity: SolcVersion,
    paths: ProjectPaths,
    etherscan: ExplorerConfig,
    networks: BTreeMap<Network, NetworkConfig>,
}

impl Config {
    /// Load configuration for the project in the current directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration for the project rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only when `basekit.toml` exists and is
    /// unreadable or invalid. Missing environment values never fail.
    pub fn load_from(root: &Path) -> Result<Self, ConfigError> {
        let env = EnvLayer::load(root);
        let file = BasekitToml::load(root)?;
        Self::resolve(root, &env, file.as_ref())
    }

    /// Build the record from an environment layer and optional file contents
    pub fn resolve(
        root: &Path,
        env: &EnvLayer,
        file: Option<&BasekitToml>,
    ) -> Result<Self, ConfigError> {
        let solidity = match file.and_then(|f| f.compiler.as_ref()) {
            Some(section) => SolcVersion::parse(&section.version)?,
            None => SolcVersion::default(),
        };

        let mut paths = ProjectPaths::default();
        if let Some(section) = file.and_then(|f| f.paths.as_ref()) {
            if let Some(sources) = &section.sources {
                paths.sources = sources.clone();
            }
            if let Some(cache) = &section.cache {
                paths.cache = cache.clone();
            }
            if let Some(artifacts) = &section.artifacts {
                paths.artifacts = artifacts.clone();
            }
        }
        paths.validate()?;

        let mut file_urls = HashMap::new();
        if let Some(f) = file {
            for (name, section) in &f.networks {
                let network = Network::from_str(name)?;
                if let Some(url) = &section.url {
                    file_urls.insert(network, url.clone());
                }
            }
        }

        let mut networks = BTreeMap::new();
        let mut etherscan = ExplorerConfig::default();

        for &network in Network::all() {
            let url = env
                .var(network.rpc_url_env())
                .or_else(|| file_urls.remove(&network))
                .unwrap_or_else(|| {
                    log::debug!(
                        "{} unset, using public endpoint for {network}",
                        network.rpc_url_env()
                    );
                    network.default_rpc_url().to_string()
                });
            networks.insert(network, NetworkConfig { url });

            let key = env.var(network.api_key_env()).unwrap_or_else(|| {
                log::debug!("{} unset, explorer key left empty", network.api_key_env());
                String::new()
            });
            etherscan.api_keys.insert(network, ApiKey::new(key));
        }

        Ok(Config {
            root: root.to_path_buf(),
            solidity,
            paths,
            etherscan,
            networks,
        })
    }

    /// Project root the directory layout is anchored at
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pinned compiler release
    pub fn solidity(&self) -> SolcVersion {
        self.solidity
    }

    /// Directory layout as configured, relative to `root`
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Explorer API keys for verification
    pub fn etherscan(&self) -> &ExplorerConfig {
        &self.etherscan
    }

    /// RPC endpoints per network profile
    pub fn networks(&self) -> &BTreeMap<Network, NetworkConfig> {
        &self.networks
    }

    /// Settings for `network`, if the profile was resolved
    pub fn network(&self, network: Network) -> Option<&NetworkConfig> {
        self.networks.get(&network)
    }

    /// RPC endpoint for `network`, the public endpoint when not resolved
    pub fn rpc_url(&self, network: Network) -> &str {
        self.network(network)
            .map(|settings| settings.url.as_str())
            .unwrap_or_else(|| network.default_rpc_url())
    }

    /// Explorer API key for `network`, empty when unset
    pub fn api_key(&self, network: Network) -> &ApiKey {
        self.etherscan.api_key(network)
    }

    /// Directory layout anchored at the project root
    pub fn resolved_paths(&self) -> ProjectPaths {
        self.paths.resolved(&self.root)
    }

    /// Check the record is usable for talking to the networks
    ///
    /// Not applied by `resolve`: environment values are taken verbatim and
    /// only judged when the caller asks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.paths.validate()?;

        for (network, settings) in &self.networks {
            Self::validate_rpc_url(*network, &settings.url)?;
            if self.api_key(*network).is_empty() {
                log::warn!(
                    "{} is empty, contract verification on {network} will be unavailable",
                    network.api_key_env()
                );
            }
        }

        Ok(())
    }

    fn validate_rpc_url(network: Network, rpc_url: &str) -> Result<(), ConfigError> {
        if rpc_url.is_empty() {
            return Err(ConfigError::MissingField(format!("networks.{network}.url")));
        }

        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "RPC URL for {network} must start with http:// or https://: {rpc_url}"
            )));
        }

        Ok(())
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        let paths = self.resolved_paths();
        println!("Toolchain configuration");
        println!("  Root:       {}", self.root.display());
        println!("  Solidity:   {}", self.solidity);
        println!("  Sources:    {}", paths.sources.display());
        println!("  Cache:      {}", paths.cache.display());
        println!("  Artifacts:  {}", paths.artifacts.display());

        for (network, settings) in &self.networks {
            println!("  Network {network}");
            println!("    RPC URL:  {}", settings.url);
            println!("    Chain ID: {}", network.chain_id());
            let key = self.api_key(*network);
            if key.is_empty() {
                println!("    API key:  (not configured)");
            } else {
                println!("    API key:  {key}");
            }
        }
    }

    /// Get configuration as JSON, secrets redacted
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get configuration as JSON with raw API keys, for handing the record
    /// to the external toolchain
    pub fn to_json_revealed(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(keys) = value
            .pointer_mut("/etherscan/apiKey")
            .and_then(|v| v.as_object_mut())
        {
            for &network in Network::all() {
                keys.insert(
                    network.to_string(),
                    serde_json::Value::String(self.api_key(network).expose().to_string()),
                );
            }
        }
        serde_json::to_string_pretty(&value)
    }
}

#[derive(Serialize)]
struct PathsView<'a> {
    root: &'a Path,
    sources: PathBuf,
    cache: PathBuf,
    artifacts: PathBuf,
}

#[derive(Serialize)]
struct EtherscanView<'a> {
    #[serde(rename = "apiKey")]
    api_key: &'a BTreeMap<Network, ApiKey>,
}

// Laid out the way the contract toolchain expects its user config
impl Serialize for Config {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let paths = self.resolved_paths();
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("solidity", &self.solidity)?;
        map.serialize_entry(
            "paths",
            &PathsView {
                root: &self.root,
                sources: paths.sources,
                cache: paths.cache,
                artifacts: paths.artifacts,
            },
        )?;
        map.serialize_entry(
            "etherscan",
            &EtherscanView {
                api_key: &self.etherscan.api_keys,
            },
        )?;
        map.serialize_entry("networks", &self.networks)?;
        map.end()
    }
}
