//! Named network profiles

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;

/// Supported network profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Base mainnet
    Base,
}

impl Network {
    /// Every known profile
    pub fn all() -> &'static [Network] {
        &[Network::Base]
    }

    /// Get network as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Base => "base",
        }
    }

    /// Parse network from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Network::Base),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }

    /// Public RPC endpoint used when nothing else is configured
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Base => "https://mainnet.base.org",
        }
    }

    /// Environment variable overriding the RPC endpoint
    pub fn rpc_url_env(&self) -> &'static str {
        match self {
            Network::Base => "RPC_URL_BASE",
        }
    }

    /// Environment variable holding the block explorer API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Network::Base => "ETHERSCAN_BASE_API_KEY",
        }
    }

    /// EIP-155 chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Base => 8453,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved settings for one network profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub url: String,
}
