//! Block explorer credentials used for contract verification

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::network::Network;

const REDACTED: &str = "<redacted>";

/// Explorer API key. Never printed in full.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for handing to the verification plugin
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn masked(&self) -> &'static str {
        if self.0.is_empty() {
            ""
        } else {
            REDACTED
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.masked())
    }
}

impl Serialize for ApiKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.masked())
    }
}

/// API keys per network, as consumed by the verification plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExplorerConfig {
    pub api_keys: BTreeMap<Network, ApiKey>,
}

impl ExplorerConfig {
    /// Key for `network`, empty when none was configured
    pub fn api_key(&self, network: Network) -> &ApiKey {
        static EMPTY: ApiKey = ApiKey(String::new());
        self.api_keys.get(&network).unwrap_or(&EMPTY)
    }
}
