//! Pinned Solidity compiler version

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::ConfigError;

/// Exact `MAJOR.MINOR.PATCH` compiler release, pinned for reproducible builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolcVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SolcVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version such as `0.8.19` or `v0.8.19`.
    ///
    /// Ranges, pre-release tags and build metadata are rejected: the
    /// toolchain needs one concrete release.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidCompilerVersion(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let mut parts = trimmed.split('.');
        let mut next = || -> Result<u32, ConfigError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        let major = next()?;
        let minor = next()?;
        let patch = next()?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }
}

impl Default for SolcVersion {
    fn default() -> Self {
        Self::new(0, 8, 19)
    }
}

impl fmt::Display for SolcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for SolcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SolcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        SolcVersion::parse(&raw).map_err(serde::de::Error::custom)
    }
}
