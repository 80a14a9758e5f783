//! basekit tools library
//!
//! Resolves the toolchain configuration for Base smart-contract projects:
//! compiler pin, directory layout, explorer keys and network endpoints.

pub mod compiler;
pub mod config;
pub mod env;
pub mod explorer;
pub mod network;
pub mod paths;
pub mod rpc;

pub use compiler::SolcVersion;
pub use config::{Config, ConfigError};
pub use network::Network;
