use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use basekit_tools::rpc::{RpcClient, DEFAULT_TIMEOUT_MS};
use basekit_tools::{Config, Network};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "basekit")]
#[command(about = "Toolchain configuration for Base smart-contract projects")]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    /// Project root holding .env and basekit.toml
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration
    Config {
        /// Fail if the configuration is not usable
        #[arg(long)]
        validate: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Include raw API keys in JSON output
        #[arg(long, requires = "json")]
        reveal_secrets: bool,
    },
    /// Show the directory layout
    Paths {
        /// Create the cache and artifact directories
        #[arg(long)]
        create: bool,
    },
    /// Print the RPC endpoint of a network profile
    Network {
        #[arg(default_value = "base")]
        name: String,
    },
    /// Query the chain id reported by a network's endpoint
    ChainId {
        #[arg(short, long, default_value = "base")]
        network: String,
        /// Request timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
        /// Fail unless the endpoint reports the profile's chain id
        #[arg(long)]
        expect: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = Config::load_from(&cli.root)
        .with_context(|| format!("loading configuration from {}", cli.root.display()))?;

    match cli.command {
        Commands::Config {
            validate,
            json,
            reveal_secrets,
        } => {
            if validate {
                config.validate().context("configuration is not usable")?;
            }
            if json {
                let out = if reveal_secrets {
                    config.to_json_revealed()?
                } else {
                    config.to_json()?
                };
                println!("{out}");
            } else {
                config.print_summary();
                if validate {
                    println!("Configuration valid");
                }
            }
            Ok(())
        }
        Commands::Paths { create } => {
            if create {
                config
                    .paths()
                    .ensure_output_dirs(config.root())
                    .context("creating output directories")?;
            }
            let paths = config.resolved_paths();
            println!("sources   {}", paths.sources.display());
            println!("cache     {}", paths.cache.display());
            println!("artifacts {}", paths.artifacts.display());
            Ok(())
        }
        Commands::Network { name } => {
            let network = Network::from_str(&name)?;
            println!("{}", config.rpc_url(network));
            Ok(())
        }
        Commands::ChainId {
            network,
            timeout_ms,
            expect,
        } => {
            let network = Network::from_str(&network)?;
            let client = RpcClient::new(
                config.rpc_url(network),
                Duration::from_millis(timeout_ms),
            )?;
            let chain_id = client
                .chain_id()
                .await
                .with_context(|| format!("querying {}", client.url()))?;
            println!("{chain_id}");

            if expect && chain_id != network.chain_id() {
                bail!(
                    "{} reports chain id {chain_id}, expected {} for {network}",
                    client.url(),
                    network.chain_id()
                );
            }
            Ok(())
        }
    }
}
