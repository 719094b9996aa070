//! Option groups shared across subcommands.

use clap::Parser;
use eyre::Result;
use rand::Rng;
use repo_deployer::{fees::DEFAULT_GAS_LIMIT, network::Deployments};
use std::path::PathBuf;

/// RPC and wallet options for state-mutating commands.
#[derive(Clone, Debug, Parser)]
pub struct EthOpts {
    /// The RPC endpoint.
    #[arg(long, env = "ETH_RPC_URL", value_name = "URL")]
    pub rpc_url: String,

    /// The deployer private key.
    #[arg(long, env = "PRIVATE_KEY", value_name = "KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Network-table options.
#[derive(Clone, Debug, Parser)]
pub struct NetworkOpts {
    /// Network name or alias, e.g. `harmony` or `harmony-mainnet`.
    #[arg(long, env = "NETWORK_NAME", default_value = "harmony-mainnet")]
    pub network: String,

    /// JSON file with per-network framework addresses, merged over the
    /// built-in table.
    #[arg(long, value_name = "PATH")]
    pub deployments: Option<PathBuf>,
}

impl NetworkOpts {
    pub fn registry(&self) -> Result<Deployments> {
        match &self.deployments {
            Some(path) => Deployments::load(path),
            None => Ok(Deployments::builtin()),
        }
    }
}

/// Transaction options.
#[derive(Clone, Debug, Parser)]
pub struct TxOpts {
    /// Gas limit ceiling sent with every transaction instead of an
    /// `eth_estimateGas` round trip.
    #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,
}

/// Random lowercase subdomain, used when none is provided.
pub fn random_subdomain(len: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len).map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_subdomains_are_lowercase_and_sized() {
        let name = random_subdomain(8);
        assert_eq!(name.len(), 8);
        assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
