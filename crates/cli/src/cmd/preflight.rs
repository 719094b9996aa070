use crate::opts::{NetworkOpts, TxOpts, random_subdomain};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use clap::Parser;
use eyre::Result;
use repo_deployer::{
    DeployError,
    abi::PluginRepoFactory,
    network::{self, NetworkRegistry},
    provider::connect_read_only,
    utils::require_address,
};

/// CLI arguments for `repo-deploy preflight`.
///
/// Simulates `createPluginRepo` through `eth_call` without spending gas, to
/// surface reverts (duplicate subdomain, missing registration permission)
/// before a real run.
#[derive(Debug, Parser)]
pub struct PreflightArgs {
    /// Subdomain to simulate the creation with.
    #[arg(long)]
    subdomain: Option<String>,

    /// Sender and maintainer used for the simulation.
    #[arg(long, env = "MAINTAINER_ADDRESS", value_name = "ADDRESS")]
    from: Option<String>,

    /// The RPC endpoint.
    #[arg(long, env = "ETH_RPC_URL", value_name = "URL")]
    rpc_url: String,

    #[command(flatten)]
    network: NetworkOpts,

    #[command(flatten)]
    tx: TxOpts,
}

impl PreflightArgs {
    pub async fn run(self) -> Result<()> {
        let from = self
            .from
            .as_deref()
            .map(|value| require_address("MAINTAINER_ADDRESS", value))
            .transpose()?;
        let registry = self.network.registry()?;
        let network = network::resolve(&self.network.network, &registry)?;
        let deployments = registry
            .deployments(&network)
            .ok_or_else(|| DeployError::UnsupportedNetwork(network.clone()))?
            .clone();

        let provider = connect_read_only(&self.rpc_url).await?;
        let subdomain = self.subdomain.unwrap_or_else(|| random_subdomain(8));
        let maintainer = from.unwrap_or(Address::ZERO);

        let call =
            PluginRepoFactory::createPluginRepoCall { subdomain: subdomain.clone(), maintainer };
        let mut tx = TransactionRequest::default()
            .with_to(deployments.plugin_repo_factory)
            .with_input(Bytes::from(call.abi_encode()))
            .with_gas_limit(self.tx.gas_limit);
        if let Some(from) = from {
            tx.set_from(from);
        }

        println!("simulating createPluginRepo({subdomain}) on {network}");
        match provider.call(tx).await {
            Ok(returned) => match PluginRepoFactory::createPluginRepoCall::abi_decode_returns(
                &returned,
            ) {
                Ok(repo) => println!("call succeeded, repo would be created at {repo}"),
                Err(_) => println!("call succeeded, raw return data: {returned}"),
            },
            Err(err) => println!("call reverted: {err}"),
        }
        Ok(())
    }
}
