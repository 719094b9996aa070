use crate::opts::{EthOpts, NetworkOpts, TxOpts, random_subdomain};
use clap::Parser;
use eyre::Result;
use repo_deployer::{
    DeployError,
    ens::{EnsRepoLocator, plugin_ens_domain},
    fees::{FeeOverrides, fee_snapshot},
    network::{self, NetworkRegistry},
    provider::connect_signing,
    recover::{ProviderCodeProbe, recover_repo_address},
    submit::create_plugin_repo,
    utils::require_address,
};

/// CLI arguments for `repo-deploy create-repo`.
///
/// Creates and registers a plugin repo without publishing a version to it.
#[derive(Debug, Parser)]
pub struct CreateRepoArgs {
    /// Subdomain for the new plugin repo; a random one is generated when
    /// omitted.
    #[arg(long)]
    subdomain: Option<String>,

    /// Repo maintainer; defaults to the deployer address.
    #[arg(long, env = "MAINTAINER_ADDRESS", value_name = "ADDRESS")]
    maintainer: Option<String>,

    #[command(flatten)]
    eth: EthOpts,

    #[command(flatten)]
    network: NetworkOpts,

    #[command(flatten)]
    tx: TxOpts,
}

impl CreateRepoArgs {
    pub async fn run(self) -> Result<()> {
        let maintainer = self
            .maintainer
            .as_deref()
            .map(|value| require_address("MAINTAINER_ADDRESS", value))
            .transpose()?;
        let registry = self.network.registry()?;
        let network = network::resolve(&self.network.network, &registry)?;
        let deployments = registry
            .deployments(&network)
            .ok_or_else(|| DeployError::UnsupportedNetwork(network.clone()))?
            .clone();

        let (provider, deployer) =
            connect_signing(&self.eth.rpc_url, &self.eth.private_key).await?;
        let subdomain = self.subdomain.unwrap_or_else(|| random_subdomain(8));

        let snapshot = fee_snapshot(&provider).await;
        let fees = FeeOverrides::with_gas_limit(&snapshot, self.tx.gas_limit);

        let creation = create_plugin_repo(
            &provider,
            deployments.plugin_repo_factory,
            &subdomain,
            maintainer.unwrap_or(deployer),
            &fees,
        )
        .await?;

        let domain = plugin_ens_domain(&subdomain, &network);
        let locator =
            EnsRepoLocator::new(&provider, deployments.plugin_ens_subdomain_registrar);
        let probe = ProviderCodeProbe(&provider);
        let repo =
            recover_repo_address(creation.tx_hash, &creation.logs, &domain, &locator, &probe)
                .await?;

        println!("plugin repo {domain} created at {repo}");
        println!("transaction: {}", creation.tx_hash);
        if let Some(block) = creation.block_number {
            println!("block: {block}");
        }
        Ok(())
    }
}
