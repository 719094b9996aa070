//! One linear deployment run: resolve, create, recover, publish, summarize.

use crate::{
    artifact::{ContractRecord, RunInputs, RunSummary},
    ens::{EnsRepoLocator, plugin_ens_domain},
    error::DeployError,
    fees::{FeeOverrides, fee_snapshot},
    network::{self, Deployments, NetworkRegistry},
    publish::publish_version,
    recover::{ProviderCodeProbe, recover_repo_address},
    submit::create_plugin_repo,
};
use alloy_primitives::Address;
use alloy_provider::Provider;
use eyre::{Result, bail};

/// Inputs of a full run. All addresses are validated by the caller before
/// any chain interaction.
#[derive(Clone, Debug)]
pub struct DeployParams {
    /// Raw network name; resolved through the alias table.
    pub network: String,
    pub subdomain: String,
    pub setup: Address,
    pub release: u8,
    pub build_metadata_uri: String,
    pub release_metadata_uri: String,
    pub maintainer: Address,
    pub gas_limit: u64,
    /// Overrides the resolved network's known chain id for the pre-send
    /// guard.
    pub expect_chain_id: Option<u64>,
}

/// Runs the whole deployment sequentially. Every chain interaction blocks
/// the run until the provider answers; state is threaded explicitly from one
/// step to the next.
pub async fn run<P: Provider + Clone>(
    provider: &P,
    registry: &Deployments,
    params: &DeployParams,
) -> Result<RunSummary> {
    let network = network::resolve(&params.network, registry)?;
    let deployments = registry
        .deployments(&network)
        .ok_or_else(|| DeployError::UnsupportedNetwork(network.clone()))?
        .clone();

    let chain_id = provider.get_chain_id().await?;
    let expected = params.expect_chain_id.or_else(|| network::known_chain_id(&network));
    if let Some(expected) = expected {
        if chain_id != expected {
            bail!("wrong network: expected chain id {expected} for {network}, connected to {chain_id}");
        }
    }
    info!(network, chain_id, subdomain = params.subdomain, "starting deployment run");

    let snapshot = fee_snapshot(provider).await;
    let fees = FeeOverrides::with_gas_limit(&snapshot, params.gas_limit);
    debug!(?fees, "fee overrides computed");

    let creation = create_plugin_repo(
        provider,
        deployments.plugin_repo_factory,
        &params.subdomain,
        params.maintainer,
        &fees,
    )
    .await?;

    let domain = plugin_ens_domain(&params.subdomain, &network);
    let locator = EnsRepoLocator::new(provider, deployments.plugin_ens_subdomain_registrar);
    let probe = ProviderCodeProbe(provider);
    let repo =
        recover_repo_address(creation.tx_hash, &creation.logs, &domain, &locator, &probe).await?;
    info!(%repo, domain, "plugin repo created");

    let version = publish_version(
        provider,
        repo,
        params.setup,
        params.release,
        &params.build_metadata_uri,
        &params.release_metadata_uri,
        &fees,
    )
    .await?;
    info!(release = version.release, build = version.build, "version published");

    let mut summary = RunSummary::new(
        network,
        chain_id,
        RunInputs {
            plugin_repo_factory: deployments.plugin_repo_factory,
            plugin_repo_registry: deployments.plugin_repo_registry,
            management_dao: deployments.management_dao,
            subdomain: params.subdomain.clone(),
            maintainer: params.maintainer,
        },
    );
    summary.record(
        "pluginRepo",
        ContractRecord {
            address: repo,
            create_tx_hash: Some(creation.tx_hash),
            create_block_number: creation.block_number,
            publish_tx_hash: Some(version.tx_hash),
            publish_block_number: version.block_number,
        },
    );
    summary.record(
        "pluginSetup",
        ContractRecord { address: params.setup, ..Default::default() },
    );
    Ok(summary)
}
