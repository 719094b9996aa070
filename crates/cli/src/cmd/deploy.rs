use crate::{
    cmd::grant,
    opts::{EthOpts, NetworkOpts, TxOpts, random_subdomain},
};
use clap::Parser;
use eyre::{Result, bail};
use repo_deployer::{
    deploy::{self, DeployParams},
    fees::{FeeOverrides, fee_snapshot},
    provider::connect_signing,
    utils::require_address,
};
use std::path::PathBuf;

/// CLI arguments for `repo-deploy deploy`.
#[derive(Debug, Parser)]
pub struct DeployArgs {
    /// Subdomain for the new plugin repo; a random one is generated when
    /// omitted.
    #[arg(long)]
    subdomain: Option<String>,

    /// Address of the deployed plugin setup contract.
    #[arg(long, env = "PLUGIN_SETUP_ADDRESS", value_name = "ADDRESS")]
    setup: String,

    /// Release number to publish under. The first version of a repo is
    /// release 1.
    #[arg(long, default_value_t = 1)]
    release: u8,

    /// URI of the build metadata document.
    #[arg(long, env = "BUILD_METADATA_URI", default_value = "")]
    build_metadata_uri: String,

    /// URI of the release metadata document.
    #[arg(long, env = "RELEASE_METADATA_URI", default_value = "")]
    release_metadata_uri: String,

    /// Repo maintainer; defaults to the deployer address.
    #[arg(long, env = "MAINTAINER_ADDRESS", value_name = "ADDRESS")]
    maintainer: Option<String>,

    /// Chain id the provider must report before anything is sent;
    /// overrides the resolved network's known id (useful against forks).
    #[arg(long, value_name = "CHAIN_ID")]
    expect_chain_id: Option<u64>,

    /// Allowlist contract to grant the management permission on after a
    /// successful publish.
    #[arg(long, env = "PLUGIN_ALLOWLIST_ADDRESS", value_name = "ADDRESS", requires = "executor")]
    allowlist: Option<String>,

    /// The executor receiving the allowlist-management permission.
    #[arg(long, env = "GLOBAL_EXECUTOR_ADDRESS", value_name = "ADDRESS", requires = "allowlist")]
    executor: Option<String>,

    /// Directory the run summary is written to.
    #[arg(long, default_value = "tmp", value_name = "DIR")]
    out_dir: PathBuf,

    #[command(flatten)]
    eth: EthOpts,

    #[command(flatten)]
    network: NetworkOpts,

    #[command(flatten)]
    tx: TxOpts,
}

impl DeployArgs {
    pub async fn run(self) -> Result<()> {
        let setup = require_address("PLUGIN_SETUP_ADDRESS", &self.setup)?;
        let maintainer = self
            .maintainer
            .as_deref()
            .map(|value| require_address("MAINTAINER_ADDRESS", value))
            .transpose()?;
        let allowlist = self
            .allowlist
            .as_deref()
            .map(|value| require_address("PLUGIN_ALLOWLIST_ADDRESS", value))
            .transpose()?;
        let executor = self
            .executor
            .as_deref()
            .map(|value| require_address("GLOBAL_EXECUTOR_ADDRESS", value))
            .transpose()?;
        let registry = self.network.registry()?;

        let (provider, deployer) =
            connect_signing(&self.eth.rpc_url, &self.eth.private_key).await?;

        let params = DeployParams {
            network: self.network.network,
            subdomain: self.subdomain.unwrap_or_else(|| random_subdomain(8)),
            setup,
            release: self.release,
            build_metadata_uri: self.build_metadata_uri,
            release_metadata_uri: self.release_metadata_uri,
            maintainer: maintainer.unwrap_or(deployer),
            gas_limit: self.tx.gas_limit,
            expect_chain_id: self.expect_chain_id,
        };

        let summary = deploy::run(&provider, &registry, &params).await?;

        if let (Some(allowlist), Some(executor)) = (allowlist, executor) {
            let Some(dao) = summary.inputs.management_dao else {
                bail!(
                    "no management DAO known for {}, run grant-allowlist with --dao",
                    summary.network
                );
            };
            let snapshot = fee_snapshot(&provider).await;
            let fees = FeeOverrides::with_gas_limit(&snapshot, self.tx.gas_limit);
            let (hash, _) =
                grant::grant_allowlist(&provider, dao, allowlist, executor, &fees).await?;
            println!("allowlist permission granted: {hash}");
        }

        let path = summary.write(&self.out_dir)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        println!("deployment output written to {}", path.display());
        Ok(())
    }
}
