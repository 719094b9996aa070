use crate::opts::{EthOpts, TxOpts};
use clap::Parser;
use eyre::Result;
use repo_deployer::{
    fees::{FeeOverrides, fee_snapshot},
    provider::connect_signing,
    publish::publish_version,
    utils::require_address,
};

/// CLI arguments for `repo-deploy publish`.
///
/// Publishes a version to an existing plugin repo.
#[derive(Debug, Parser)]
pub struct PublishArgs {
    /// The plugin repo to publish to.
    #[arg(long, env = "PLUGIN_REPO_ADDRESS", value_name = "ADDRESS")]
    repo: String,

    /// Address of the deployed plugin setup contract.
    #[arg(long, env = "PLUGIN_SETUP_ADDRESS", value_name = "ADDRESS")]
    setup: String,

    /// Release number to publish under.
    #[arg(long, default_value_t = 1)]
    release: u8,

    /// URI of the build metadata document.
    #[arg(long, env = "BUILD_METADATA_URI", default_value = "")]
    build_metadata_uri: String,

    /// URI of the release metadata document.
    #[arg(long, env = "RELEASE_METADATA_URI", default_value = "")]
    release_metadata_uri: String,

    #[command(flatten)]
    eth: EthOpts,

    #[command(flatten)]
    tx: TxOpts,
}

impl PublishArgs {
    pub async fn run(self) -> Result<()> {
        let repo = require_address("PLUGIN_REPO_ADDRESS", &self.repo)?;
        let setup = require_address("PLUGIN_SETUP_ADDRESS", &self.setup)?;

        let (provider, _) = connect_signing(&self.eth.rpc_url, &self.eth.private_key).await?;

        let snapshot = fee_snapshot(&provider).await;
        let fees = FeeOverrides::with_gas_limit(&snapshot, self.tx.gas_limit);

        let record = publish_version(
            &provider,
            repo,
            setup,
            self.release,
            &self.build_metadata_uri,
            &self.release_metadata_uri,
            &fees,
        )
        .await?;

        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    }
}
