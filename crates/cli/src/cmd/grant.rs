use crate::opts::{EthOpts, NetworkOpts, TxOpts};
use alloy_primitives::{Address, TxHash, keccak256};
use alloy_provider::Provider;
use clap::Parser;
use eyre::{Result, WrapErr, bail};
use repo_deployer::{
    DeployError,
    abi::Dao,
    fees::{FeeOverrides, fee_snapshot},
    network::{self, NetworkRegistry},
    provider::connect_signing,
    submit::{ProviderDiagnostics, check_status},
    utils::require_address,
};

pub(crate) const MANAGE_ALLOWLIST_PERMISSION: &str = "MANAGE_ALLOWLIST_PERMISSION";

/// Submits the grant through the DAO's permission manager and waits for an
/// accepted receipt.
pub(crate) async fn grant_allowlist<P: Provider + Clone>(
    provider: &P,
    dao: Address,
    allowlist: Address,
    executor: Address,
    fees: &FeeOverrides,
) -> Result<(TxHash, Option<u64>)> {
    let permission_id = keccak256(MANAGE_ALLOWLIST_PERMISSION.as_bytes());
    let dao_contract = Dao::new(dao, provider.clone());
    let mut tx =
        dao_contract.grant(allowlist, executor, permission_id).into_transaction_request();
    fees.apply(&mut tx);

    let pending = provider.send_transaction(tx).await.wrap_err("failed to submit grant")?;
    let hash = *pending.tx_hash();
    let receipt = match pending.get_receipt().await {
        Ok(receipt) => receipt,
        Err(_) => return Err(DeployError::ReceiptUnavailable { hash }.into()),
    };
    check_status(hash, receipt.status(), &ProviderDiagnostics(provider)).await?;
    Ok((hash, receipt.block_number))
}

/// CLI arguments for `repo-deploy grant-allowlist`.
///
/// Grants the allowlist-management permission on a plugin allowlist contract
/// to an executor, through the management DAO's permission manager.
#[derive(Debug, Parser)]
pub struct GrantAllowlistArgs {
    /// The allowlist contract the permission is granted on.
    #[arg(long, env = "PLUGIN_ALLOWLIST_ADDRESS", value_name = "ADDRESS")]
    allowlist: String,

    /// The executor receiving the permission.
    #[arg(long, env = "GLOBAL_EXECUTOR_ADDRESS", value_name = "ADDRESS")]
    executor: String,

    /// The DAO that owns the permission; defaults to the network's known
    /// management DAO.
    #[arg(long, env = "MANAGEMENT_DAO_ADDRESS", value_name = "ADDRESS")]
    dao: Option<String>,

    #[command(flatten)]
    eth: EthOpts,

    #[command(flatten)]
    network: NetworkOpts,

    #[command(flatten)]
    tx: TxOpts,
}

impl GrantAllowlistArgs {
    pub async fn run(self) -> Result<()> {
        let allowlist = require_address("PLUGIN_ALLOWLIST_ADDRESS", &self.allowlist)?;
        let executor = require_address("GLOBAL_EXECUTOR_ADDRESS", &self.executor)?;

        let registry = self.network.registry()?;
        let network = network::resolve(&self.network.network, &registry)?;
        let dao = match &self.dao {
            Some(value) => require_address("MANAGEMENT_DAO_ADDRESS", value)?,
            None => {
                let deployments = registry
                    .deployments(&network)
                    .ok_or_else(|| DeployError::UnsupportedNetwork(network.clone()))?;
                match deployments.management_dao {
                    Some(dao) => dao,
                    None => bail!("no management DAO known for {network}, pass --dao"),
                }
            }
        };

        let (provider, _) = connect_signing(&self.eth.rpc_url, &self.eth.private_key).await?;
        let snapshot = fee_snapshot(&provider).await;
        let fees = FeeOverrides::with_gas_limit(&snapshot, self.tx.gas_limit);

        let (hash, block) = grant_allowlist(&provider, dao, allowlist, executor, &fees).await?;

        println!(
            "granted {MANAGE_ALLOWLIST_PERMISSION} on {allowlist} to {executor} through {dao}"
        );
        println!("transaction: {hash}");
        if let Some(block) = block {
            println!("block: {block}");
        }
        Ok(())
    }
}
