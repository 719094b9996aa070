use alloy_consensus::Transaction as _;
use alloy_network::TransactionBuilder;
use alloy_primitives::TxHash;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use clap::Parser;
use eyre::Result;
use repo_deployer::provider::connect_read_only;

/// CLI arguments for `repo-deploy inspect-tx`.
///
/// Dumps a transaction and its receipt, replays the call at the receipt's
/// block to recover the revert reason, and reports the code size behind every
/// log-emitting address.
#[derive(Debug, Parser)]
pub struct InspectTxArgs {
    /// The transaction hash to inspect.
    #[arg(value_name = "TX_HASH")]
    tx_hash: String,

    /// The RPC endpoint.
    #[arg(long, env = "ETH_RPC_URL", value_name = "URL")]
    rpc_url: String,
}

impl InspectTxArgs {
    pub async fn run(self) -> Result<()> {
        let hash: TxHash = self.tx_hash.trim().parse()?;
        let provider = connect_read_only(&self.rpc_url).await?;

        let tx = provider.get_transaction_by_hash(hash).await?;
        let receipt = provider.get_transaction_receipt(hash).await?;

        match &tx {
            Some(tx) => println!("transaction: {tx:#?}"),
            None => println!("transaction {hash} not known to the provider"),
        }
        match &receipt {
            Some(receipt) => {
                println!("receipt: {receipt:#?}");
                println!("status: {}", if receipt.status() { "success" } else { "reverted" });
            }
            None => println!("no receipt for {hash}"),
        }

        // Replaying the same call at the mined block makes the node recompute
        // the failure, which is the only way to get a revert reason out of
        // chains that do not store it in the receipt.
        if let Some(tx) = &tx {
            let mut request = TransactionRequest::default()
                .with_from(tx.inner.signer())
                .with_value(tx.value())
                .with_input(tx.input().clone());
            if let Some(to) = tx.to() {
                request = request.with_to(to);
            }
            let mut call = provider.call(request);
            if let Some(block) = receipt.as_ref().and_then(|r| r.block_number) {
                call = call.block(block.into());
            }
            match call.await {
                Ok(returned) => println!("replayed call succeeded: {returned}"),
                Err(err) => println!("replayed call failed: {err}"),
            }
        }

        if let Some(receipt) = &receipt {
            for log in receipt.inner.logs() {
                let address = log.address();
                let code = provider.get_code_at(address).await?;
                println!("log emitter {address}: {} bytes of code", code.len());
            }
        }
        Ok(())
    }
}
