//! Repository-creation submission and receipt handling.

use crate::{abi::PluginRepoFactory, error::DeployError, fees::FeeOverrides, utils::receipt_logs};
use alloy_primitives::{Address, Log, TxHash};
use alloy_provider::Provider;
use async_trait::async_trait;
use eyre::{Result, WrapErr};

/// Confirmed outcome of a repository-creation transaction.
#[derive(Clone, Debug)]
pub struct CreationOutcome {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

/// Collaborator used to enrich revert errors with the original transaction.
#[async_trait]
pub trait TxDiagnostics {
    /// A human-readable rendering of the transaction, if the provider still
    /// knows about it.
    async fn transaction_details(&self, hash: TxHash) -> Result<Option<String>>;
}

/// [`TxDiagnostics`] backed by `eth_getTransactionByHash`.
pub struct ProviderDiagnostics<'a, P>(pub &'a P);

#[async_trait]
impl<P: Provider> TxDiagnostics for ProviderDiagnostics<'_, P> {
    async fn transaction_details(&self, hash: TxHash) -> Result<Option<String>> {
        Ok(self.0.get_transaction_by_hash(hash).await?.map(|tx| format!("{tx:?}")))
    }
}

/// Checks a confirmed receipt's status word; status 0 is a hard failure.
///
/// On revert the original transaction is re-fetched for diagnostics. A
/// failing re-fetch never masks the revert: the error then carries the hash
/// alone.
pub async fn check_status<D>(hash: TxHash, status_ok: bool, diagnostics: &D) -> Result<(), DeployError>
where
    D: TxDiagnostics + ?Sized,
{
    if status_ok {
        return Ok(());
    }
    let details = match diagnostics.transaction_details(hash).await {
        Ok(details) => details,
        Err(err) => {
            warn!(%hash, %err, "failed to re-fetch reverted transaction for diagnostics");
            None
        }
    };
    if let Some(details) = &details {
        error!(%hash, details, "transaction reverted");
    }
    Err(DeployError::TransactionReverted { hash, details })
}

/// Sends `createPluginRepo` with the given fee overrides and waits for an
/// accepted receipt.
pub async fn create_plugin_repo<P: Provider + Clone>(
    provider: &P,
    factory: Address,
    subdomain: &str,
    maintainer: Address,
    fees: &FeeOverrides,
) -> Result<CreationOutcome> {
    let factory = PluginRepoFactory::new(factory, provider.clone());
    let mut tx =
        factory.createPluginRepo(subdomain.to_string(), maintainer).into_transaction_request();
    fees.apply(&mut tx);

    let pending =
        provider.send_transaction(tx).await.wrap_err("failed to submit createPluginRepo")?;
    let hash = *pending.tx_hash();
    info!(%hash, subdomain, "createPluginRepo submitted");

    let receipt = match pending.get_receipt().await {
        Ok(receipt) => receipt,
        Err(err) => {
            warn!(%hash, %err, "provider returned no receipt for createPluginRepo");
            return Err(DeployError::ReceiptUnavailable { hash }.into());
        }
    };

    check_status(hash, receipt.status(), &ProviderDiagnostics(provider)).await?;

    Ok(CreationOutcome {
        tx_hash: hash,
        block_number: receipt.block_number,
        logs: receipt_logs(&receipt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingDiagnostics {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TxDiagnostics for FailingDiagnostics {
        async fn transaction_details(&self, _hash: TxHash) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            eyre::bail!("provider connection dropped")
        }
    }

    struct FixedDiagnostics(Option<String>);

    #[async_trait]
    impl TxDiagnostics for FixedDiagnostics {
        async fn transaction_details(&self, _hash: TxHash) -> Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    const HASH: TxHash =
        b256!("00000000000000000000000000000000000000000000000000000000deadbeef");

    #[tokio::test]
    async fn revert_carries_hash_even_when_diagnostics_fail() {
        let diagnostics = FailingDiagnostics { calls: AtomicUsize::new(0) };
        let err = check_status(HASH, false, &diagnostics).await.unwrap_err();
        assert_eq!(diagnostics.calls.load(Ordering::SeqCst), 1);
        match err {
            DeployError::TransactionReverted { hash, details } => {
                assert_eq!(hash, HASH);
                assert_eq!(details, None);
            }
            other => panic!("expected TransactionReverted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn revert_includes_details_when_fetch_succeeds() {
        let diagnostics = FixedDiagnostics(Some("tx { nonce: 7 }".to_string()));
        let err = check_status(HASH, false, &diagnostics).await.unwrap_err();
        match err {
            DeployError::TransactionReverted { hash, details } => {
                assert_eq!(hash, HASH);
                assert_eq!(details.as_deref(), Some("tx { nonce: 7 }"));
            }
            other => panic!("expected TransactionReverted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_skips_diagnostics() {
        let diagnostics = FailingDiagnostics { calls: AtomicUsize::new(0) };
        check_status(HASH, true, &diagnostics).await.unwrap();
        assert_eq!(diagnostics.calls.load(Ordering::SeqCst), 0);
    }
}
