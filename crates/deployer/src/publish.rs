//! Version publication and read-back verification.

use crate::{
    abi::PluginRepo,
    error::DeployError,
    fees::FeeOverrides,
    submit::{ProviderDiagnostics, check_status},
    utils::receipt_logs,
};
use alloy_primitives::{Address, Bytes, Log, TxHash};
use alloy_provider::Provider;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use serde::Serialize;

/// A version record as submitted to and read back from the repository.
///
/// Release and build come from the emitted `VersionCreated` event, not from
/// the request, so a mismatch would be visible to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub release: u8,
    pub build: u16,
    pub setup: Address,
    pub build_metadata_uri: String,
    pub release_metadata_uri: String,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// Collaborator re-reading a confirmed transaction's logs.
#[async_trait]
pub trait ReceiptLogs {
    /// The receipt's log bodies, or `None` when the provider no longer
    /// knows the receipt.
    async fn logs_for(&self, hash: TxHash) -> Result<Option<Vec<Log>>>;
}

/// [`ReceiptLogs`] backed by `eth_getTransactionReceipt`.
pub struct ProviderReceiptLogs<'a, P>(pub &'a P);

#[async_trait]
impl<P: Provider> ReceiptLogs for ProviderReceiptLogs<'_, P> {
    async fn logs_for(&self, hash: TxHash) -> Result<Option<Vec<Log>>> {
        Ok(self.0.get_transaction_receipt(hash).await?.map(|receipt| receipt_logs(&receipt)))
    }
}

/// Decoded fields of the first `VersionCreated` event found in the logs.
pub fn extract_version_created(logs: &[Log]) -> Option<(u8, u16, Address)> {
    logs.iter().find_map(|log| {
        PluginRepo::VersionCreated::decode_log(log)
            .ok()
            .map(|event| (event.data.release, event.data.build, event.data.pluginSetup))
    })
}

/// Confirms a publish through its `VersionCreated` event.
///
/// The logs of the receipt already in hand are checked first; on a miss the
/// receipt is re-read exactly once through `reader`. The transaction is
/// never re-sent from here: the on-chain mutation already happened, so a
/// missing event is a verification failure and surfaces as
/// [`DeployError::VersionEventNotFound`].
pub async fn confirm_version_created<R>(
    hash: TxHash,
    logs: &[Log],
    reader: &R,
) -> Result<(u8, u16, Address), DeployError>
where
    R: ReceiptLogs + ?Sized,
{
    if let Some(decoded) = extract_version_created(logs) {
        return Ok(decoded);
    }

    warn!(%hash, "VersionCreated missing from the first receipt read, retrying the read");
    match reader.logs_for(hash).await {
        Ok(Some(logs)) => {
            if let Some(decoded) = extract_version_created(&logs) {
                return Ok(decoded);
            }
        }
        Ok(None) => {}
        Err(err) => warn!(%hash, %err, "receipt re-read failed"),
    }

    Err(DeployError::VersionEventNotFound { hash })
}

/// Publishes a version to an existing repository and verifies it through the
/// emitted `VersionCreated` event.
pub async fn publish_version<P: Provider + Clone>(
    provider: &P,
    repo: Address,
    setup: Address,
    release: u8,
    build_metadata_uri: &str,
    release_metadata_uri: &str,
    fees: &FeeOverrides,
) -> Result<VersionRecord> {
    let repo_contract = PluginRepo::new(repo, provider.clone());
    let mut tx = repo_contract
        .createVersion(
            release,
            setup,
            Bytes::copy_from_slice(build_metadata_uri.as_bytes()),
            Bytes::copy_from_slice(release_metadata_uri.as_bytes()),
        )
        .into_transaction_request();
    fees.apply(&mut tx);

    let pending = provider.send_transaction(tx).await.wrap_err("failed to submit createVersion")?;
    let hash = *pending.tx_hash();
    info!(%hash, release, "createVersion submitted");

    let receipt = match pending.get_receipt().await {
        Ok(receipt) => receipt,
        Err(err) => {
            warn!(%hash, %err, "provider returned no receipt for createVersion");
            return Err(DeployError::ReceiptUnavailable { hash }.into());
        }
    };
    check_status(hash, receipt.status(), &ProviderDiagnostics(provider)).await?;

    let (release, build, setup) = confirm_version_created(
        hash,
        &receipt_logs(&receipt),
        &ProviderReceiptLogs(provider),
    )
    .await?;

    Ok(VersionRecord {
        release,
        build,
        setup,
        build_metadata_uri: build_metadata_uri.to_string(),
        release_metadata_uri: release_metadata_uri.to_string(),
        tx_hash: hash,
        block_number: receipt.block_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, LogData, b256};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HASH: TxHash =
        b256!("00000000000000000000000000000000000000000000000000000000feedc0de");

    fn setup_address() -> Address {
        Address::repeat_byte(0x55)
    }

    fn junk_log() -> Log {
        Log {
            address: Address::repeat_byte(0x01),
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x02)], Bytes::new()),
        }
    }

    fn created_log() -> Log {
        let event = PluginRepo::VersionCreated {
            release: 1,
            build: 3,
            pluginSetup: setup_address(),
            buildMetadata: Bytes::from_static(b"ipfs://build"),
        };
        Log { address: Address::repeat_byte(0xaa), data: event.encode_log_data() }
    }

    struct MockReceiptLogs {
        result: Option<Vec<Log>>,
        calls: AtomicUsize,
    }

    impl MockReceiptLogs {
        fn returning(result: Option<Vec<Log>>) -> Self {
            Self { result, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ReceiptLogs for MockReceiptLogs {
        async fn logs_for(&self, _hash: TxHash) -> Result<Option<Vec<Log>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    #[test]
    fn extracts_release_and_build_from_the_event() {
        let decoded = extract_version_created(&[junk_log(), created_log()]).unwrap();
        assert_eq!(decoded, (1, 3, setup_address()));
    }

    #[test]
    fn returns_none_when_no_log_decodes() {
        assert_eq!(extract_version_created(&[junk_log()]), None);
        assert_eq!(extract_version_created(&[]), None);
    }

    #[tokio::test]
    async fn first_read_hit_skips_the_retry() {
        let reader = MockReceiptLogs::returning(None);
        let decoded = confirm_version_created(HASH, &[created_log()], &reader).await.unwrap();
        assert_eq!(decoded, (1, 3, setup_address()));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_event_re_reads_the_receipt_exactly_once() {
        let reader = MockReceiptLogs::returning(Some(vec![junk_log(), created_log()]));
        let decoded = confirm_version_created(HASH, &[junk_log()], &reader).await.unwrap();
        assert_eq!(decoded, (1, 3, setup_address()));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_retry_is_version_event_not_found() {
        let reader = MockReceiptLogs::returning(Some(vec![junk_log()]));
        let err = confirm_version_created(HASH, &[junk_log()], &reader).await.unwrap_err();
        // one retry read, nothing re-sent, and the hash survives for the caller
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, DeployError::VersionEventNotFound { hash } if hash == HASH));
    }

    #[tokio::test]
    async fn vanished_receipt_is_version_event_not_found() {
        let reader = MockReceiptLogs::returning(None);
        let err = confirm_version_created(HASH, &[junk_log()], &reader).await.unwrap_err();
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, DeployError::VersionEventNotFound { hash } if hash == HASH));
    }
}
