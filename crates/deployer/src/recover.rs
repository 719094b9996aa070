//! Ordered fallback chain recovering a freshly created repository's address.

use crate::{abi::PluginRepoRegistry, error::DeployError};
use alloy_primitives::{Address, Log, TxHash};
use alloy_provider::Provider;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use eyre::Result;

/// Name-service collaborator consulted when event decoding yields nothing.
#[async_trait]
pub trait RepoLocator {
    /// Returns the repository address behind a domain, if a record exists.
    async fn locate(&self, domain: &str) -> Result<Option<Address>>;
}

/// Bytecode-presence collaborator for the last-resort topic scan.
#[async_trait]
pub trait CodeProbe {
    async fn has_code(&self, address: Address) -> Result<bool>;
}

/// [`CodeProbe`] backed by `eth_getCode`.
pub struct ProviderCodeProbe<'a, P>(pub &'a P);

#[async_trait]
impl<P: Provider> CodeProbe for ProviderCodeProbe<'_, P> {
    async fn has_code(&self, address: Address) -> Result<bool> {
        Ok(!self.0.get_code_at(address).await?.is_empty())
    }
}

/// Recovers the created repository's address from a successful creation
/// receipt. Three strategies, in order, first hit wins:
///
/// 1. decode the receipt logs against the registry's `PluginRepoRegistered`
///    event;
/// 2. ask the name service for the expected domain;
/// 3. scan log topics for address-shaped words with deployed code behind
///    them.
///
/// The topic scan approximates validity with "has code", which is necessary
/// but not sufficient: an unrelated contract address appearing in a topic
/// first would win. Individual decode or probe failures never abort the
/// chain; only full exhaustion does.
pub async fn recover_repo_address<L, C>(
    tx_hash: TxHash,
    logs: &[Log],
    ens_domain: &str,
    locator: &L,
    probe: &C,
) -> Result<Address>
where
    L: RepoLocator + ?Sized,
    C: CodeProbe + ?Sized,
{
    if let Some(address) = decode_registered_event(logs) {
        debug!(%address, "plugin repo address decoded from PluginRepoRegistered");
        return Ok(address);
    }

    warn!(ens_domain, "PluginRepoRegistered not decodable from receipt logs, trying name-service lookup");
    match locator.locate(ens_domain).await {
        Ok(Some(address)) => {
            debug!(%address, "plugin repo address resolved via name service");
            return Ok(address);
        }
        Ok(None) => {}
        Err(err) => warn!(%err, "name-service lookup failed"),
    }

    warn!("name-service lookup produced nothing, scanning receipt topics for contract addresses");
    if let Some(address) = scan_topics(logs, probe).await {
        return Ok(address);
    }

    Err(DeployError::AddressNotRecovered { hash: tx_hash }.into())
}

/// First log that decodes as `PluginRepoRegistered`, in receipt order.
/// Logs belonging to other interfaces are expected and skipped.
pub fn decode_registered_event(logs: &[Log]) -> Option<Address> {
    logs.iter().find_map(|log| {
        PluginRepoRegistry::PluginRepoRegistered::decode_log(log)
            .ok()
            .map(|event| event.data.pluginRepo)
    })
}

/// Treats the lower 20 bytes of every topic word as a candidate address and
/// accepts the first one with non-empty code.
async fn scan_topics<C: CodeProbe + ?Sized>(logs: &[Log], probe: &C) -> Option<Address> {
    for log in logs {
        for topic in log.data.topics() {
            let candidate = Address::from_word(*topic);
            if candidate.is_zero() {
                continue;
            }
            match probe.has_code(candidate).await {
                Ok(true) => {
                    debug!(%candidate, "detected contract address from receipt topics");
                    return Some(candidate);
                }
                Ok(false) => {}
                Err(err) => trace!(%candidate, %err, "code probe failed, skipping candidate"),
            }
        }
    }
    None
}
