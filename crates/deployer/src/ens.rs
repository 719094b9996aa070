//! Production name-service lookup for plugin repositories.

use crate::{
    abi::{AddrResolver, Ens, EnsSubdomainRegistrar},
    recover::RepoLocator,
};
use alloy_ens::namehash;
use alloy_primitives::Address;
use alloy_provider::Provider;
use async_trait::async_trait;
use eyre::Result;

/// ENS domain a repository subdomain is registered under.
pub fn plugin_ens_domain(subdomain: &str, network: &str) -> String {
    if network == "sepolia" {
        format!("{subdomain}.plugin.aragon-dao.eth")
    } else {
        format!("{subdomain}.plugin.dao.eth")
    }
}

/// [`RepoLocator`] walking registrar -> ENS registry -> resolver -> address.
///
/// A registrar that is unknown for the network, or reverts because it was
/// never initialized there, yields `Ok(None)` rather than failing the
/// recovery chain.
pub struct EnsRepoLocator<'a, P> {
    provider: &'a P,
    registrar: Option<Address>,
}

impl<'a, P> EnsRepoLocator<'a, P> {
    pub fn new(provider: &'a P, registrar: Option<Address>) -> Self {
        Self { provider, registrar }
    }
}

#[async_trait]
impl<P: Provider + Clone> RepoLocator for EnsRepoLocator<'_, P> {
    async fn locate(&self, domain: &str) -> Result<Option<Address>> {
        let Some(registrar_address) = self.registrar else {
            debug!("no subdomain registrar known for this network, skipping lookup");
            return Ok(None);
        };

        let registrar = EnsSubdomainRegistrar::new(registrar_address, self.provider.clone());
        let ens_address = match registrar.ens().call().await {
            Ok(address) => address,
            Err(err) => {
                warn!(%registrar_address, %err, "registrar call failed, treating record as absent");
                return Ok(None);
            }
        };

        let node = namehash(domain);
        let ens = Ens::new(ens_address, self.provider.clone());
        if !ens.recordExists(node).call().await? {
            return Ok(None);
        }

        let resolver_address = ens.resolver(node).call().await?;
        if resolver_address.is_zero() {
            return Ok(None);
        }

        let resolver = AddrResolver::new(resolver_address, self.provider.clone());
        let address = resolver.addr(node).call().await?;
        Ok((!address.is_zero()).then_some(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sepolia_uses_the_staging_base_domain() {
        assert_eq!(plugin_ens_domain("my-plugin", "sepolia"), "my-plugin.plugin.aragon-dao.eth");
        assert_eq!(plugin_ens_domain("my-plugin", "harmony-mainnet"), "my-plugin.plugin.dao.eth");
        assert_eq!(plugin_ens_domain("my-plugin", "ethereum-mainnet"), "my-plugin.plugin.dao.eth");
    }
}
