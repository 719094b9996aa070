//! RPC provider construction.

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use eyre::{Result, WrapErr};

/// Connects a wallet-backed provider, returning it with the signer address.
pub async fn connect_signing(
    rpc_url: &str,
    private_key: &str,
) -> Result<(impl Provider + Clone, Address)> {
    let signer: PrivateKeySigner =
        private_key.trim().parse().wrap_err("PRIVATE_KEY is not a valid private key")?;
    let sender = signer.address();
    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect(rpc_url)
        .await
        .wrap_err_with(|| format!("failed to connect to RPC endpoint {rpc_url}"))?;
    Ok((provider, sender))
}

/// Connects a read-only provider for simulations and diagnostics.
pub async fn connect_read_only(rpc_url: &str) -> Result<impl Provider + Clone> {
    ProviderBuilder::new()
        .connect(rpc_url)
        .await
        .wrap_err_with(|| format!("failed to connect to RPC endpoint {rpc_url}"))
}
