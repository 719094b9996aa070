//! Fee overrides for providers with quirky `eth_estimateGas` / fee handling.

use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;

/// Blunt safety ceiling passed with every transaction instead of an
/// `eth_estimateGas` round trip, which some providers do not implement
/// properly.
pub const DEFAULT_GAS_LIMIT: u64 = 5_000_000;

/// Numerator of the buffer applied to a legacy gas price to avoid
/// "transaction underpriced" rejections.
const LEGACY_PRICE_BUFFER_NUM: u128 = 110;
const LEGACY_PRICE_BUFFER_DEN: u128 = 100;

/// A point-in-time view of what the provider reports for fees. Fields the
/// provider could not answer are simply absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSnapshot {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub gas_price: Option<u128>,
}

/// Transaction fee fields computed from a [`FeeSnapshot`].
///
/// EIP-1559 fields are preferred; a legacy `gas_price` is only populated
/// when no max fee is available. `gas_price` and `max_fee_per_gas` are
/// never both set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeOverrides {
    pub gas_limit: u64,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub gas_price: Option<u128>,
}

impl FeeOverrides {
    /// Builds overrides with the default gas-limit ceiling.
    pub fn from_snapshot(snapshot: &FeeSnapshot) -> Self {
        Self::with_gas_limit(snapshot, DEFAULT_GAS_LIMIT)
    }

    /// Builds overrides with an explicit gas-limit ceiling.
    pub fn with_gas_limit(snapshot: &FeeSnapshot, gas_limit: u64) -> Self {
        let mut overrides = Self {
            gas_limit,
            max_fee_per_gas: snapshot.max_fee_per_gas,
            max_priority_fee_per_gas: snapshot.max_priority_fee_per_gas,
            gas_price: None,
        };
        if overrides.max_fee_per_gas.is_none() {
            if let Some(price) = snapshot.gas_price {
                overrides.gas_price = Some(buffered_gas_price(price));
            }
        }
        overrides
    }

    /// Installs the overrides on a transaction request.
    pub fn apply(&self, tx: &mut TransactionRequest) {
        tx.gas = Some(self.gas_limit);
        if let Some(max_fee) = self.max_fee_per_gas {
            tx.max_fee_per_gas = Some(max_fee);
        }
        if let Some(priority) = self.max_priority_fee_per_gas {
            tx.max_priority_fee_per_gas = Some(priority);
        }
        if let Some(price) = self.gas_price {
            tx.gas_price = Some(price);
        }
    }
}

/// Adds a 10% buffer, falling back to the raw price if the arithmetic
/// cannot be carried out.
fn buffered_gas_price(price: u128) -> u128 {
    price
        .checked_mul(LEGACY_PRICE_BUFFER_NUM)
        .map(|buffered| buffered / LEGACY_PRICE_BUFFER_DEN)
        .unwrap_or(price)
}

/// Queries the provider for its current fee data.
///
/// Each probe's failure is treated as "field absent"; the legacy price is
/// only queried when no EIP-1559 estimate came back.
pub async fn fee_snapshot<P: Provider>(provider: &P) -> FeeSnapshot {
    let mut snapshot = FeeSnapshot::default();
    match provider.estimate_eip1559_fees().await {
        Ok(estimate) => {
            snapshot.max_fee_per_gas = Some(estimate.max_fee_per_gas);
            snapshot.max_priority_fee_per_gas = Some(estimate.max_priority_fee_per_gas);
        }
        Err(err) => debug!(%err, "EIP-1559 fee estimation unavailable"),
    }
    if snapshot.max_fee_per_gas.is_none() {
        match provider.get_gas_price().await {
            Ok(price) => snapshot.gas_price = Some(price),
            Err(err) => debug!(%err, "legacy gas price query failed"),
        }
    }
    snapshot
}
