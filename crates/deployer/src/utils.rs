//! Small helpers shared across the crate.

use crate::error::DeployError;
use alloy_primitives::{Address, Log};
use alloy_rpc_types::TransactionReceipt;

/// Validates an address-shaped input. Raised before any chain interaction,
/// so a typo in the environment fails fast.
pub fn require_address(name: &'static str, value: &str) -> Result<Address, DeployError> {
    let trimmed = value.trim();
    trimmed
        .parse::<Address>()
        .map_err(|_| DeployError::InvalidAddressInput { name, value: trimmed.to_string() })
}

/// Extracts the plain log bodies from a receipt, in emission order.
pub fn receipt_logs(receipt: &TransactionReceipt) -> Vec<Log> {
    receipt.inner.logs().iter().map(|log| log.inner.clone()).collect()
}
