use alloy_primitives::TxHash;

/// Fatal failures of a deployment run.
///
/// Per-item probe failures (a log that does not decode, a topic without
/// bytecode behind it, a network alias that does not resolve) are never
/// surfaced through this type; only exhaustion of a whole candidate set or
/// strategy chain is.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Network name resolution exhausted every candidate.
    #[error("unsupported network: no deployments found for `{0}` or any of its aliases")]
    UnsupportedNetwork(String),

    /// The provider returned no receipt for a submitted transaction.
    #[error("no receipt available for transaction {hash}")]
    ReceiptUnavailable { hash: TxHash },

    /// The chain confirmed the transaction with status 0.
    ///
    /// `details` holds the re-fetched transaction when the diagnostic
    /// lookup succeeded; a failed lookup must never mask the revert.
    #[error("transaction {hash} reverted with status 0")]
    TransactionReverted { hash: TxHash, details: Option<String> },

    /// Every address-recovery strategy came up empty.
    #[error("could not recover the plugin repo address from transaction {hash}")]
    AddressNotRecovered { hash: TxHash },

    /// The publish transaction confirmed but no `VersionCreated` event could
    /// be decoded from its receipt.
    ///
    /// This is a verification failure, not a submission failure: the chain
    /// state is mutated regardless of whether the local parse succeeds.
    /// Callers must not re-send the publish transaction on this error; only
    /// the verification read may be retried.
    #[error(
        "no VersionCreated event found in transaction {hash}; \
         the publish likely succeeded but is unconfirmed"
    )]
    VersionEventNotFound { hash: TxHash },

    /// A required address-shaped input failed validation. Raised before any
    /// chain interaction is attempted.
    #[error("{name} is missing or not a valid address: `{value}`")]
    InvalidAddressInput { name: &'static str, value: String },
}
