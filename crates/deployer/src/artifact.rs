//! JSON summary of a deployment run, for human and auditor consumption.

use alloy_primitives::{Address, TxHash};
use chrono::Utc;
use eyre::{Result, WrapErr};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInputs {
    pub plugin_repo_factory: Address,
    pub plugin_repo_registry: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_dao: Option<Address>,
    pub subdomain: String,
    pub maintainer: Address,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_tx_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_tx_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_block_number: Option<u64>,
}

/// Everything an operator needs to re-run diagnostics by hand.
/// Written once at the end of a run; never read back by this tool.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub network: String,
    pub chain_id: u64,
    pub generated_at: String,
    pub inputs: RunInputs,
    pub contracts: BTreeMap<String, ContractRecord>,
}

impl RunSummary {
    pub fn new(network: String, chain_id: u64, inputs: RunInputs) -> Self {
        Self {
            network,
            chain_id,
            generated_at: Utc::now().to_rfc3339(),
            inputs,
            contracts: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, record: ContractRecord) {
        self.contracts.insert(name.into(), record);
    }

    /// Writes the summary, pretty-printed, to `<out_dir>/deploy-<millis>.json`.
    pub fn write(&self, out_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(out_dir)
            .wrap_err_with(|| format!("failed to create output directory {}", out_dir.display()))?;
        let path = out_dir.join(format!("deploy-{}.json", Utc::now().timestamp_millis()));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
            .wrap_err_with(|| format!("failed to write deployment output {}", path.display()))?;
        info!(path = %path.display(), "wrote deployment output");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        let mut summary = RunSummary::new(
            "harmony-mainnet".to_string(),
            1_666_600_000,
            RunInputs {
                plugin_repo_factory: Address::repeat_byte(0x11),
                plugin_repo_registry: Address::repeat_byte(0x22),
                management_dao: None,
                subdomain: "my-plugin".to_string(),
                maintainer: Address::repeat_byte(0x33),
            },
        );
        summary.record(
            "pluginRepo",
            ContractRecord {
                address: Address::repeat_byte(0xaa),
                create_tx_hash: Some(TxHash::repeat_byte(0x01)),
                create_block_number: Some(7),
                publish_tx_hash: Some(TxHash::repeat_byte(0x02)),
                publish_block_number: Some(8),
            },
        );
        summary
    }

    #[test]
    fn writes_camel_case_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = summary().write(dir.path()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["network"], "harmony-mainnet");
        assert_eq!(value["chainId"], 1_666_600_000u64);
        assert!(value["generatedAt"].is_string());
        assert_eq!(value["inputs"]["subdomain"], "my-plugin");
        assert_eq!(value["contracts"]["pluginRepo"]["createBlockNumber"], 7);
        // absent optionals are omitted, not null
        assert!(value["inputs"].get("managementDao").is_none());
    }
}
