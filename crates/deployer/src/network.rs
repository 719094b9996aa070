//! Network name resolution and the per-network deployment-address table.

use crate::error::DeployError;
use alloy_primitives::{Address, address};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// Chain id the original Harmony deployment is pinned to.
pub const HARMONY_CHAIN_ID: u64 = 1_666_600_000;

/// Chain id a canonical network name is expected to run on. Deployment runs
/// abort when the provider reports a different id, unless the caller
/// overrides the expectation.
pub fn known_chain_id(network: &str) -> Option<u64> {
    match network {
        "harmony-mainnet" => Some(HARMONY_CHAIN_ID),
        "harmony-testnet" => Some(1_666_700_000),
        "ethereum-mainnet" => Some(1),
        "sepolia" => Some(11_155_111),
        _ => None,
    }
}

/// Canonical names probed after the raw name and its stripped variants.
/// Order matters: the first candidate the registry recognizes wins.
pub const FALLBACK_CANDIDATES: &[&str] = &[
    "harmony",
    "harmony-mainnet",
    "harmony-testnet",
    "ethereum-mainnet",
    "mainnet",
    "sepolia",
];

/// Alias -> canonical network name, mirroring the naming used by common
/// tooling for these chains.
const ALIASES: &[(&str, &str)] = &[
    ("harmony", "harmony-mainnet"),
    ("harmony-mainnet", "harmony-mainnet"),
    ("harmonyTestnet", "harmony-testnet"),
    ("harmony_testnet", "harmony-testnet"),
    ("harmony-testnet", "harmony-testnet"),
    ("mainnet", "ethereum-mainnet"),
    ("ethereum-mainnet", "ethereum-mainnet"),
    ("sepolia", "sepolia"),
];

/// Well-known framework contract addresses for one network.
///
/// Immutable once fetched; the factory and registry are always required,
/// the rest depends on what the framework has deployed on that network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployments {
    pub plugin_repo_factory: Address,
    pub plugin_repo_registry: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_ens_subdomain_registrar: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_dao: Option<Address>,
}

/// Source of canonical network names and deployment-address bundles.
///
/// Probes return options rather than erroring so that "candidate invalid"
/// stays a normal value during resolution.
pub trait NetworkRegistry {
    /// Canonical name for a (possibly aliased) network name.
    fn canonical_by_alias(&self, name: &str) -> Option<&str>;

    /// Deployment bundle for a canonical network name.
    fn deployments(&self, name: &str) -> Option<&NetworkDeployments>;
}

/// The built-in deployment table, optionally extended from a JSON file.
#[derive(Clone, Debug, Default)]
pub struct Deployments {
    networks: BTreeMap<String, NetworkDeployments>,
}

impl Deployments {
    /// Table carrying the Harmony mainnet framework addresses this tool was
    /// originally driven against.
    pub fn builtin() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "harmony-mainnet".to_string(),
            NetworkDeployments {
                plugin_repo_factory: address!("753e32a799F319d25aCf138b343003ce0A5171eB"),
                plugin_repo_registry: address!("24416Fcd035314C952A16549b47E8251aCdd844E"),
                plugin_ens_subdomain_registrar: None,
                management_dao: Some(address!("8f9a805603B6fd5df7e8d284CA66CcaF77C3BeF6")),
            },
        );
        Self { networks }
    }

    /// Loads per-network bundles from a JSON file and merges them over the
    /// built-in table. File entries win on conflict.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read deployments file {}", path.display()))?;
        let extra: BTreeMap<String, NetworkDeployments> = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("malformed deployments file {}", path.display()))?;
        let mut merged = Self::builtin();
        merged.networks.extend(extra);
        Ok(merged)
    }

}

impl NetworkRegistry for Deployments {
    fn canonical_by_alias(&self, name: &str) -> Option<&str> {
        ALIASES.iter().find(|(alias, _)| *alias == name).map(|(_, canonical)| *canonical)
    }

    fn deployments(&self, name: &str) -> Option<&NetworkDeployments> {
        self.networks.get(name)
    }
}

/// Resolves a user-supplied network name to the canonical key used by the
/// deployment table.
///
/// Candidates are probed in a fixed order: the raw name, the raw name with a
/// trailing `-mainnet` or `-testnet` stripped, then [`FALLBACK_CANDIDATES`].
/// For each candidate an alias lookup is tried first, then a deployments
/// fetch; a candidate that fails both is silently skipped. Only exhaustion of
/// the whole set is an error.
pub fn resolve(raw: &str, registry: &impl NetworkRegistry) -> Result<String, DeployError> {
    let mut candidates: Vec<&str> = Vec::with_capacity(3 + FALLBACK_CANDIDATES.len());
    for candidate in [
        raw,
        raw.strip_suffix("-mainnet").unwrap_or(raw),
        raw.strip_suffix("-testnet").unwrap_or(raw),
    ] {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    for candidate in FALLBACK_CANDIDATES {
        if !candidates.contains(candidate) {
            candidates.push(candidate);
        }
    }

    for candidate in candidates {
        if let Some(canonical) = registry.canonical_by_alias(candidate) {
            trace!(raw, candidate, canonical, "network alias matched");
            return Ok(canonical.to_string());
        }
        if registry.deployments(candidate).is_some() {
            trace!(raw, candidate, "network accepted via deployments probe");
            return Ok(candidate.to_string());
        }
    }

    Err(DeployError::UnsupportedNetwork(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> NetworkDeployments {
        NetworkDeployments {
            plugin_repo_factory: Address::repeat_byte(0x11),
            plugin_repo_registry: Address::repeat_byte(0x22),
            plugin_ens_subdomain_registrar: None,
            management_dao: None,
        }
    }

    /// Registry double with a configurable alias table, independent of the
    /// deployment entries it holds.
    #[derive(Default)]
    struct FakeRegistry {
        aliases: Vec<(String, String)>,
        networks: BTreeMap<String, NetworkDeployments>,
    }

    impl NetworkRegistry for FakeRegistry {
        fn canonical_by_alias(&self, name: &str) -> Option<&str> {
            self.aliases.iter().find(|(a, _)| a == name).map(|(_, c)| c.as_str())
        }

        fn deployments(&self, name: &str) -> Option<&NetworkDeployments> {
            self.networks.get(name)
        }
    }

    #[test]
    fn resolves_known_aliases_to_canonical_names() {
        let registry = Deployments::builtin();
        for (raw, expected) in [
            ("harmony", "harmony-mainnet"),
            ("harmony-mainnet", "harmony-mainnet"),
            ("harmonyTestnet", "harmony-testnet"),
            ("harmony_testnet", "harmony-testnet"),
            ("mainnet", "ethereum-mainnet"),
            ("sepolia", "sepolia"),
        ] {
            assert_eq!(resolve(raw, &registry).unwrap(), expected, "raw name {raw}");
        }
    }

    #[test]
    fn strips_suffix_before_fixed_fallbacks() {
        let mut registry = FakeRegistry::default();
        registry.aliases.push(("custom".into(), "custom-canonical".into()));
        // "custom-mainnet" itself is unknown; the stripped variant matches.
        assert_eq!(resolve("custom-mainnet", &registry).unwrap(), "custom-canonical");
    }

    #[test]
    fn raw_name_wins_over_stripped_variant() {
        let mut registry = FakeRegistry::default();
        registry.aliases.push(("base-mainnet".into(), "base-mainnet".into()));
        registry.aliases.push(("base".into(), "something-else".into()));
        assert_eq!(resolve("base-mainnet", &registry).unwrap(), "base-mainnet");
    }

    #[test]
    fn accepts_candidate_via_deployments_probe() {
        let mut registry = FakeRegistry::default();
        registry.networks.insert("oddchain".into(), bundle());
        assert_eq!(resolve("oddchain", &registry).unwrap(), "oddchain");
    }

    #[test]
    fn falls_back_to_fixed_candidate_list() {
        let mut registry = FakeRegistry::default();
        registry.networks.insert("sepolia".into(), bundle());
        // Nothing about the raw name matches; "sepolia" is the only fixed
        // candidate with deployments.
        assert_eq!(resolve("some-unknown-net", &registry).unwrap(), "sepolia");
    }

    #[test]
    fn exhaustion_is_unsupported_network() {
        let registry = FakeRegistry::default();
        let err = resolve("nowhere", &registry).unwrap_err();
        assert!(matches!(err, DeployError::UnsupportedNetwork(ref name) if name == "nowhere"));
    }

    #[test]
    fn unknown_names_fall_back_to_harmony_on_builtin_table() {
        // The fixed candidate list starts with "harmony", so the built-in
        // table never exhausts. This mirrors the original tool's behavior.
        let registry = Deployments::builtin();
        assert_eq!(resolve("some-unknown-net", &registry).unwrap(), "harmony-mainnet");
    }

    #[test]
    fn known_chain_ids_cover_the_builtin_networks() {
        assert_eq!(known_chain_id("harmony-mainnet"), Some(HARMONY_CHAIN_ID));
        assert_eq!(known_chain_id("harmony-testnet"), Some(1_666_700_000));
        assert_eq!(known_chain_id("ethereum-mainnet"), Some(1));
        assert_eq!(known_chain_id("sepolia"), Some(11_155_111));
        assert_eq!(known_chain_id("oddchain"), None);
    }

    #[test]
    fn deployments_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        std::fs::write(
            &path,
            r#"{
                "harmony-mainnet": {
                    "pluginRepoFactory": "0x1111111111111111111111111111111111111111",
                    "pluginRepoRegistry": "0x2222222222222222222222222222222222222222"
                },
                "sepolia": {
                    "pluginRepoFactory": "0x3333333333333333333333333333333333333333",
                    "pluginRepoRegistry": "0x4444444444444444444444444444444444444444",
                    "managementDao": "0x5555555555555555555555555555555555555555"
                }
            }"#,
        )
        .unwrap();

        let merged = Deployments::load(&path).unwrap();
        let harmony = merged.deployments("harmony-mainnet").unwrap();
        assert_eq!(harmony.plugin_repo_factory, Address::repeat_byte(0x11));
        let sepolia = merged.deployments("sepolia").unwrap();
        assert_eq!(sepolia.management_dao, Some(Address::repeat_byte(0x55)));
    }
}
