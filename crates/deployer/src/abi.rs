//! Contract bindings for the plugin-registry framework.
//!
//! These signatures are fixed by the external protocol; selectors and event
//! topics are derived from them by standard ABI hashing and must not drift.

use alloy_sol_types::sol;

sol! {
    /// Factory that spawns new plugin repositories and registers them
    /// under the framework's ENS base domain.
    #[sol(rpc)]
    contract PluginRepoFactory {
        function createPluginRepo(string subdomain, address maintainer) external returns (address);
    }

    /// Registry the factory reports new repositories to.
    #[sol(rpc)]
    contract PluginRepoRegistry {
        event PluginRepoRegistered(string subdomain, address pluginRepo);
    }

    /// A versioned plugin repository.
    #[sol(rpc)]
    contract PluginRepo {
        event VersionCreated(uint8 release, uint16 build, address indexed pluginSetup, bytes buildMetadata);

        function createVersion(uint8 release, address pluginSetup, bytes buildMetadata, bytes releaseMetadata) external;
    }

    /// The framework's ENS subdomain registrar proxy.
    #[sol(rpc)]
    contract EnsSubdomainRegistrar {
        function ens() external view returns (address);
    }

    /// ENS registry.
    #[sol(rpc)]
    contract Ens {
        function recordExists(bytes32 node) external view returns (bool);
        function resolver(bytes32 node) external view returns (address);
    }

    /// Address-record resolver.
    #[sol(rpc)]
    contract AddrResolver {
        function addr(bytes32 node) external view returns (address);
    }

    /// Permission manager surface of the management DAO.
    #[sol(rpc)]
    contract Dao {
        function grant(address where, address who, bytes32 permissionId) external;
    }
}
