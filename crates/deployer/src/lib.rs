//! Deployment orchestration for on-chain plugin repositories.
//!
//! Creates a registry entry through the framework's `PluginRepoFactory`,
//! recovers the new repository's address from the receipt (with ordered
//! fallbacks for providers whose logs do not decode cleanly), publishes a
//! version record against it, and writes a JSON summary of the run.

#[macro_use]
extern crate tracing;

pub mod abi;
pub mod artifact;
pub mod deploy;
pub mod ens;
pub mod error;
pub mod fees;
pub mod network;
pub mod provider;
pub mod publish;
pub mod recover;
pub mod submit;
pub mod utils;

pub use error::DeployError;
