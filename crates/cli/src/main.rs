//! `repo-deploy`: create, register and version plugin repositories on an
//! on-chain plugin registry.

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cmd;
mod opts;

use cmd::{
    create_repo::CreateRepoArgs, deploy::DeployArgs, grant::GrantAllowlistArgs,
    inspect_tx::InspectTxArgs, preflight::PreflightArgs, publish::PublishArgs,
};

#[derive(Parser)]
#[command(name = "repo-deploy", version, about)]
struct RepoDeploy {
    #[command(subcommand)]
    cmd: Subcommands,
}

#[derive(Subcommand)]
enum Subcommands {
    /// Create a plugin repo and publish a version against it in one run.
    Deploy(DeployArgs),
    /// Create and register a plugin repo without publishing a version.
    CreateRepo(CreateRepoArgs),
    /// Publish a version to an existing plugin repo.
    Publish(PublishArgs),
    /// Simulate repo creation through eth_call without spending gas.
    Preflight(PreflightArgs),
    /// Dump a transaction, replay it for a revert reason, and size the code
    /// behind its log emitters.
    InspectTx(InspectTxArgs),
    /// Grant the allowlist-management permission through the management DAO.
    GrantAllowlist(GrantAllowlistArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    match RepoDeploy::parse().cmd {
        Subcommands::Deploy(args) => args.run().await,
        Subcommands::CreateRepo(args) => args.run().await,
        Subcommands::Publish(args) => args.run().await,
        Subcommands::Preflight(args) => args.run().await,
        Subcommands::InspectTx(args) => args.run().await,
        Subcommands::GrantAllowlist(args) => args.run().await,
    }
}
