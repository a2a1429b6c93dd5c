//! Definitions of CLI arguments and commands for deploy scripts

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, verify},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_SECRETS_PATH},
    errors::ScriptError,
    types::{Environment, VerifiableContract},
};

/// Deploy the Vesta GMX / GLP staking wrappers
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Directory holding the `deployments.<env>.json` files
    #[arg(long, default_value = ".")]
    pub deployments_dir: PathBuf,

    /// Path to the secrets file holding per-network RPC URLs and keys
    #[arg(long, default_value = DEFAULT_SECRETS_PATH)]
    pub secrets: PathBuf,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy script subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy or upgrade the staking wrappers and hand them to the admin wallet
    Deploy(DeployArgs),
    /// Verify a deployed contract on the network's block explorer
    Verify(VerifyArgs),
}

impl Command {
    /// Run the subcommand
    pub async fn run(
        self,
        artifacts_dir: &Path,
        deployments_dir: &Path,
        secrets_path: &Path,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                deploy(args, artifacts_dir, deployments_dir, secrets_path).await
            }
            Command::Verify(args) => verify(args, deployments_dir, secrets_path),
        }
    }
}

/// Deploy the staking wrappers.
///
/// Each wrapper sits behind a `TransparentUpgradeableProxy` administered by a
/// single `ProxyAdmin` per network. Contracts recorded in the deployments file
/// are reused when their bytecode is unchanged and upgraded otherwise.
#[derive(Args)]
pub struct DeployArgs {
    /// The environment to deploy to
    #[arg(short, long, value_enum, default_value = "testnet")]
    pub env: Environment,

    /// Path to the deploy config, defaults to `configs/<env>.json`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Network RPC URL, overriding the secrets file
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key of the deployer, overriding the secrets file
    #[arg(short, long, env = "PKEY")]
    pub priv_key: Option<String>,
}

/// Verify a deployed contract
#[derive(Args)]
pub struct VerifyArgs {
    /// The environment the contract is deployed to
    #[arg(short, long, value_enum, default_value = "testnet")]
    pub env: Environment,

    /// The contract to verify
    #[arg(short, long, value_enum)]
    pub contract: VerifiableContract,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use crate::types::{Environment, VerifiableContract};

    use super::{Cli, Command};

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_deploy_defaults_to_testnet() {
        let cli = Cli::try_parse_from(["staking-deploy", "deploy"]).unwrap();
        match cli.command {
            Command::Deploy(args) => {
                assert_eq!(args.env, Environment::Testnet);
                assert!(args.config.is_none());
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn test_parse_deploy_and_verify() {
        let cli = Cli::try_parse_from([
            "staking-deploy",
            "--artifacts",
            "out",
            "deploy",
            "--env",
            "mainnet",
            "--config",
            "mainnet.json",
        ])
        .unwrap();
        assert_eq!(cli.artifacts.to_str(), Some("out"));
        assert!(matches!(
            cli.command,
            Command::Deploy(ref args) if args.env == Environment::Mainnet
        ));

        let cli = Cli::try_parse_from([
            "staking-deploy",
            "verify",
            "--env",
            "mainnet",
            "--contract",
            "proxy-admin",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Verify(ref args) if args.contract == VerifiableContract::ProxyAdmin
        ));
    }

    #[test]
    fn test_unknown_environment_rejected() {
        assert!(Cli::try_parse_from(["staking-deploy", "deploy", "--env", "goerli"]).is_err());
    }
}
