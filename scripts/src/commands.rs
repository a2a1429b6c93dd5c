//! Implementations of the deploy script subcommands

use std::{
    io::{self, BufRead, Write},
    path::Path,
    process::Command,
};

use alloy::primitives::Address;
use tool_utils::run_command;
use tracing::{info, warn};

use crate::{
    artifacts::ArtifactStore,
    cli::{DeployArgs, VerifyArgs},
    config::{DeployConfig, Secrets},
    confirm::confirm_mainnet,
    constants::{DEFAULT_CONFIG_DIR, FORGE_COMMAND, PROXY_ADMIN_CONTRACT, VERIFY_CONTRACT_COMMAND},
    deployer::Deployer,
    deployments::{implementation_key, Deployments},
    errors::ScriptError,
    types::{Environment, VerifiableContract},
    utils::setup_client,
};

/// Deploy or upgrade the staking wrappers and wire their permissions
pub async fn deploy(
    args: DeployArgs,
    artifacts_dir: &Path,
    deployments_dir: &Path,
    secrets_path: &Path,
) -> Result<(), ScriptError> {
    let stdin = io::stdin();
    deploy_with(
        args,
        artifacts_dir,
        deployments_dir,
        secrets_path,
        &mut stdin.lock(),
        &mut io::stdout(),
    )
    .await
}

/// Run a deployment, reading the mainnet confirmation from `reader`
async fn deploy_with<R: BufRead, W: Write>(
    args: DeployArgs,
    artifacts_dir: &Path,
    deployments_dir: &Path,
    secrets_path: &Path,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), ScriptError> {
    let env = args.env;
    let config_path = args
        .config
        .unwrap_or_else(|| env.config_path(Path::new(DEFAULT_CONFIG_DIR)));

    info!("Loading {env} config from {}", config_path.display());
    let config = DeployConfig::from_file(&config_path)?;
    // Fail on a bad config before asking anything of the operator
    config.setup()?;

    if env.is_mainnet() {
        warn!("Deploying to mainnet");
        if !confirm_mainnet(reader, writer)? {
            return Ok(());
        }
    }

    let secrets = Secrets::from_file(secrets_path)?;
    let rpc_url = secrets.rpc_url(env, args.rpc_url)?;
    let priv_key = secrets.private_key(env, args.priv_key)?;
    let (client, sender) = setup_client(&priv_key, &rpc_url).await?;

    let deployments = Deployments::new(env.deployments_path(deployments_dir));
    let artifacts = ArtifactStore::new(artifacts_dir);
    info!("Recording deployments in {}", deployments.path().display());

    Deployer::new(&config, client, sender, deployments, artifacts)?.run().await?;

    info!("Deployment to {env} complete");
    Ok(())
}

/// Verify a deployed contract's source on the network's block explorer
pub fn verify(
    args: VerifyArgs,
    deployments_dir: &Path,
    secrets_path: &Path,
) -> Result<(), ScriptError> {
    let api_key = Secrets::from_file(secrets_path)?.etherscan_api_key(args.env)?;
    let deployments = Deployments::new(args.env.deployments_path(deployments_dir));

    let key = verification_key(args.contract);
    let address = deployments.read_address(&key)?.ok_or_else(|| {
        ScriptError::ReadDeployments(format!(
            "{key} not found in {}",
            deployments.path().display()
        ))
    })?;

    info!("Verifying {} at {address:#x}", args.contract);
    let cmd = verify_command(args.env, args.contract, address, &api_key);
    run_command(cmd).map_err(|e| ScriptError::CommandExecution(e.to_string()))
}

/// The deployments key of the address to verify
///
/// Proxies carry no project source, so the staking wrappers are verified
/// through their implementations.
fn verification_key(contract: VerifiableContract) -> String {
    match contract {
        VerifiableContract::ProxyAdmin => PROXY_ADMIN_CONTRACT.to_string(),
        other => implementation_key(other.contract_name()),
    }
}

/// Build the `forge verify-contract` invocation for `contract` at `address`
fn verify_command(
    env: Environment,
    contract: VerifiableContract,
    address: Address,
    api_key: &str,
) -> Command {
    let mut cmd = Command::new(FORGE_COMMAND);
    cmd.arg(VERIFY_CONTRACT_COMMAND)
        .arg(format!("{address:#x}"))
        .arg(contract.contract_name())
        .arg("--chain")
        .arg(env.chain_name())
        .arg("--etherscan-api-key")
        .arg(api_key)
        .arg("--watch");

    cmd
}

#[cfg(test)]
mod tests {
    use std::{env, fs, io::Cursor, path::PathBuf, process};

    use alloy::primitives::address;

    use crate::{
        cli::DeployArgs,
        errors::ScriptError,
        types::{Environment, VerifiableContract},
    };

    use super::{deploy_with, verification_key, verify_command};

    /// Run a mainnet deployment answering the confirmation with `answer`
    ///
    /// The secrets file is malformed, so a run that gets past the
    /// confirmation fails while resolving secrets.
    async fn mainnet_deploy(answer: &str) -> Result<(), ScriptError> {
        let dir = env::temp_dir().join(format!("deploy-{}-{}", answer.trim(), process::id()));
        fs::create_dir_all(&dir).unwrap();
        let secrets = dir.join("secrets.json");
        fs::write(&secrets, "not json").unwrap();

        let args = DeployArgs {
            env: Environment::Mainnet,
            config: Some(PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../configs/mainnet.json"
            ))),
            rpc_url: None,
            priv_key: None,
        };
        let mut reader = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();

        let result = deploy_with(args, &dir, &dir, &secrets, &mut reader, &mut out).await;
        fs::remove_dir_all(&dir).unwrap();
        result
    }

    #[tokio::test]
    async fn test_declined_mainnet_deploy_stops_before_secrets() {
        assert!(mainnet_deploy("n\n").await.is_ok());
        assert!(mainnet_deploy("\n").await.is_ok());
    }

    #[tokio::test]
    async fn test_approved_mainnet_deploy_proceeds() {
        assert!(matches!(
            mainnet_deploy("y\n").await,
            Err(ScriptError::Secrets(_))
        ));
    }

    #[test]
    fn test_verification_keys() {
        assert_eq!(
            verification_key(VerifiableContract::Gmx),
            "VestaGMXStakingImplementation"
        );
        assert_eq!(
            verification_key(VerifiableContract::Glp),
            "VestaGLPStakingImplementation"
        );
        assert_eq!(verification_key(VerifiableContract::ProxyAdmin), "ProxyAdmin");
    }

    #[test]
    fn test_verify_command() {
        let address = address!("DB607928F10Ca503Ee6678522567e80D8498D759");
        let cmd = verify_command(Environment::Mainnet, VerifiableContract::Glp, address, "KEY");

        assert_eq!(cmd.get_program(), "forge");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            [
                "verify-contract",
                "0xdb607928f10ca503ee6678522567e80d8498d759",
                "VestaGLPStaking",
                "--chain",
                "arbitrum",
                "--etherscan-api-key",
                "KEY",
                "--watch",
            ]
        );
    }
}
