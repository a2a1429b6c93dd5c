//! Deployment configuration and network secrets
//!
//! A deploy config is read once at the start of a run and describes the
//! on-chain addresses the staking wrappers are wired to. Secrets hold the RPC
//! endpoint, deployer key, and block explorer API key of each network.

use std::{collections::HashMap, fs, path::Path};

use alloy::primitives::Address;
use serde::Deserialize;

use crate::{
    constants::{LOCALHOST_PKEY, LOCALHOST_RPC_URL},
    errors::ScriptError,
    types::Environment,
};

/// The deployment configuration of a single environment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    /// The number of confirmations to wait for on every transaction
    pub tx_confirmations: u64,
    /// The addresses the contracts are configured with
    pub setup: Option<Setup>,
}

impl DeployConfig {
    /// Read a deploy config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadConfig(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Parse a deploy config from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(contents).map_err(|e| ScriptError::ReadConfig(e.to_string()))
    }

    /// Get the validated setup record
    pub fn setup(&self) -> Result<&Setup, ScriptError> {
        if self.tx_confirmations == 0 {
            return Err(ScriptError::InvalidConfig(
                "txConfirmations must be at least 1".to_string(),
            ));
        }

        let setup = self.setup.as_ref().ok_or(ScriptError::MissingSetup)?;
        setup.validate()?;
        Ok(setup)
    }
}

/// The on-chain addresses the staking wrappers are set up with
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    /// Addresses shared by both staking wrappers
    pub general: GeneralSetup,
    /// Addresses used only by the GMX staking wrapper
    pub gmx_staking: GmxStakingSetup,
    /// Addresses used only by the GLP staking wrapper
    pub glp_staking: GlpStakingSetup,
}

/// Addresses shared by both staking wrappers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSetup {
    /// The wallet that ends up owning every deployed contract
    pub admin_wallet: Address,
    /// The treasury receiving the protocol's share of rewards
    pub vesta_treasury: Address,
    /// The GMX `RewardRouterV2`
    pub gmx_reward_router_v2: Address,
    /// The Vesta active pool, enabled as an operator on both wrappers
    pub active_pool: Address,
}

/// Addresses used by the GMX staking wrapper
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmxStakingSetup {
    /// The GMX token
    pub gmx_token: Address,
    /// The staked GMX reward tracker
    pub staked_gmx_tracker: Address,
    /// The fee GMX reward tracker
    pub fee_gmx_tracker_rewards: Address,
}

/// Addresses used by the GLP staking wrapper
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlpStakingSetup {
    /// The staked GLP token
    pub s_glp: Address,
    /// The fee GLP reward tracker
    pub fee_glp_tracker_rewards: Address,
}

impl Setup {
    /// Ensure that every configured address is set
    pub fn validate(&self) -> Result<(), ScriptError> {
        let addresses = [
            ("general.adminWallet", self.general.admin_wallet),
            ("general.vestaTreasury", self.general.vesta_treasury),
            ("general.gmxRewardRouterV2", self.general.gmx_reward_router_v2),
            ("general.activePool", self.general.active_pool),
            ("gmxStaking.gmxToken", self.gmx_staking.gmx_token),
            ("gmxStaking.stakedGmxTracker", self.gmx_staking.staked_gmx_tracker),
            ("gmxStaking.feeGmxTrackerRewards", self.gmx_staking.fee_gmx_tracker_rewards),
            ("glpStaking.sGlp", self.glp_staking.s_glp),
            ("glpStaking.feeGlpTrackerRewards", self.glp_staking.fee_glp_tracker_rewards),
        ];

        match addresses.iter().find(|(_, addr)| addr.is_zero()) {
            Some((name, _)) => Err(ScriptError::InvalidConfig(format!(
                "{name} is the zero address"
            ))),
            None => Ok(()),
        }
    }
}

// -----------
// | Secrets |
// -----------

/// The contents of the secrets file
#[derive(Debug, Default, Deserialize)]
pub struct Secrets {
    /// Secrets keyed by network name
    #[serde(default)]
    networks: HashMap<String, NetworkSecrets>,
}

/// The secrets of a single network
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecrets {
    /// The network's RPC URL
    pub rpc_url: Option<String>,
    /// The deployer's private key
    pub private_key: Option<String>,
    /// The block explorer API key used for contract verification
    pub etherscan_api_key: Option<String>,
}

impl Secrets {
    /// Read the secrets file, treating a missing file as empty
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::Secrets(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents).map_err(|e| ScriptError::Secrets(e.to_string()))
    }

    /// The secrets of the given environment's network, if any
    fn network(&self, env: Environment) -> Option<&NetworkSecrets> {
        self.networks.get(env.network_name())
    }

    /// Resolve the RPC URL: an explicit value wins over the secrets file, and
    /// localhost falls back to the default development node
    pub fn rpc_url(&self, env: Environment, cli: Option<String>) -> Result<String, ScriptError> {
        let from_file = self.network(env).and_then(|n| non_empty(n.rpc_url.clone()));
        Self::resolve(env, "rpcUrl", non_empty(cli).or(from_file), LOCALHOST_RPC_URL)
    }

    /// Resolve the deployer's private key, in the same order as the RPC URL
    pub fn private_key(
        &self,
        env: Environment,
        cli: Option<String>,
    ) -> Result<String, ScriptError> {
        let from_file = self.network(env).and_then(|n| non_empty(n.private_key.clone()));
        Self::resolve(env, "privateKey", non_empty(cli).or(from_file), LOCALHOST_PKEY)
    }

    /// The block explorer API key of the given environment's network
    pub fn etherscan_api_key(&self, env: Environment) -> Result<String, ScriptError> {
        self.network(env)
            .and_then(|n| non_empty(n.etherscan_api_key.clone()))
            .ok_or_else(|| {
                ScriptError::Secrets(format!(
                    "etherscanApiKey not set for network {}",
                    env.network_name()
                ))
            })
    }

    /// Pick the configured value, the localhost default, or fail
    fn resolve(
        env: Environment,
        name: &str,
        value: Option<String>,
        localhost_default: &str,
    ) -> Result<String, ScriptError> {
        match value {
            Some(v) => Ok(v),
            None if env == Environment::Localhost => Ok(localhost_default.to_string()),
            None => Err(ScriptError::Secrets(format!(
                "{name} not set for network {}",
                env.network_name()
            ))),
        }
    }
}

/// Treat an empty string as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use crate::{
        constants::{LOCALHOST_PKEY, LOCALHOST_RPC_URL},
        errors::ScriptError,
        types::Environment,
    };

    use super::{DeployConfig, Secrets};

    const MAINNET_CONFIG: &str = r#"{
        "txConfirmations": 3,
        "setup": {
            "general": {
                "adminWallet": "0x4A4651B31d747D1DdbDDADCF1b1E24a5f6dcc7b0",
                "vestaTreasury": "0x4A4651B31d747D1DdbDDADCF1b1E24a5f6dcc7b0",
                "gmxRewardRouterV2": "0xA906F338CB21815cBc4Bc87ace9e68c87eF8d8F1",
                "activePool": "0xBE3dE7fB9Aa09B3Fa931868Fb49d5BA5fEe2eBb1"
            },
            "gmxStaking": {
                "gmxToken": "0xfc5A1A6EB076a2C7aD06eD22C90d7E710E35ad0a",
                "stakedGmxTracker": "0x908C4D94D34924765f1eDc22A1DD098397c59dD4",
                "feeGmxTrackerRewards": "0xd2D1162512F927a7e282Ef43a362659E4F2a728F"
            },
            "glpStaking": {
                "sGlp": "0x1aDDD80E6039594eE970E5872D247bf0414C8903",
                "feeGlpTrackerRewards": "0x4e971a87900b931fF39d1Aad67697F49835400b6"
            }
        }
    }"#;

    fn secrets(json: &str) -> Secrets {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_config() {
        let config = DeployConfig::from_json(MAINNET_CONFIG).unwrap();
        let setup = config.setup().unwrap();

        assert_eq!(config.tx_confirmations, 3);
        assert_eq!(
            setup.general.active_pool,
            address!("BE3dE7fB9Aa09B3Fa931868Fb49d5BA5fEe2eBb1")
        );
        assert_eq!(
            setup.gmx_staking.gmx_token,
            address!("fc5A1A6EB076a2C7aD06eD22C90d7E710E35ad0a")
        );
    }

    #[test]
    fn test_shipped_configs_are_valid() {
        for contents in [
            include_str!("../../configs/mainnet.json"),
            include_str!("../../configs/localhost.json"),
        ] {
            let config = DeployConfig::from_json(contents).unwrap();
            config.setup().unwrap();
        }
    }

    #[test]
    fn test_missing_setup_aborts() {
        let config = DeployConfig::from_json(r#"{ "txConfirmations": 1 }"#).unwrap();
        assert!(matches!(config.setup(), Err(ScriptError::MissingSetup)));
    }

    #[test]
    fn test_zero_address_rejected() {
        let json = MAINNET_CONFIG.replace(
            "0xBE3dE7fB9Aa09B3Fa931868Fb49d5BA5fEe2eBb1",
            "0x0000000000000000000000000000000000000000",
        );
        let config = DeployConfig::from_json(&json).unwrap();

        match config.setup() {
            Err(ScriptError::InvalidConfig(msg)) => assert!(msg.contains("activePool")),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_confirmations_rejected() {
        let json = MAINNET_CONFIG.replace("\"txConfirmations\": 3", "\"txConfirmations\": 0");
        let config = DeployConfig::from_json(&json).unwrap();
        assert!(matches!(config.setup(), Err(ScriptError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_address_rejected() {
        let json = MAINNET_CONFIG.replace("0xBE3dE7fB9Aa09B3Fa931868Fb49d5BA5fEe2eBb1", "0x1234");
        assert!(matches!(
            DeployConfig::from_json(&json),
            Err(ScriptError::ReadConfig(_))
        ));
    }

    #[test]
    fn test_secrets_resolution_order() {
        let secrets = secrets(
            r#"{ "networks": { "arbitrumOne": { "rpcUrl": "https://arb1.example", "privateKey": "0x01" } } }"#,
        );

        // Explicit values win over the file
        let url = secrets
            .rpc_url(Environment::Mainnet, Some("https://override".to_string()))
            .unwrap();
        assert_eq!(url, "https://override");

        // The file is used when nothing is passed explicitly
        let url = secrets.rpc_url(Environment::Mainnet, None).unwrap();
        assert_eq!(url, "https://arb1.example");
        let key = secrets.private_key(Environment::Mainnet, None).unwrap();
        assert_eq!(key, "0x01");

        // Remote networks without secrets are an error
        assert!(matches!(
            secrets.rpc_url(Environment::Testnet, None),
            Err(ScriptError::Secrets(_))
        ));
    }

    #[test]
    fn test_localhost_defaults() {
        let secrets = Secrets::default();

        assert_eq!(
            secrets.rpc_url(Environment::Localhost, None).unwrap(),
            LOCALHOST_RPC_URL
        );
        assert_eq!(
            secrets.private_key(Environment::Localhost, None).unwrap(),
            LOCALHOST_PKEY
        );
    }

    #[test]
    fn test_etherscan_key_required() {
        let secrets = secrets(
            r#"{ "networks": { "arbitrumOne": { "etherscanApiKey": "KEY" }, "arbitrumTestnet": { "etherscanApiKey": "" } } }"#,
        );

        assert_eq!(secrets.etherscan_api_key(Environment::Mainnet).unwrap(), "KEY");
        assert!(secrets.etherscan_api_key(Environment::Testnet).is_err());
        assert!(secrets.etherscan_api_key(Environment::Localhost).is_err());
    }
}
