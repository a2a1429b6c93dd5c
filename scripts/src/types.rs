//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use clap::ValueEnum;

use crate::constants::{GLP_STAKING_CONTRACT, GMX_STAKING_CONTRACT, PROXY_ADMIN_CONTRACT};

/// The environments the contracts can be deployed to
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    /// A local development node
    Localhost,
    /// The Arbitrum testnet
    Testnet,
    /// Arbitrum One
    Mainnet,
}

impl Environment {
    /// The name under which the network's secrets are stored
    pub fn network_name(&self) -> &'static str {
        match self {
            Environment::Localhost => "localhost",
            Environment::Testnet => "arbitrumTestnet",
            Environment::Mainnet => "arbitrumOne",
        }
    }

    /// The chain name understood by `forge verify-contract`
    pub fn chain_name(&self) -> &'static str {
        match self {
            Environment::Localhost => "anvil",
            Environment::Testnet => "arbitrum-sepolia",
            Environment::Mainnet => "arbitrum",
        }
    }

    /// Whether deploying to this environment requires explicit confirmation
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Environment::Mainnet)
    }

    /// The default deploy config for this environment, inside `config_dir`
    pub fn config_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(format!("{self}.json"))
    }

    /// The deployments file for this environment, inside `deployments_dir`
    pub fn deployments_path(&self, deployments_dir: &Path) -> PathBuf {
        deployments_dir.join(format!("deployments.{self}.json"))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Localhost => write!(f, "localhost"),
            Environment::Testnet => write!(f, "testnet"),
            Environment::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// The deployed contracts that can be verified on a block explorer
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum VerifiableContract {
    /// The GMX staking wrapper implementation
    Gmx,
    /// The GLP staking wrapper implementation
    Glp,
    /// The shared proxy admin
    ProxyAdmin,
}

impl VerifiableContract {
    /// The name of the contract's compiled artifact
    pub fn contract_name(&self) -> &'static str {
        match self {
            VerifiableContract::Gmx => GMX_STAKING_CONTRACT,
            VerifiableContract::Glp => GLP_STAKING_CONTRACT,
            VerifiableContract::ProxyAdmin => PROXY_ADMIN_CONTRACT,
        }
    }
}

impl Display for VerifiableContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contract_name())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Environment;

    #[test]
    fn test_environment_paths() {
        let dir = Path::new("configs");
        assert_eq!(
            Environment::Mainnet.config_path(dir),
            Path::new("configs/mainnet.json")
        );
        assert_eq!(
            Environment::Localhost.deployments_path(Path::new(".")),
            Path::new("./deployments.localhost.json")
        );
    }

    #[test]
    fn test_only_mainnet_requires_confirmation() {
        assert!(Environment::Mainnet.is_mainnet());
        assert!(!Environment::Testnet.is_mainnet());
        assert!(!Environment::Localhost.is_mainnet());
    }
}
