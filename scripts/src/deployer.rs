//! Deployment and ownership wiring of the staking wrappers
//!
//! A run is a flat sequence of awaited transactions. Every step reads the
//! on-chain state first and only sends a transaction when that state differs
//! from the configuration, so re-running a completed deployment is a no-op.

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, B256},
    sol_types::SolCall,
};
use tracing::{info, warn};

use crate::{
    artifacts::ArtifactStore,
    config::{DeployConfig, Setup},
    constants::{
        GLP_STAKING_CONTRACT, GMX_STAKING_CONTRACT, PROXY_ADMIN_CONTRACT,
        PROXY_ADMIN_STORAGE_SLOT, PROXY_CONTRACT, PROXY_IMPLEMENTATION_STORAGE_SLOT,
    },
    deployments::{Deployments, ProxyRecord},
    errors::ScriptError,
    solidity::{
        IProxyAdmin::{self, IProxyAdminInstance},
        IVestaGLPStaking, IVestaGMXStaking,
        IVestaStaking::{self, IVestaStakingInstance},
    },
    utils::{
        deploy_code, has_code, proxy_constructor_args, read_address_slot, send_tx, Client,
    },
};

/// A staking wrapper bound to the deploy client
type StakingContract = IVestaStakingInstance<Client, Ethereum>;
/// The proxy admin bound to the deploy client
type ProxyAdminContract = IProxyAdminInstance<Client, Ethereum>;

/// What to do with an upgradeable contract given its recorded state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    /// Deploy a fresh implementation and proxy
    Deploy,
    /// The proxy at this address already runs the current bytecode
    Reuse(Address),
    /// Deploy a new implementation and point the proxy at this address to it
    Upgrade(Address),
}

/// Decide how to bring an upgradeable contract up to date
///
/// A record whose proxy has no code (e.g. a restarted development node) is
/// treated as absent. A record without a bytecode hash cannot be compared and
/// is upgraded.
pub fn plan_deployment(
    record: Option<&ProxyRecord>,
    proxy_has_code: bool,
    bytecode_hash: B256,
) -> DeployAction {
    match record {
        Some(record) if proxy_has_code => {
            if record.implementation_hash == Some(bytecode_hash) {
                DeployAction::Reuse(record.proxy)
            } else {
                DeployAction::Upgrade(record.proxy)
            }
        }
        _ => DeployAction::Deploy,
    }
}

/// Calldata of the GMX staking wrapper's initializer
pub fn gmx_staking_setup_calldata(setup: &Setup) -> Bytes {
    IVestaGMXStaking::setUpCall {
        vestaTreasury: setup.general.vesta_treasury,
        gmxToken: setup.gmx_staking.gmx_token,
        gmxRewardRouterV2: setup.general.gmx_reward_router_v2,
        stakedGmxTracker: setup.gmx_staking.staked_gmx_tracker,
        feeGmxTrackerRewards: setup.gmx_staking.fee_gmx_tracker_rewards,
    }
    .abi_encode()
    .into()
}

/// Calldata of the GLP staking wrapper's initializer
pub fn glp_staking_setup_calldata(setup: &Setup) -> Bytes {
    IVestaGLPStaking::setUpCall {
        vestaTreasury: setup.general.vesta_treasury,
        sGLP: setup.glp_staking.s_glp,
        gmxRewardRouterV2: setup.general.gmx_reward_router_v2,
        feeGlpTrackerRewards: setup.glp_staking.fee_glp_tracker_rewards,
    }
    .abi_encode()
    .into()
}

/// Deploys the staking wrappers and hands them over to the admin wallet
pub struct Deployer {
    /// The client transactions are sent from
    client: Client,
    /// The account the client signs with
    sender: Address,
    /// The validated addresses to configure the contracts with
    setup: Setup,
    /// The number of confirmations to wait for on every transaction
    confirmations: u64,
    /// The record of what has been deployed in this environment
    deployments: Deployments,
    /// The compiled contracts
    artifacts: ArtifactStore,
}

impl Deployer {
    /// Create a deployer, failing if the config has no valid setup
    pub fn new(
        config: &DeployConfig,
        client: Client,
        sender: Address,
        deployments: Deployments,
        artifacts: ArtifactStore,
    ) -> Result<Self, ScriptError> {
        let setup = config.setup()?.clone();

        Ok(Self {
            client,
            sender,
            setup,
            confirmations: config.tx_confirmations,
            deployments,
            artifacts,
        })
    }

    /// Run the full deployment
    pub async fn run(&self) -> Result<(), ScriptError> {
        self.gmx_staking().await?;
        self.glp_staking().await?;
        self.ensure_proxy_admin_owner().await
    }

    /// Deploy and configure the GMX staking wrapper
    async fn gmx_staking(&self) -> Result<(), ScriptError> {
        let calldata = gmx_staking_setup_calldata(&self.setup);
        let address = self.deploy_upgradeable(GMX_STAKING_CONTRACT, calldata).await?;
        self.configure_staking(GMX_STAKING_CONTRACT, address).await
    }

    /// Deploy and configure the GLP staking wrapper
    async fn glp_staking(&self) -> Result<(), ScriptError> {
        let calldata = glp_staking_setup_calldata(&self.setup);
        let address = self.deploy_upgradeable(GLP_STAKING_CONTRACT, calldata).await?;
        self.configure_staking(GLP_STAKING_CONTRACT, address).await
    }

    /// Enable the active pool as an operator, then hand the contract over
    async fn configure_staking(&self, name: &str, address: Address) -> Result<(), ScriptError> {
        let contract = IVestaStaking::new(address, self.client.clone());
        self.ensure_operator(name, &contract).await?;
        self.try_give_ownership(name, &contract).await
    }

    // ---------------
    // | Permissions |
    // ---------------

    /// Enable the active pool as an operator of `contract` if it is not already
    async fn ensure_operator(
        &self,
        name: &str,
        contract: &StakingContract,
    ) -> Result<(), ScriptError> {
        let active_pool = self.setup.general.active_pool;
        let is_operator = contract
            .isOperator(active_pool)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if is_operator {
            info!("{active_pool:#x} is already an operator of {name}");
            return Ok(());
        }

        info!("Setting {active_pool:#x} as an operator of {name}");
        send_tx(contract.setOperator(active_pool, true), self.confirmations).await?;
        Ok(())
    }

    /// Transfer ownership of `contract` to the admin wallet if it does not
    /// already own it
    async fn try_give_ownership(
        &self,
        name: &str,
        contract: &StakingContract,
    ) -> Result<(), ScriptError> {
        let admin_wallet = self.setup.general.admin_wallet;
        let owner = contract
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if owner == admin_wallet {
            info!("{name} is already owned by {admin_wallet:#x}");
            return Ok(());
        }

        info!("Transferring ownership of {name} from {owner:#x} to {admin_wallet:#x}");
        send_tx(contract.transferOwnership(admin_wallet), self.confirmations).await?;
        Ok(())
    }

    /// Transfer ownership of the proxy admin to the admin wallet if it does
    /// not already own it
    async fn ensure_proxy_admin_owner(&self) -> Result<(), ScriptError> {
        let admin_wallet = self.setup.general.admin_wallet;
        let proxy_admin = self.proxy_admin_contract(self.ensure_proxy_admin().await?);
        let owner = proxy_admin
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if owner == admin_wallet {
            info!("{PROXY_ADMIN_CONTRACT} is already owned by {admin_wallet:#x}");
            return Ok(());
        }

        info!("Transferring ownership of {PROXY_ADMIN_CONTRACT} to {admin_wallet:#x}");
        send_tx(proxy_admin.transferOwnership(admin_wallet), self.confirmations).await?;
        Ok(())
    }

    // ---------------
    // | Deployments |
    // ---------------

    /// Deploy the upgradeable contract `name` behind a proxy, upgrade it if
    /// its bytecode changed since the last run, or reuse it as is
    ///
    /// `init_calldata` is only used on a fresh deployment, where the proxy
    /// calls it on the implementation during construction.
    async fn deploy_upgradeable(
        &self,
        name: &str,
        init_calldata: Bytes,
    ) -> Result<Address, ScriptError> {
        let proxy_admin = self.ensure_proxy_admin().await?;
        let artifact = self.artifacts.load(name)?;
        let bytecode_hash = artifact.bytecode_hash();

        let record = self.deployments.read_proxy_record(name)?;
        let proxy_has_code = match &record {
            Some(record) => has_code(&self.client, record.proxy).await?,
            None => false,
        };
        if let (Some(record), false) = (&record, proxy_has_code) {
            warn!(
                "Recorded {name} proxy at {:#x} has no code, deploying a new one",
                record.proxy
            );
        }

        match plan_deployment(record.as_ref(), proxy_has_code, bytecode_hash) {
            DeployAction::Reuse(proxy) => {
                self.check_implementation(name, proxy, record.and_then(|r| r.implementation))
                    .await?;
                info!("{name} is up to date at {proxy:#x}");
                Ok(proxy)
            }
            DeployAction::Upgrade(proxy) => {
                self.check_proxy_admin(name, proxy, proxy_admin).await?;
                self.check_upgrade_authority(proxy_admin).await?;

                info!("Deploying new {name} implementation");
                let implementation =
                    deploy_code(&self.client, artifact.bytecode.clone(), self.confirmations)
                        .await?;

                info!("Upgrading {name} at {proxy:#x} to {implementation:#x}");
                let admin = self.proxy_admin_contract(proxy_admin);
                send_tx(admin.upgrade(proxy, implementation), self.confirmations).await?;

                self.deployments
                    .write_implementation(name, implementation, bytecode_hash)?;
                Ok(proxy)
            }
            DeployAction::Deploy => {
                info!("Deploying {name} implementation");
                let implementation =
                    deploy_code(&self.client, artifact.bytecode.clone(), self.confirmations)
                        .await?;

                info!("Deploying {name} proxy");
                let proxy_artifact = self.artifacts.load(PROXY_CONTRACT)?;
                let args = proxy_constructor_args(implementation, proxy_admin, init_calldata);
                let proxy = deploy_code(
                    &self.client,
                    proxy_artifact.deploy_code(&args),
                    self.confirmations,
                )
                .await?;

                self.deployments.write(name, proxy)?;
                self.deployments
                    .write_implementation(name, implementation, bytecode_hash)?;
                info!("{name} deployed at {proxy:#x} (implementation {implementation:#x})");
                Ok(proxy)
            }
        }
    }

    /// Get the address of the shared proxy admin, deploying it if the
    /// recorded one is missing or has no code
    async fn ensure_proxy_admin(&self) -> Result<Address, ScriptError> {
        if let Some(address) = self.deployments.read_address(PROXY_ADMIN_CONTRACT)? {
            if has_code(&self.client, address).await? {
                return Ok(address);
            }
            warn!("Recorded {PROXY_ADMIN_CONTRACT} at {address:#x} has no code, redeploying");
        }

        let artifact = self.artifacts.load(PROXY_ADMIN_CONTRACT)?;
        let address = deploy_code(&self.client, artifact.bytecode, self.confirmations).await?;
        self.deployments.write(PROXY_ADMIN_CONTRACT, address)?;

        info!("{PROXY_ADMIN_CONTRACT} deployed at {address:#x}");
        Ok(address)
    }

    /// Ensure `proxy` is administered by `proxy_admin`, otherwise an upgrade
    /// through it would revert
    async fn check_proxy_admin(
        &self,
        name: &str,
        proxy: Address,
        proxy_admin: Address,
    ) -> Result<(), ScriptError> {
        let actual = read_address_slot(&self.client, proxy, PROXY_ADMIN_STORAGE_SLOT).await?;
        if actual != proxy_admin {
            return Err(ScriptError::ContractInteraction(format!(
                "{name} proxy at {proxy:#x} is administered by {actual:#x}, not {proxy_admin:#x}"
            )));
        }

        Ok(())
    }

    /// Ensure the sender owns `proxy_admin`, before any gas is spent on a new
    /// implementation the upgrade could not install
    async fn check_upgrade_authority(&self, proxy_admin: Address) -> Result<(), ScriptError> {
        let owner = self
            .proxy_admin_contract(proxy_admin)
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if owner != self.sender {
            return Err(ScriptError::ContractInteraction(format!(
                "{PROXY_ADMIN_CONTRACT} at {proxy_admin:#x} is owned by {owner:#x}, \
                 upgrades must be sent from that account instead of {:#x}",
                self.sender
            )));
        }

        Ok(())
    }

    /// Warn when the implementation behind `proxy` is not the recorded one,
    /// e.g. after an upgrade performed outside of these scripts
    async fn check_implementation(
        &self,
        name: &str,
        proxy: Address,
        recorded: Option<Address>,
    ) -> Result<(), ScriptError> {
        let actual =
            read_address_slot(&self.client, proxy, PROXY_IMPLEMENTATION_STORAGE_SLOT).await?;
        if recorded != Some(actual) {
            warn!(
                "{name} proxy at {proxy:#x} points to {actual:#x}, recorded implementation is {}",
                recorded.map_or("unknown".to_string(), |r| format!("{r:#x}"))
            );
        }

        Ok(())
    }

    /// Bind the proxy admin at `address` to the deploy client
    fn proxy_admin_contract(&self, address: Address) -> ProxyAdminContract {
        IProxyAdmin::new(address, self.client.clone())
    }
}
