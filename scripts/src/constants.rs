//! Constants used in the deploy scripts

/// The name of the GMX staking wrapper contract
pub const GMX_STAKING_CONTRACT: &str = "VestaGMXStaking";

/// The name of the GLP staking wrapper contract
pub const GLP_STAKING_CONTRACT: &str = "VestaGLPStaking";

/// The name of the shared proxy admin contract
pub const PROXY_ADMIN_CONTRACT: &str = "ProxyAdmin";

/// The name of the transparent upgradeable proxy contract
pub const PROXY_CONTRACT: &str = "TransparentUpgradeableProxy";

/// Suffix of the deployments key holding a contract's implementation address
pub const IMPLEMENTATION_KEY_SUFFIX: &str = "Implementation";

/// Suffix of the deployments key holding the hash of the bytecode an
/// implementation was deployed from
pub const IMPLEMENTATION_HASH_KEY_SUFFIX: &str = "ImplementationHash";

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: &str =
    "0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103";

/// The storage slot containing the implementation address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The default directory containing the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "hardhat/artifacts";

/// The default directory containing the per-environment deploy configs
pub const DEFAULT_CONFIG_DIR: &str = "configs";

/// The default path of the secrets file
pub const DEFAULT_SECRETS_PATH: &str = "secrets.json";

/// The RPC URL of a local development node
pub const LOCALHOST_RPC_URL: &str = "http://localhost:8545";

/// The private key of the first default account in an Anvil / Hardhat node
pub const LOCALHOST_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The name of the `forge` command
pub const FORGE_COMMAND: &str = "forge";

/// The name of the `forge` contract verification subcommand
pub const VERIFY_CONTRACT_COMMAND: &str = "verify-contract";
