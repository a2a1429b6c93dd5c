//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    /// The ownership and operator surface shared by both staking wrappers
    #[sol(rpc)]
    interface IVestaStaking {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
        function isOperator(address operator) external view returns (bool);
        function setOperator(address operator, bool enabled) external;
    }

    /// The initializer of the GMX staking wrapper
    interface IVestaGMXStaking {
        function setUp(
            address vestaTreasury,
            address gmxToken,
            address gmxRewardRouterV2,
            address stakedGmxTracker,
            address feeGmxTrackerRewards
        ) external;
    }

    /// The initializer of the GLP staking wrapper
    interface IVestaGLPStaking {
        function setUp(
            address vestaTreasury,
            address sGLP,
            address gmxRewardRouterV2,
            address feeGlpTrackerRewards
        ) external;
    }

    /// The OpenZeppelin 4.x `ProxyAdmin` shared by every proxy of a network
    #[sol(rpc)]
    interface IProxyAdmin {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
        function upgrade(address proxy, address implementation) external;
    }
}
