//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::{Ethereum, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    sol_types::SolValue,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{
    constants::{NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT},
    errors::ScriptError,
};

/// The RPC client used by the scripts, with the deployer's key attached
pub type Client = DynProvider<Ethereum>;

/// The call builder type produced by contract instances bound to a [`Client`]
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a Client, C, Ethereum>;

/// Sets up a client signing with `priv_key` against the node at `rpc_url`,
/// returning it along with the address it sends from
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<(Client, Address), ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    info!("Connected to chain {chain_id} as {deployer:#x}");
    Ok((DynProvider::new(provider), deployer))
}

// ----------------
// | Transactions |
// ----------------

/// Send a contract call and wait for it to be confirmed `confirmations` times
pub async fn send_tx<C: CallDecoder>(
    tx: ScriptCallBuilder<'_, C>,
    confirmations: u64,
) -> Result<TransactionReceipt, ScriptError> {
    let pending_tx = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    wait_for_receipt(pending_tx, confirmations, ScriptError::ContractInteraction).await
}

/// Deploy `code` (creation bytecode with constructor arguments appended) and
/// return the address of the new contract
pub async fn deploy_code(
    client: &Client,
    code: Bytes,
    confirmations: u64,
) -> Result<Address, ScriptError> {
    let tx = TransactionRequest::default().with_deploy_code(code);
    let pending_tx = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    let receipt =
        wait_for_receipt(pending_tx, confirmations, ScriptError::ContractDeployment).await?;

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "receipt of {:#x} has no contract address",
            receipt.transaction_hash
        ))
    })
}

/// Wait for a pending transaction and ensure it did not revert
///
/// Transport failures are wrapped with `wrap_err`.
async fn wait_for_receipt(
    pending_tx: PendingTransactionBuilder<Ethereum>,
    confirmations: u64,
    wrap_err: fn(String) -> ScriptError,
) -> Result<TransactionReceipt, ScriptError> {
    let tx_hash = *pending_tx.tx_hash();
    info!("Waiting for {tx_hash:#x} ({confirmations} confirmations)");

    let receipt = pending_tx
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| wrap_err(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::TransactionReverted(format!("{tx_hash:#x}")));
    }

    Ok(receipt)
}

// ---------------
// | Chain Reads |
// ---------------

/// Whether a contract is deployed at `address`
pub async fn has_code(client: &Client, address: Address) -> Result<bool, ScriptError> {
    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(!code.is_empty())
}

/// Read an address stored in the given storage slot of `contract`
pub async fn read_address_slot(
    client: &Client,
    contract: Address,
    slot: &str,
) -> Result<Address, ScriptError> {
    // The slots are compile-time constants, so a parse failure is a programming error
    let slot = U256::from_str(slot).map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let word = client
        .get_storage_at(contract, slot)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(word_to_address(word))
}

/// Interpret a storage word as an address, which occupies its low-order bytes
pub fn word_to_address(word: U256) -> Address {
    let bytes: [u8; NUM_BYTES_STORAGE_SLOT] = word.to_be_bytes();
    Address::from_slice(&bytes[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..])
}

// ------------
// | Calldata |
// ------------

/// ABI-encode the constructor arguments of a `TransparentUpgradeableProxy`
pub fn proxy_constructor_args(
    implementation: Address,
    proxy_admin: Address,
    init_calldata: Bytes,
) -> Vec<u8> {
    (implementation, proxy_admin, init_calldata).abi_encode_params()
}
