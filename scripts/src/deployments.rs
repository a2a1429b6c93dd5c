//! Utilities for reading and writing deployed addresses in a JSON file
//!
//! The file is a flat object, e.g.
//! `{ "ProxyAdmin": "0x…", "VestaGMXStaking": "0x…", "VestaGMXStakingImplementation": "0x…" }`

use std::{
    collections::BTreeMap,
    fmt::{Display, LowerHex},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::{Address, B256};

use crate::{
    constants::{IMPLEMENTATION_HASH_KEY_SUFFIX, IMPLEMENTATION_KEY_SUFFIX},
    errors::ScriptError,
};

/// A handle to the deployments file of one environment
#[derive(Debug, Clone)]
pub struct Deployments {
    /// The path of the deployments file
    path: PathBuf,
}

impl Deployments {
    /// Create a handle for the deployments file at `path`, which need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the deployments file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry of the deployments file, empty if it does not exist
    fn read_all(&self) -> Result<BTreeMap<String, String>, ScriptError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ScriptError::ReadDeployments(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
    }

    /// Read and parse the value stored under `key`, if any
    fn read<T>(&self, key: &str) -> Result<Option<T>, ScriptError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.read_all()?.get(key) {
            Some(value) => T::from_str(value).map(Some).map_err(|e| {
                ScriptError::ReadDeployments(format!("failed to parse {key} ({value}): {e}"))
            }),
            None => Ok(None),
        }
    }

    /// Read the address stored under `key`, if any
    pub fn read_address(&self, key: &str) -> Result<Option<Address>, ScriptError> {
        self.read(key)
    }

    /// Read the hash stored under `key`, if any
    pub fn read_hash(&self, key: &str) -> Result<Option<B256>, ScriptError> {
        self.read(key)
    }

    /// Store `value` under `key`, creating the file if needed and preserving
    /// all other entries
    pub fn write(&self, key: &str, value: impl LowerHex) -> Result<(), ScriptError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), format!("{value:#x}"));

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        fs::write(&self.path, content)
            .map_err(|e| ScriptError::WriteDeployments(format!("{}: {}", self.path.display(), e)))
    }

    /// Read the recorded state of the upgradeable contract `name`
    pub fn read_proxy_record(&self, name: &str) -> Result<Option<ProxyRecord>, ScriptError> {
        let proxy = match self.read_address(name)? {
            Some(proxy) => proxy,
            None => return Ok(None),
        };

        Ok(Some(ProxyRecord {
            proxy,
            implementation: self.read_address(&implementation_key(name))?,
            implementation_hash: self.read_hash(&implementation_hash_key(name))?,
        }))
    }

    /// Record the implementation of the upgradeable contract `name`
    pub fn write_implementation(
        &self,
        name: &str,
        implementation: Address,
        bytecode_hash: B256,
    ) -> Result<(), ScriptError> {
        self.write(&implementation_key(name), implementation)?;
        self.write(&implementation_hash_key(name), bytecode_hash)
    }
}

/// The recorded state of an upgradeable contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyRecord {
    /// The proxy address, which is the contract's public address
    pub proxy: Address,
    /// The current implementation address
    pub implementation: Option<Address>,
    /// The hash of the creation bytecode the implementation was deployed from
    pub implementation_hash: Option<B256>,
}

/// The deployments key of a contract's implementation address
pub fn implementation_key(name: &str) -> String {
    format!("{name}{IMPLEMENTATION_KEY_SUFFIX}")
}

/// The deployments key of a contract's implementation bytecode hash
pub fn implementation_hash_key(name: &str) -> String {
    format!("{name}{IMPLEMENTATION_HASH_KEY_SUFFIX}")
}
