//! Loading of compiled contract artifacts
//!
//! Compilation happens outside of these scripts; we only read the JSON
//! artifacts the Solidity toolchain leaves behind. Both the Hardhat layout
//! (`"bytecode": "0x…"`) and the Foundry layout
//! (`"bytecode": { "object": "0x…" }`) are accepted.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{keccak256, Bytes, B256};
use serde::Deserialize;

use crate::errors::ScriptError;

/// The extension of an artifact file
const ARTIFACT_EXTENSION: &str = "json";

/// The subset of an artifact file the scripts care about
#[derive(Deserialize)]
struct RawArtifact {
    /// The contract's creation bytecode
    bytecode: RawBytecode,
}

/// The creation bytecode in either supported layout
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat stores the bytecode as a hex string
    Hardhat(Bytes),
    /// Foundry nests it under `object`
    Foundry {
        /// The hex-encoded bytecode
        object: Bytes,
    },
}

/// A compiled contract
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The contract name
    pub name: String,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(name: &str, contents: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;

        let bytecode = match raw.bytecode {
            RawBytecode::Hardhat(bytes) | RawBytecode::Foundry { object: bytes } => bytes,
        };

        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name} has no bytecode, is it abstract or an interface?"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            bytecode,
        })
    }

    /// The keccak256 hash of the creation bytecode
    pub fn bytecode_hash(&self) -> B256 {
        keccak256(&self.bytecode)
    }

    /// The creation bytecode followed by the ABI-encoded constructor arguments
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

/// Looks up artifacts by contract name beneath a root directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts tree
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find and parse the artifact of the contract `name`
    ///
    /// Fails when no artifact or more than one artifact carries that name, e.g.
    /// a library contract shadowed by a mock of the same name.
    pub fn load(&self, name: &str) -> Result<Artifact, ScriptError> {
        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        let mut matches = Vec::new();
        find_files(&self.root, &file_name, &mut matches)?;
        // Directory order is platform dependent
        matches.sort();

        let path = match matches.as_slice() {
            [] => {
                return Err(ScriptError::ArtifactParsing(format!(
                    "could not find {file_name} under {}",
                    self.root.display()
                )))
            }
            [path] => path,
            paths => {
                let paths: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
                return Err(ScriptError::ArtifactParsing(format!(
                    "{name} is ambiguous, found {}",
                    paths.join(", ")
                )));
            }
        };

        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        Artifact::from_json(name, &contents)
    }
}

/// Recursively collect every file called `file_name` beneath `dir`
fn find_files(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .path();

        if path.is_dir() {
            find_files(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|f| f == file_name) {
            found.push(path);
        }
    }

    Ok(())
}
