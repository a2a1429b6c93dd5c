//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading or parsing a deployment config file
    ReadConfig(String),
    /// The deployment config does not carry a `setup` record
    MissingSetup,
    /// The deployment config failed validation
    InvalidConfig(String),
    /// Error reading the secrets file, or a required secret is absent
    Secrets(String),
    /// Error locating or parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was mined but reverted
    TransactionReverted(String),
    /// Error reading the operator's answer to a prompt
    Prompt(String),
    /// Error running an external command
    CommandExecution(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadConfig(s) => write!(f, "error reading config: {}", s),
            ScriptError::MissingSetup => write!(f, "Setup not configured"),
            ScriptError::InvalidConfig(s) => write!(f, "invalid config: {}", s),
            ScriptError::Secrets(s) => write!(f, "error reading secrets: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::TransactionReverted(s) => write!(f, "transaction reverted: {}", s),
            ScriptError::Prompt(s) => write!(f, "error reading prompt answer: {}", s),
            ScriptError::CommandExecution(s) => write!(f, "error running command: {}", s),
        }
    }
}

impl Error for ScriptError {}
