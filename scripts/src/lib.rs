//! Scripts for deploying and configuring the Vesta GMX / GLP staking wrappers.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
mod commands;
pub mod config;
mod confirm;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod solidity;
pub mod types;
pub mod utils;
