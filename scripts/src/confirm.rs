//! The operator confirmation gating mainnet runs

use std::io::{BufRead, Write};

use colored::Colorize;
use tool_utils::confirm_with;
use tracing::warn;

use crate::errors::ScriptError;

/// The question asked before touching mainnet
const MAINNET_PROMPT: &str = "You are about to deploy on the mainnet, is it fine? [y/N]";

/// Ask the operator to approve a mainnet deployment
///
/// Returns `Ok(false)` when the operator declines, in which case the run
/// should stop without sending anything.
pub fn confirm_mainnet<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<bool, ScriptError> {
    let prompt = format!("\n{}\n", MAINNET_PROMPT.yellow());
    let approved =
        confirm_with(reader, writer, &prompt).map_err(|e| ScriptError::Prompt(e.to_string()))?;

    let message = if approved {
        "User approved the deployment".green()
    } else {
        warn!("Mainnet deployment cancelled");
        "User cancelled the deployment!".blue()
    };
    writeln!(writer, "{message}\n").map_err(|e| ScriptError::Prompt(e.to_string()))?;

    Ok(approved)
}
