//! Shared helpers for the operator-facing tooling: subprocess execution and
//! console prompts

use eyre::{eyre, Result};
use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Execute a command with its output streamed to the console, failing on any
/// non-zero exit status
pub fn run_command(mut cmd: Command) -> Result<()> {
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    let status = cmd.status()?;

    if status.success() {
        Ok(())
    } else {
        Err(eyre!("Command failed with status: {}", status))
    }
}

/// Write `prompt` to `writer` and read a single trimmed line from `reader`
pub fn prompt_for_input_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<String> {
    write!(writer, "{}", prompt)?;
    writer.flush()?;

    let mut input = String::new();
    reader.read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Ask a yes/no question, defaulting to "no"
///
/// Only a literal `y` (case-insensitive) counts as approval, so an empty line,
/// `yes`, or a closed stdin all decline.
pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<bool> {
    let answer = prompt_for_input_with(reader, writer, prompt)?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
