use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        artifacts,
        deployments_dir,
        secrets,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    command.run(&artifacts, &deployments_dir, &secrets).await
}
