use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use cloudprint::commands::{execute_command, Cli, Context};
use cloudprint::logging;
use cloudprint_auth::{AuthError, FileCredentialStore, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging goes to a file; keep the guard alive so it flushes on exit
    let _logging = logging::init_logging().ok();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::new(),
    }
    .map_err(AuthError::from)?;
    settings.validate()?;

    let store = FileCredentialStore::new(settings.credentials_path.clone());
    let mut ctx = Context::new(settings, store, std::io::stdout());

    execute_command(cli.command, &mut ctx).await
}
