mod cli;
mod commands;
mod context;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use context::Backend;
use hubgate::init_telemetry;
use hubgate_core::exit_status::ExitStatus;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::from_path(Path::new(".env.local")).ok();
    dotenvy::from_path(Path::new(".env")).ok();

    let cli = Cli::parse();

    if let Err(e) = init_telemetry::init_tracing(None, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitStatus::Failure.into();
    }

    let status = match run(&cli).await {
        Ok(status) => status,
        Err(e) => {
            error!("{:?} failed: {:#}", cli.command, e);
            ExitStatus::Failure
        }
    };

    info!("{:?} finished with exit code {}", cli.command, status.code());
    status.into()
}

async fn run(cli: &Cli) -> anyhow::Result<ExitStatus> {
    let backend = Backend::from_server(cli.server.as_deref())?;
    if let Backend::Remote(server) = &backend {
        info!("Remote exec id {}", server.exec_id());
    }

    match cli.command {
        Commands::Authn => {
            let mut stdout = std::io::stdout();
            commands::authn::run_authn(&backend, tokio::io::stdin(), &mut stdout).await
        }
        Commands::Authz => commands::authz::run_authz(&backend, tokio::io::stdin()).await,
    }
}
