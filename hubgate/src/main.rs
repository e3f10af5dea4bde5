use std::path::Path;

use clap::Parser;
use hubgate::app_state::AppState;
use hubgate::http::setup_http_server;
use hubgate::init_telemetry;
use hubgate::settings::config::Settings;
use tracing::info;

#[derive(Parser)]
#[command(name = "hubgate")]
#[command(about = "Authentication and authorization gateway for a container registry")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the hubgate server (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_path(Path::new(".env.local")).ok();
    dotenvy::from_path(Path::new(".env")).ok();

    let cli = Cli::parse();
    let settings = Settings::new()?;

    if let Commands::Config = cli.command.as_ref().unwrap_or(&Commands::Run) {
        println!("{:#?}", &settings);
        return Ok(());
    }

    init_telemetry::init_tracing(
        settings.logging.level.as_deref(),
        settings.logging.file.as_deref(),
    )?;

    let app_state = AppState::new(settings).await?;

    let handle =
        setup_http_server(app_state.clone(), &app_state.settings.api.bind_address).await?;
    handle.await??;
    info!("All tasks are done");

    Ok(())
}
