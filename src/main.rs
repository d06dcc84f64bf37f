use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use metro_tickets::infrastructure::proxy::{self, ProxyState};
use metro_tickets::infrastructure::{AppConfig, CliArgs, Command, StorageManager};
use metro_tickets::presentation::App;

fn init_logging(config: &AppConfig, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
        return Ok(());
    }

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    let command = args.command();

    init_logging(&config, matches!(command, Command::Proxy { .. }))?;
    info!(
        version = metro_tickets::VERSION,
        environment = %config.environment,
        backend = %config.api.base_url,
        "Starting {}",
        metro_tickets::NAME
    );

    match command {
        Command::Shell => App::from_config(&config)?.run().await,
        Command::Proxy { .. } => {
            let state = ProxyState::from_config(&config)?;
            proxy::serve(config.proxy.bind, state, shutdown_signal()).await?;
            Ok(())
        }
    }
}
