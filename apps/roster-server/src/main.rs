use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs, ConfigProvider};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use api_ingress::{ApiIngress, ApiIngressConfig};
use users_info::config::UsersInfoConfig;
use users_info::UsersInfo;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USERS_INFO: &str = "users_info";
const API_INGRESS: &str = "api_ingress";

/// Roster Server - user records with photos, served as HTML and JSON
#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster Server - user records with photos, served as HTML and JSON")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Roster Server starting");

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let home_dir = config.home_dir();
    let users_cfg: UsersInfoConfig = config.module_config(USERS_INFO);
    let mut ingress_cfg: ApiIngressConfig = config.module_config(API_INGRESS);

    ensure_upload_headroom(&mut ingress_cfg, users_cfg.max_upload_mb);

    let users = UsersInfo::init(users_cfg, &home_dir)?;
    tracing::info!(
        data_file = %users.data_file().display(),
        images_dir = %users.images_dir().display(),
        "users_info ready"
    );

    let ingress = ApiIngress::new(ingress_cfg);
    let addr = ingress.bind_addr(&config.server.host, config.server.port)?;
    let router = ingress.build_router(users.router()?);

    ingress
        .serve(addr, router, async {
            if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "Signal handler failed, shutting down");
            }
        })
        .await?;

    tracing::info!("Roster Server stopped");
    Ok(())
}

/// Multipart framing needs headroom above the largest accepted photo.
fn ensure_upload_headroom(ingress_cfg: &mut ApiIngressConfig, max_upload_mb: usize) {
    let min_body_mb = max_upload_mb.saturating_add(1);
    if ingress_cfg.body_limit_mb < min_body_mb {
        tracing::warn!(
            "api_ingress.body_limit_mb={} is below users_info.max_upload_mb; raising to {}",
            ingress_cfg.body_limit_mb,
            min_body_mb
        );
        ingress_cfg.body_limit_mb = min_body_mb;
    }
}

/// Strictly parse a module section; unknown keys are errors here.
fn check_module<T: DeserializeOwned>(provider: &dyn ConfigProvider, name: &str) -> Result<()> {
    if let Some(raw) = provider.get_module_config(name) {
        serde_json::from_value::<T>(raw.clone())
            .with_context(|| format!("Invalid config for module '{name}'"))?;
    }
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let provider = AppConfigProvider::new(config);
    check_module::<UsersInfoConfig>(&provider, USERS_INFO)?;
    check_module::<ApiIngressConfig>(&provider, API_INGRESS)?;

    let config = provider.config();
    let ingress = ApiIngress::new(config.module_config(API_INGRESS));
    let addr = ingress.bind_addr(&config.server.host, config.server.port)?;

    // AppConfig::load_* already normalized & created home_dir
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Listen address: {addr}");
    println!("Home directory: {}", config.home_dir().display());
    Ok(())
}
