use std::net::ToSocketAddrs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mimalloc::MiMalloc;

use api_ingress::{ApiIngress, ApiIngressConfig};
use attendance::{Attendance, AttendanceConfig};
use runtime::{AppConfig, Overrides};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Lab attendance tracking REST service
#[derive(Parser, Debug)]
#[command(name = "labpresence-server", version)]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen port, replacing server.port and modules.api_ingress.bind_addr
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Dump the effective configuration as YAML and exit
    #[arg(long = "print-config")]
    print_config: bool,

    /// Raise console verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Keep attendance data in memory instead of JSON files
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Start the HTTP server (default)
    Run,
    /// Check the configuration and print the resolved settings
    Check,
    /// Restore the seed attendance data and exit
    Reset,
}

/// Effective configuration plus the flags that shape module construction.
struct Launch {
    config: AppConfig,
    mock: bool,
    port_from_cli: bool,
}

impl Launch {
    fn attendance(&self) -> Result<Attendance> {
        let cfg: AttendanceConfig = self.config.module_config("attendance")?;
        if self.mock {
            tracing::warn!("--mock: attendance data is kept in memory and lost on exit");
            return Attendance::in_memory(cfg);
        }
        Attendance::with_json_storage(cfg, &self.config.home_dir())
    }

    fn ingress_config(&self) -> Result<ApiIngressConfig> {
        let mut cfg: ApiIngressConfig = self.config.module_config("api_ingress")?;
        let server = &self.config.server;

        if self.port_from_cli {
            cfg.bind_addr.clear();
        }
        if server.timeout_sec > 0 {
            cfg.request_timeout = Duration::from_secs(server.timeout_sec);
        }
        Ok(cfg.with_fallback_addr(&server.host, server.port))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(Overrides {
        port: cli.port,
        verbose: cli.verbose,
    });

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    runtime::logging::init_logging_from_config(
        &config.logging.clone().unwrap_or_default(),
        &config.home_dir(),
    );
    tracing::info!(
        home_dir = %config.server.home_dir,
        version = env!("CARGO_PKG_VERSION"),
        "labpresence server starting"
    );

    let launch = Launch {
        config,
        mock: cli.mock,
        port_from_cli: cli.port.is_some(),
    };
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => serve(&launch).await,
        Command::Check => check(&launch),
        Command::Reset => reset(&launch).await,
    }
}

async fn serve(launch: &Launch) -> Result<()> {
    let attendance = launch.attendance()?;
    let seeded = attendance.init().await?;
    if seeded.users_seeded || seeded.logs_seeded {
        tracing::info!(
            users = seeded.users_seeded,
            logs = seeded.logs_seeded,
            "seed data written"
        );
    }

    let ingress = ApiIngress::new(launch.ingress_config()?).with_openapi(attendance.openapi());
    let shutdown = async {
        if let Err(e) = runtime::wait_for_shutdown().await {
            tracing::error!(error = %e, "cannot listen for shutdown signals");
        }
    };
    ingress.serve(attendance.router(), shutdown).await
}

fn check(launch: &Launch) -> Result<()> {
    let home = launch.config.home_dir();
    // module sections are parsed lazily, so force both here
    let attendance: AttendanceConfig = launch.config.module_config("attendance")?;
    let ingress = launch.ingress_config()?;
    ingress
        .bind_addr
        .to_socket_addrs()
        .with_context(|| format!("Invalid bind address '{}'", ingress.bind_addr))?;

    tracing::info!("configuration is valid");
    println!("Configuration check passed");
    println!("Users file:     {}", attendance.users_path(&home).display());
    println!("Logs file:      {}", attendance.logs_path(&home).display());
    println!("Listen address: {}", ingress.bind_addr);
    println!("Reset endpoint: {}", if attendance.enable_reset { "enabled" } else { "disabled" });
    print!("{}", launch.config.to_yaml()?);
    Ok(())
}

async fn reset(launch: &Launch) -> Result<()> {
    launch
        .attendance()?
        .client()
        .reset()
        .await
        .context("Failed to reset attendance data")?;

    tracing::info!("attendance data reset");
    println!("Attendance data reset to seed");
    Ok(())
}
