//! svcwatch entry point
//!
//! Loads the configuration, then either validates it (`test`), runs a
//! single sweep and writes a validation report (`check`), or monitors
//! continuously while serving the status API (default).

mod cli;
mod observability;

use clap::Parser;
use observability::init_observability;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use svcwatch::report::ValidationReport;
use svcwatch::service::{HttpServer, create_router};
use svcwatch::{Error, Monitor, Result, Scheduler, SvcwatchConfig};
use tokio::sync::broadcast;

use tracing::{error, info, warn};

macro_rules! bootstrap_info {
    ($($arg:tt)*) => {
        println!($($arg)*);
    };
}

macro_rules! bootstrap_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

use cli::{Cli, Commands};

/// Application launcher utilities
struct ApplicationLauncher;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Test { config_file }) => {
            let config_path =
                ApplicationLauncher::find_config_file(config_file.as_ref().unwrap_or(&cli.config))?;
            ApplicationLauncher::test_config_file(&config_path)
        }
        Some(Commands::Check {
            config_file,
            output,
        }) => {
            let config_path =
                ApplicationLauncher::find_config_file(config_file.as_ref().unwrap_or(&cli.config))?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(ApplicationLauncher::run_check(
                &config_path,
                output.as_deref(),
            ))
        }
        None => {
            let config_path = ApplicationLauncher::find_config_file(&cli.config)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(ApplicationLauncher::run_application(&config_path))
        }
    }
}

impl ApplicationLauncher {
    /// Find config file with fallback locations
    fn find_config_file(provided_path: &PathBuf) -> Result<PathBuf> {
        // An explicit path must exist; only the default name triggers the search
        if provided_path != Path::new("config.toml") {
            if provided_path.exists() {
                bootstrap_info!("Using provided config file: {:?}", provided_path);
                return Ok(provided_path.clone());
            } else {
                bootstrap_error!("Provided config file not found: {:?}", provided_path);
                return Err(Error::custom(format!(
                    "Config file not found: {provided_path:?}"
                )));
            }
        }

        let fallback_paths = vec![
            PathBuf::from("config.toml"),
            PathBuf::from("/etc/svcwatch/config.toml"),
        ];

        bootstrap_info!("Searching for config file in default locations...");

        for path in &fallback_paths {
            if path.exists() {
                bootstrap_info!("Found config file: {:?}", path);
                return Ok(path.clone());
            } else {
                bootstrap_info!("Config not found at: {:?}", path);
            }
        }

        bootstrap_error!("No configuration file found!");
        bootstrap_error!("Please create a config file in one of these locations:");
        for (i, path) in fallback_paths.iter().enumerate() {
            bootstrap_error!("  {}. {:?}", i + 1, path);
        }
        bootstrap_error!("Or specify a custom path with: svcwatch --config <path>");

        Err(Error::custom(
            "No configuration file found. Please create one or specify path with --config",
        ))
    }

    /// Parse and validate a configuration file without starting anything
    fn test_config_file(config_path: &Path) -> Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();

        match SvcwatchConfig::from_file(config_path) {
            Ok(config) => {
                info!("Configuration parsed: {:?}", config_path);

                if let Err(errors) = config.validate() {
                    error!("Configuration validation found problems:");
                    for (i, err) in errors.iter().enumerate() {
                        if err.starts_with("Warning:") {
                            info!("  {}. {}", i + 1, err);
                        } else {
                            error!("  {}. {}", i + 1, err);
                        }
                    }
                    if errors.iter().any(|e| !e.starts_with("Warning:")) {
                        return Err(Error::service_validation("configuration is invalid"));
                    }
                }

                info!(
                    "Configuration valid: {} services, sweep every {}s",
                    config.services.len(),
                    config.monitor.interval_secs
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to parse configuration: {}", e);
                Err(Error::service_validation(format!(
                    "configuration parse failed: {e}"
                )))
            }
        }
    }

    /// Load and validate configuration, printing problems before logging is up
    fn load_config(config_path: &Path) -> Result<SvcwatchConfig> {
        bootstrap_info!("Loading configuration: {:?}", config_path);

        let config = SvcwatchConfig::from_file(config_path).map_err(|e| {
            bootstrap_error!("Failed to load configuration: {}", e);
            e
        })?;

        if let Err(errors) = config.validate() {
            bootstrap_error!("Configuration validation found problems:");
            let mut has_critical_errors = false;
            for (i, err) in errors.iter().enumerate() {
                if err.starts_with("Warning:") {
                    bootstrap_info!("  {}. {}", i + 1, err);
                } else {
                    bootstrap_error!("  {}. {}", i + 1, err);
                    has_critical_errors = true;
                }
            }
            if has_critical_errors {
                return Err(Error::custom(
                    "Configuration validation failed, fix the errors above",
                ));
            }
        }

        Ok(config)
    }

    /// One sweep, one report; fails unless every service passed
    async fn run_check(config_path: &Path, output: Option<&Path>) -> Result<()> {
        let config = Self::load_config(config_path)?;
        let _observability_guard = init_observability(&config)?;

        let monitor = Monitor::from_config(&config)?;
        info!(
            "Running validation sweep over {} services on {}",
            monitor.registry().len(),
            config.monitor.host
        );

        let results = monitor.run_one_sweep().await;
        let report = ValidationReport::build(monitor.registry(), &results, chrono::Utc::now());

        let dir = output.unwrap_or(config.report.dir.as_path());
        let path = report.write_to(dir)?;

        let summary = &report.summary;
        bootstrap_info!("=== VALIDATION RESULTS ===");
        bootstrap_info!("Services tested:  {}", summary.services_tested);
        bootstrap_info!("Services passing: {}", summary.services_passing);
        bootstrap_info!("Services failing: {}", summary.services_failing);
        bootstrap_info!("Success rate:     {}", summary.success_rate);
        bootstrap_info!("Report saved to:  {}", path.display());

        if report.is_pass() {
            return Ok(());
        }

        for name in report.failing_services() {
            if let Some(result) = report.results.get(name) {
                bootstrap_error!("  - {} ({}): {}", name, result.status, result.detail);
            }
        }
        Err(Error::custom(format!(
            "{} of {} services failed validation",
            summary.services_failing, summary.services_tested
        )))
    }

    /// Continuous monitoring plus the status API, until Ctrl-C
    async fn run_application(config_path: &Path) -> Result<()> {
        let config = Self::load_config(config_path)?;
        let _observability_guard = init_observability(&config)?;

        info!("Starting svcwatch '{}' ({})", config.name, config.env);

        if let Err(e) = svcwatch_common::metrics::register_metrics() {
            warn!(
                "Prometheus metrics registration warning (may already be registered): {}",
                e
            );
        }

        let monitor = Arc::new(Monitor::from_config(&config)?);

        let (shutdown_tx, _) = broadcast::channel::<()>(10);
        setup_ctrl_c_handler(shutdown_tx.clone()).await;

        let bind_addr = config.bind.http.bind_addr();
        let server = HttpServer::bind(&bind_addr, shutdown_tx.clone())
            .await
            .map_err(|e| Error::service_startup(format!("HTTP server: {e}")))?;
        let server_addr = server.local_addr()?;
        let server_handle = server.serve(create_router(Arc::clone(&monitor)));

        let scheduler = Scheduler::new(Arc::clone(&monitor), config.monitor.interval());
        let scheduler_handle = scheduler.spawn(shutdown_tx.subscribe());

        Self::display_service_info(&config, &server_addr.to_string());

        for handle in [scheduler_handle, server_handle] {
            if let Err(e) = handle.await {
                error!("Service task terminated unexpectedly: {}", e);
                let _ = shutdown_tx.send(());
            }
        }

        info!("svcwatch stopped");
        Ok(())
    }

    fn display_service_info(config: &SvcwatchConfig, server_addr: &str) {
        info!(
            "Monitoring {} services on {} every {}s (history: {} entries)",
            config.services.len(),
            config.monitor.host,
            config.monitor.interval_secs,
            config.monitor.history_capacity
        );
        info!("Status API listening on: http://{}", server_addr);
        info!("Available endpoints:");
        for endpoint in [
            "/api/status",
            "/api/services",
            "/api/services/{name}/history",
            "/health",
            "/metrics",
        ] {
            info!("  - http://{}{}", server_addr, endpoint);
        }
    }
}

/// Broadcast shutdown on Ctrl-C
async fn setup_ctrl_c_handler(shutdown_tx: broadcast::Sender<()>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Received Ctrl-C, shutting down gracefully...");
        let _ = shutdown_tx.send(());
    });
}
