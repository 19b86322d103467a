//! Taylor-Made CLI
//!
//! Runs the retailer catalog imports and writes the snapshot the web server
//! serves from `/api/catalog`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taylor_catalog::{
    import_catalog_feeds, CatalogSnapshot, ImportOptions, ImportSummary, ImporterFactory,
};
use taylor_core::{init_logging, ImportPolicy, LoggingConfig, TaylorConfig};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "taylor")]
#[command(about = "Catalog import tooling for the Taylor-Made membership platform")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import every enabled retailer feed and update the catalog snapshot
    Import {
        /// Snapshot file; defaults to import.snapshot_path from the config
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop at the first failing source
        #[arg(long)]
        fail_fast: bool,
    },

    /// Manage configuration
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,

        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Validate the effective configuration
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let creating_config = matches!(cli.command, Commands::Config { init: true, .. });
    let config = match cli.config.as_deref() {
        Some(path) if creating_config && !path.exists() => TaylorConfig::default(),
        path => load_config(path)?,
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging = LoggingConfig {
            log_file_path: logging.log_file_path.clone(),
            ..LoggingConfig::with_level("debug")
        };
    }
    init_logging(&logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting Taylor-Made CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Import { output, fail_fast } => {
            let summary = run_import(&config, output.as_deref(), fail_fast).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            let failed = summary.failed_sources();
            if failed.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("Import finished with failed sources: {}", failed.join(", "));
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Config {
            init,
            force,
            show,
            validate,
        } => {
            let path = cli.config.unwrap_or_else(TaylorConfig::default_path);
            handle_config(&config, &path, init, force, show, validate)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Explicit path first, then `~/.taylor-made/config.toml`, then `./taylor.toml`
fn load_config(path: Option<&Path>) -> Result<TaylorConfig> {
    if let Some(path) = path {
        if !path.exists() {
            bail!(
                "Configuration file {} does not exist; create it with `taylor config --init`",
                path.display()
            );
        }
        return TaylorConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    for candidate in [TaylorConfig::default_path(), PathBuf::from("taylor.toml")] {
        if candidate.exists() {
            return TaylorConfig::from_file(&candidate)
                .with_context(|| format!("Failed to load {}", candidate.display()));
        }
    }

    Ok(TaylorConfig::default())
}

/// Run the configured importers and merge the result into the snapshot on disk
async fn run_import(
    config: &TaylorConfig,
    output: Option<&Path>,
    fail_fast: bool,
) -> Result<ImportSummary> {
    config.validate().context("Invalid configuration")?;

    let importers = ImporterFactory::from_config(config)?;
    if importers.is_empty() {
        warn!("No catalog sources are enabled");
    }

    let mut options = ImportOptions::from_config(&config.import);
    if fail_fast {
        options.policy = ImportPolicy::FailFast;
    }

    let summary = import_catalog_feeds(&importers, options).await;

    let snapshot_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.import.snapshot_path));
    let previous = CatalogSnapshot::load(&snapshot_path)?;
    let snapshot = CatalogSnapshot::merge(previous.as_ref(), &summary);
    snapshot
        .save(&snapshot_path)
        .with_context(|| format!("Failed to write {}", snapshot_path.display()))?;

    Ok(summary)
}

fn handle_config(
    config: &TaylorConfig,
    path: &Path,
    init: bool,
    force: bool,
    show: bool,
    validate: bool,
) -> Result<()> {
    if init {
        if path.exists() && !force {
            bail!(
                "{} already exists; pass --force to overwrite it",
                path.display()
            );
        }
        TaylorConfig::default().save_to_file(path)?;
        println!("Configuration initialized at {}", path.display());
        println!("Fill in [sources.impact] or set enabled = false before importing.");
    }

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        config.validate().context("Configuration validation failed")?;
        println!("Configuration is valid");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taylor_core::CatalogItem;

    fn offline_config() -> TaylorConfig {
        let mut config = TaylorConfig::default();
        config.sources.albeebaby.enabled = false;
        config.sources.impact.enabled = false;
        config.sources.silvercross.enabled = false;
        config
    }

    #[test]
    fn test_parse_import_args() {
        let cli = Cli::try_parse_from([
            "taylor",
            "import",
            "--output",
            "/tmp/catalog.json",
            "--fail-fast",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Import { output, fail_fast } => {
                assert_eq!(output, Some(PathBuf::from("/tmp/catalog.json")));
                assert!(fail_fast);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_args() {
        let cli =
            Cli::try_parse_from(["taylor", "--config", "custom.toml", "config", "--init"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config { init: true, force: false, .. }
        ));
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = TaylorConfig::default();

        handle_config(&config, &path, true, false, false, false).unwrap();
        assert!(load_config(Some(&path)).is_ok());

        assert!(handle_config(&config, &path, true, false, false, false).is_err());
        assert!(handle_config(&config, &path, true, true, false, false).is_ok());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_validate_flag_reports_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(handle_config(&TaylorConfig::default(), &path, false, false, false, true).is_err());
        assert!(handle_config(&offline_config(), &path, false, false, false, true).is_ok());
    }

    #[tokio::test]
    async fn test_import_with_no_sources_writes_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("catalog.json");

        let summary = run_import(&offline_config(), Some(&output), false)
            .await
            .unwrap();
        assert!(summary.outcomes.is_empty());

        let snapshot = CatalogSnapshot::load(&output).unwrap().unwrap();
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn test_failed_source_keeps_previous_items() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("catalog.json");

        let previous = CatalogItem {
            id: "albeebaby-1".to_string(),
            name: "Glider".to_string(),
            brand: "Dutailier".to_string(),
            price: 399.0,
            category: "Nursery".to_string(),
            image_url: String::new(),
            retailer: "AlbeeBaby".to_string(),
            url: String::new(),
            notes: String::new(),
        };
        CatalogSnapshot::new(vec![previous.clone()])
            .save(&output)
            .unwrap();

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = offline_config();
        config.sources.albeebaby.enabled = true;
        config.sources.albeebaby.feed_url = format!("http://127.0.0.1:{}/feed.json", port);
        config.http.timeout_seconds = 2;

        let summary = run_import(&config, Some(&output), false).await.unwrap();
        assert_eq!(summary.failed_sources(), vec!["AlbeeBaby"]);

        let snapshot = CatalogSnapshot::load(&output).unwrap().unwrap();
        assert_eq!(snapshot.items, vec![previous]);
    }
}
