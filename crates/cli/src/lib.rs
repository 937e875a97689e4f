//! Command-line surface for the wiring-to-annotation converter.
//!
//! Assembles a [`ConverterConfig`] from flags and an optional config file,
//! runs the engine, renders the Markdown report, and maps the ledger onto
//! the process exit code: 0 on a clean run, 1 on any recorded error
//! (including argument/config validation failure).

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use rewire_engine::{ConversionEngine, ConverterConfig};
use std::path::PathBuf;

mod config_file;
mod report;

#[derive(Parser)]
#[command(name = "rewire")]
#[command(about = "Converts XML wiring descriptors to in-source annotations", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Project directory to convert (required)
    #[arg(short = 'p', long = "projectDir")]
    project_dir: PathBuf,

    /// Backup directory (optional)
    #[arg(short = 'b', long = "backupDir")]
    backup_dir: Option<PathBuf>,

    /// Configuration file (YAML or properties; JSON is not supported)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Dry run mode (no files modified)
    #[arg(short = 'd', long = "dryRun")]
    dry_run: bool,

    /// Disable automatic backups
    #[arg(short = 'n', long = "noBackup")]
    no_backup: bool,

    /// Report output path
    #[arg(short = 'r', long = "report")]
    report: Option<PathBuf>,

    /// Exclude pattern (regex over full paths, repeatable)
    #[arg(short = 'e', long = "exclude")]
    exclude: Vec<String>,

    /// Include pattern (regex over full paths, repeatable)
    #[arg(short = 'i', long = "include")]
    include: Vec<String>,

    /// Verbose output
    #[arg(short = 'V', long = "verbose")]
    verbose: bool,

    /// Show version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

pub fn main_entry() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests exit cleanly; anything else is an
            // argument validation failure.
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            err.print()?;
            return Ok(code);
        }
    };

    init_logging(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err:#}");
            return Ok(1);
        }
    };

    let ledger = ConversionEngine::new(config.clone()).execute();

    report::print_summary(&ledger);
    if config.dry_run {
        log::info!(
            "DRY RUN: report not written (would go to {})",
            config.resolved_report_path().display()
        );
    } else if let Err(err) = report::write_report(&ledger, &config) {
        log::error!("Failed to write report: {err:#}");
        return Ok(1);
    }

    Ok(if ledger.is_successful() { 0 } else { 1 })
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn build_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut config = ConverterConfig::new(&cli.project_dir);

    // Config file first; explicit flags win over file values.
    if let Some(path) = &cli.config {
        let settings = config_file::load(path)?;
        config_file::apply(&settings, &mut config);
    }

    if let Some(backup_dir) = &cli.backup_dir {
        config.backup_dir = Some(backup_dir.clone());
    }
    if cli.dry_run {
        config.dry_run = true;
    }
    if cli.no_backup {
        config.create_backups = false;
    }
    if let Some(report) = &cli.report {
        config.report_path = Some(report.clone());
    }
    config.exclude_patterns.extend(cli.exclude.iter().cloned());
    config.include_patterns.extend(cli.include.iter().cloned());
    if cli.verbose {
        config.verbose = true;
    }

    Ok(config)
}
