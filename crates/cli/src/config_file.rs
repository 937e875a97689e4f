//! Config-file loading: YAML and properties formats. JSON is accepted on
//! the flag but fails loudly; it has never been implemented.

use anyhow::{bail, Context, Result};
use rewire_engine::ConverterConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional settings a config file may carry. Keys follow the documented
/// camelCase vocabulary; absent keys leave the flag-level value untouched.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFileSettings {
    pub backup_directory: Option<String>,
    pub dry_run: Option<bool>,
    pub create_backups: Option<bool>,
    pub verbose: Option<bool>,
    pub remove_empty_xml_files: Option<bool>,
    #[serde(rename = "addTODOsForAmbiguousCases")]
    pub add_todos_for_ambiguous_cases: Option<bool>,
    pub report_format: Option<String>,
    pub report_output_path: Option<String>,
}

pub fn load(path: &Path) -> Result<ConfigFileSettings> {
    if !path.exists() {
        bail!("Configuration file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => load_yaml(path),
        "properties" => load_properties(path),
        "json" => bail!("JSON configuration loading is not implemented"),
        other => bail!("Unsupported configuration file format: {other}"),
    }
}

pub fn apply(settings: &ConfigFileSettings, config: &mut ConverterConfig) {
    if let Some(dir) = &settings.backup_directory {
        config.backup_dir = Some(PathBuf::from(dir));
    }
    if let Some(dry_run) = settings.dry_run {
        config.dry_run = dry_run;
    }
    if let Some(create_backups) = settings.create_backups {
        config.create_backups = create_backups;
    }
    if let Some(verbose) = settings.verbose {
        config.verbose = verbose;
    }
    if let Some(remove_empty) = settings.remove_empty_xml_files {
        config.remove_empty_descriptors = remove_empty;
    }
    if let Some(follow_ups) = settings.add_todos_for_ambiguous_cases {
        config.follow_ups_for_ambiguous = follow_ups;
    }
    if let Some(format) = &settings.report_format {
        config.report_format = format.clone();
    }
    if let Some(path) = &settings.report_output_path {
        config.report_path = Some(PathBuf::from(path));
    }
}

fn load_yaml(path: &Path) -> Result<ConfigFileSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML configuration {}", path.display()))
}

/// Line-based `key=value` parsing; `#` and `!` start comments. Unknown keys
/// are ignored, malformed boolean values fall back to false.
fn load_properties(path: &Path) -> Result<ConfigFileSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let mut settings = ConfigFileSettings::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "backupDirectory" => settings.backup_directory = Some(value.to_string()),
            "dryRun" => settings.dry_run = Some(parse_bool(value)),
            "createBackups" => settings.create_backups = Some(parse_bool(value)),
            "verbose" => settings.verbose = Some(parse_bool(value)),
            "removeEmptyXmlFiles" => settings.remove_empty_xml_files = Some(parse_bool(value)),
            "addTODOsForAmbiguousCases" => {
                settings.add_todos_for_ambiguous_cases = Some(parse_bool(value));
            }
            "reportFormat" => settings.report_format = Some(value.to_string()),
            "reportOutputPath" => settings.report_output_path = Some(value.to_string()),
            _ => log::debug!("Ignoring unknown configuration key: {key}"),
        }
    }

    Ok(settings)
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
