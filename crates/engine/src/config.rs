use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::PathFilters;
use crate::error::{EngineError, Result};

/// Settings for one conversion run. Assembled by the CLI from flags and an
/// optional config file; consumed read-only by the engine.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Root of the project tree to convert
    pub project_dir: PathBuf,

    /// Backup location; `backup/` beside each mutated file when unset
    pub backup_dir: Option<PathBuf>,

    pub create_backups: bool,
    pub dry_run: bool,
    pub verbose: bool,

    /// Regex patterns over full path strings; exclude is checked first,
    /// an empty include list means include everything
    pub exclude_patterns: Vec<String>,
    pub include_patterns: Vec<String>,

    /// Delete descriptor files that end up holding nothing but an empty root
    pub remove_empty_descriptors: bool,

    /// Emit follow-up items when resolution is ambiguous
    pub follow_ups_for_ambiguous: bool,

    pub report_format: String,
    pub report_path: Option<PathBuf>,
}

impl ConverterConfig {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            backup_dir: None,
            create_backups: true,
            dry_run: false,
            verbose: false,
            exclude_patterns: Vec::new(),
            include_patterns: Vec::new(),
            remove_empty_descriptors: true,
            follow_ups_for_ambiguous: true,
            report_format: "markdown".to_string(),
            report_path: None,
        }
    }

    /// Compile the include/exclude patterns; invalid regex is fatal.
    pub fn compiled_filters(&self) -> Result<PathFilters> {
        PathFilters::compile(&self.exclude_patterns, &self.include_patterns)
    }

    /// Startup validation: failures here abort the run before any file is
    /// processed.
    pub fn validate(&self) -> Result<()> {
        validate_project_dir(&self.project_dir)?;
        if let Some(backup_dir) = &self.backup_dir {
            validate_backup_dir(backup_dir)?;
        }
        self.compiled_filters()?;
        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Where the report goes when no explicit path is configured.
    pub fn resolved_report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.project_dir.join("conversion_report.md"))
    }
}

fn validate_project_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(EngineError::configuration(format!(
            "Project directory does not exist: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(EngineError::configuration(format!(
            "Project path is not a directory: {}",
            dir.display()
        )));
    }
    // Readability probe; a directory we cannot list is unusable.
    fs::read_dir(dir).map_err(|e| {
        EngineError::configuration(format!(
            "Project directory is not readable: {}: {e}",
            dir.display()
        ))
    })?;
    Ok(())
}

fn validate_backup_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(EngineError::configuration(format!(
            "Backup path exists but is not a directory: {}",
            dir.display()
        )));
    }
    fs::create_dir_all(dir).map_err(|e| {
        EngineError::configuration(format!(
            "Failed to create backup directory {}: {e}",
            dir.display()
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_safe() {
        let config = ConverterConfig::new("/tmp/p");
        assert!(config.create_backups);
        assert!(config.remove_empty_descriptors);
        assert!(config.follow_ups_for_ambiguous);
        assert!(!config.dry_run);
        assert_eq!(config.report_format, "markdown");
    }

    #[test]
    fn missing_project_dir_fails_validation() {
        let config = ConverterConfig::new("/nonexistent/project/path");
        assert!(matches!(
            config.validate(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn project_path_must_be_a_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let config = ConverterConfig::new(&file);
        assert!(matches!(
            config.validate(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn backup_dir_is_created_on_validate() {
        let temp = tempdir().unwrap();
        let mut config = ConverterConfig::new(temp.path());
        let backup_dir = temp.path().join("nested").join("backups");
        config.backup_dir = Some(backup_dir.clone());

        config.validate().unwrap();
        assert!(backup_dir.is_dir());
    }

    #[test]
    fn invalid_filter_regex_is_a_configuration_error() {
        let temp = tempdir().unwrap();
        let mut config = ConverterConfig::new(temp.path());
        config.exclude_patterns.push("[unclosed".to_string());

        assert!(matches!(
            config.validate(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn report_path_defaults_inside_project() {
        let config = ConverterConfig::new("/work/app");
        assert_eq!(
            config.resolved_report_path(),
            PathBuf::from("/work/app/conversion_report.md")
        );
    }
}
