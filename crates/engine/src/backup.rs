use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Default backup subdirectory, created beside the mutated file when no
/// explicit backup directory is configured.
const DEFAULT_BACKUP_SUBDIR: &str = "backup";

/// Snapshots files before mutation and restores them when the mutation
/// fails. Single-file atomicity is the only transactional guarantee the
/// pipeline offers.
pub struct BackupCoordinator {
    enabled: bool,
    backup_dir: Option<PathBuf>,
}

impl BackupCoordinator {
    pub fn new(enabled: bool, backup_dir: Option<PathBuf>) -> Self {
        Self {
            enabled,
            backup_dir,
        }
    }

    /// Write `content` to `path`, snapshotting the existing file first. On a
    /// failed write the snapshot is copied back and the write error is
    /// re-raised. Returns the backup path when one was made.
    pub fn write(&self, path: &Path, content: &str) -> Result<Option<PathBuf>> {
        let backup = if self.enabled && path.exists() {
            Some(self.create_backup(path)?)
        } else {
            None
        };

        if let Err(err) = fs::write(path, content) {
            log::error!("Failed to write {}: {err}", path.display());
            if let Some(backup_path) = &backup {
                self.restore(path, backup_path);
            }
            return Err(EngineError::Write {
                path: path.display().to_string(),
                source: err,
            });
        }

        log::debug!("Wrote {}", path.display());
        Ok(backup)
    }

    fn create_backup(&self, path: &Path) -> Result<PathBuf> {
        let backup_dir = match &self.backup_dir {
            Some(dir) => dir.clone(),
            None => path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(DEFAULT_BACKUP_SUBDIR),
        };
        fs::create_dir_all(&backup_dir).map_err(|e| {
            EngineError::backup(format!(
                "Failed to create backup directory {}: {e}",
                backup_dir.display()
            ))
        })?;

        let backup_path = backup_dir.join(backup_file_name(path));
        fs::copy(path, &backup_path).map_err(|e| {
            EngineError::backup(format!(
                "Failed to back up {} to {}: {e}",
                path.display(),
                backup_path.display()
            ))
        })?;

        log::info!(
            "Created backup: {} -> {}",
            path.display(),
            backup_path.display()
        );
        Ok(backup_path)
    }

    /// Copy a snapshot back over the original. Best-effort: a restore
    /// failure is logged, the caller still sees the original write error.
    pub fn restore(&self, original: &Path, backup: &Path) -> bool {
        if !backup.exists() {
            log::error!("Backup file not found: {}", backup.display());
            return false;
        }
        match fs::copy(backup, original) {
            Ok(_) => {
                log::info!(
                    "Restored file from backup: {} -> {}",
                    backup.display(),
                    original.display()
                );
                true
            }
            Err(err) => {
                log::error!("Failed to restore from {}: {err}", backup.display());
                false
            }
        }
    }
}

/// Timestamp suffix inserted before the extension:
/// `beans.xml` → `beans_20240131_093000.xml`.
fn backup_file_name(path: &Path) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("backup");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{timestamp}.{ext}"),
        None => format!("{stem}_{timestamp}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn write_snapshots_existing_file_first() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("beans.xml");
        fs::write(&target, "original").unwrap();

        let coordinator = BackupCoordinator::new(true, None);
        let backup = coordinator.write(&target, "rewritten").unwrap().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "rewritten");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original");
        assert!(backup.parent().unwrap().ends_with("backup"));
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("beans_"));
        assert!(name.ends_with(".xml"));
    }

    #[test]
    fn no_backup_for_new_files() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("fresh.xml");

        let coordinator = BackupCoordinator::new(true, None);
        let backup = coordinator.write(&target, "content").unwrap();

        assert!(backup.is_none());
        assert_eq!(fs::read_to_string(&target).unwrap(), "content");
    }

    #[test]
    fn disabled_backups_write_directly() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("beans.xml");
        fs::write(&target, "original").unwrap();

        let coordinator = BackupCoordinator::new(false, None);
        let backup = coordinator.write(&target, "rewritten").unwrap();

        assert!(backup.is_none());
        assert!(!temp.path().join("backup").exists());
    }

    #[test]
    fn explicit_backup_dir_is_used() {
        let temp = tempdir().unwrap();
        let backup_dir = temp.path().join("snapshots");
        let target = temp.path().join("beans.xml");
        fs::write(&target, "original").unwrap();

        let coordinator = BackupCoordinator::new(true, Some(backup_dir.clone()));
        let backup = coordinator.write(&target, "rewritten").unwrap().unwrap();

        assert_eq!(backup.parent().unwrap(), backup_dir);
    }

    #[test]
    fn restore_brings_back_the_snapshot_byte_identical() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("beans.xml");
        fs::write(&target, "pre-write state").unwrap();

        let coordinator = BackupCoordinator::new(true, None);
        let backup = coordinator.write(&target, "clobbered").unwrap().unwrap();

        // Simulate a failed mutation leaving garbage behind, then restore.
        fs::write(&target, "half-written garbage").unwrap();
        assert!(coordinator.restore(&target, &backup));
        assert_eq!(
            fs::read(&target).unwrap(),
            b"pre-write state".to_vec()
        );
    }

    #[test]
    fn restore_from_missing_backup_reports_failure() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("beans.xml");
        fs::write(&target, "x").unwrap();

        let coordinator = BackupCoordinator::new(true, None);
        assert!(!coordinator.restore(&target, &temp.path().join("gone.xml")));
    }
}
