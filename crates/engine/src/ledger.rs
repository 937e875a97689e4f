use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::config::ConverterConfig;
use crate::outcome::{ConversionOutcome, FollowUpItem, RunError};

/// Process-wide accumulator for one run. Owned and mutated only by the
/// orchestrator, then finalized once and handed to report rendering.
#[derive(Debug)]
pub struct ConversionLedger {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub project_dir: PathBuf,
    pub backup_dir: Option<PathBuf>,

    // Aggregate counters
    pub files_scanned: usize,
    pub source_files_modified: usize,
    pub records_converted: usize,
    pub properties_converted: usize,
    pub constructor_args_converted: usize,
    pub markers_added: usize,

    // Full sequences, in processing order
    pub outcomes: Vec<ConversionOutcome>,
    pub follow_ups: Vec<FollowUpItem>,
    pub errors: Vec<RunError>,
    pub backups: Vec<(PathBuf, PathBuf)>,
}

impl ConversionLedger {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            project_dir: config.project_dir.clone(),
            backup_dir: config.backup_dir.clone(),
            files_scanned: 0,
            source_files_modified: 0,
            records_converted: 0,
            properties_converted: 0,
            constructor_args_converted: 0,
            markers_added: 0,
            outcomes: Vec::new(),
            follow_ups: Vec::new(),
            errors: Vec::new(),
            backups: Vec::new(),
        }
    }

    pub fn record_outcome(&mut self, outcome: ConversionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn add_follow_up(&mut self, mut item: FollowUpItem) {
        item.id = format!("FU-{:03}", self.follow_ups.len() + 1);
        self.follow_ups.push(item);
    }

    pub fn add_error(&mut self, mut error: RunError) {
        error.id = format!("ERR-{:03}", self.errors.len() + 1);
        log::warn!("Recorded run error: {}", error.message);
        self.errors.push(error);
    }

    pub fn add_backup(&mut self, original: &Path, backup: &Path) {
        self.backups
            .push((original.to_path_buf(), backup.to_path_buf()));
    }

    /// Stamp the end of the run. Call exactly once.
    pub fn finalize(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn duration_seconds(&self) -> i64 {
        match self.finished_at {
            Some(end) => (end - self.started_at).num_seconds(),
            None => 0,
        }
    }

    /// A run is successful iff nothing was recorded as an error. Skipped and
    /// failed records surface as follow-ups, not errors.
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }
}
