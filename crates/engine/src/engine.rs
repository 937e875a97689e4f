use rewire_rewriter::{JavaSource, MarkerPlanner, RewriteError, SourceRewriter};
use rewire_wiring::{RecordExtractor, WiringRecord};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::BackupCoordinator;
use crate::config::ConverterConfig;
use crate::discovery::DescriptorScanner;
use crate::error::Result;
use crate::ledger::ConversionLedger;
use crate::outcome::{
    ConversionOutcome, ErrorKind, ErrorSeverity, FollowUpCategory, FollowUpItem,
    FollowUpPriority, OutcomeStatus, RunError,
};
use crate::pruner::MarkupPruner;
use crate::resolver::ComponentResolver;

/// Sequences the pipeline per descriptor file, per record, enforcing the
/// failure policy: per-record and per-file errors become ledger entries and
/// never abort the run.
pub struct ConversionEngine {
    config: ConverterConfig,
    resolver: ComponentResolver,
    backup: BackupCoordinator,
    pruner: MarkupPruner,
}

/// What the rewrite stage hands back for one record.
struct AppliedRewrite {
    markers_added: Vec<String>,
    notes: Vec<String>,
    missing_fields: Vec<String>,
    backup_path: Option<PathBuf>,
}

impl ConversionEngine {
    pub fn new(config: ConverterConfig) -> Self {
        let resolver = ComponentResolver::new(&config.project_dir);
        let backup = BackupCoordinator::new(config.create_backups, config.backup_dir.clone());
        let pruner = MarkupPruner::new(config.dry_run, config.remove_empty_descriptors);
        Self {
            config,
            resolver,
            backup,
            pruner,
        }
    }

    /// Execute the complete conversion and return the finalized ledger.
    pub fn execute(&self) -> ConversionLedger {
        log::info!("Starting wiring-to-annotation conversion");
        log::info!("Project directory: {}", self.config.project_dir.display());

        let mut ledger = ConversionLedger::new(&self.config);

        let filters = match self
            .config
            .validate()
            .and_then(|()| self.config.compiled_filters())
        {
            Ok(filters) => filters,
            Err(err) => {
                log::error!("Input validation failed: {err}");
                ledger.add_error(
                    RunError::new(
                        err.to_string(),
                        &self.config.project_dir,
                        ErrorKind::Configuration,
                    )
                    .severity(ErrorSeverity::Critical),
                );
                ledger.finalize();
                return ledger;
            }
        };

        let scanner = DescriptorScanner::new(&self.config.project_dir, filters);
        let descriptors = scanner.scan();
        ledger.files_scanned = descriptors.len();

        if descriptors.is_empty() {
            log::warn!("No wiring descriptors found in project directory");
            ledger.finalize();
            return ledger;
        }

        for descriptor in &descriptors {
            self.process_descriptor(descriptor, &mut ledger);
        }

        ledger.finalize();
        log::info!("Conversion process completed");
        ledger
    }

    fn process_descriptor(&self, path: &Path, ledger: &mut ConversionLedger) {
        log::info!("Processing descriptor: {}", path.display());

        let records = match RecordExtractor::extract(path) {
            Ok(records) => records,
            Err(err) => {
                // Fatal for this file only; the run continues.
                log::error!("Failed to parse descriptor {}: {err}", path.display());
                ledger.add_error(RunError::new(
                    format!("Markup parsing error: {err}"),
                    path,
                    ErrorKind::MarkupParse,
                ));
                return;
            }
        };

        if records.is_empty() {
            log::info!("No wiring records in {}", path.display());
            return;
        }

        let mut converted_ids = Vec::new();
        for record in &records {
            let outcome = self.process_record(record, ledger);
            if outcome.status == OutcomeStatus::Success {
                converted_ids.push(record.id.clone());
            }
            if outcome.is_converted() {
                ledger.records_converted += 1;
                ledger.properties_converted += record.properties.len();
                ledger.constructor_args_converted += record.constructor_args.len();
                ledger.markers_added += outcome.markers_added.len();
                if outcome.markers_added.is_empty() {
                    log::debug!("Record '{}' needed no new markers", record.id);
                } else {
                    ledger.source_files_modified += 1;
                }
            } else {
                log::warn!(
                    "Record '{}' not converted: {}",
                    record.id,
                    outcome.error_message.as_deref().unwrap_or("unknown")
                );
            }
            ledger.record_outcome(outcome);
        }

        if !converted_ids.is_empty() {
            match self
                .pruner
                .comment_out_converted(path, &converted_ids, &self.backup)
            {
                Ok(Some(backup_path)) => ledger.add_backup(path, &backup_path),
                Ok(None) => {}
                Err(err) => ledger.add_error(RunError::new(
                    format!("Descriptor update error: {err}"),
                    path,
                    ErrorKind::Write,
                )),
            }
        }

        if let Err(err) = self.pruner.remove_if_empty(path) {
            ledger.add_error(RunError::new(
                format!("Descriptor removal error: {err}"),
                path,
                ErrorKind::Write,
            ));
        }
    }

    fn process_record(
        &self,
        record: &WiringRecord,
        ledger: &mut ConversionLedger,
    ) -> ConversionOutcome {
        log::debug!("Processing record: {} ({})", record.id, record.type_name);
        let mut outcome = ConversionOutcome::pending(record);

        self.report_unsupported_bindings(record, ledger);

        let candidates = self.resolver.resolve(&record.type_name);
        match candidates.len() {
            0 => {
                self.ambiguity_follow_up(record, &candidates, ledger);
                outcome.mark_skipped(format!(
                    "No source file found for type: {}",
                    record.type_name
                ));
                return outcome;
            }
            1 => {}
            _ => {
                self.ambiguity_follow_up(record, &candidates, ledger);
                outcome.mark_skipped(format!(
                    "Multiple source files found for type: {}",
                    record.type_name
                ));
                return outcome;
            }
        }

        let target = &candidates[0];
        match self.rewrite_source(record, target) {
            Ok(applied) => {
                if let Some(backup_path) = &applied.backup_path {
                    ledger.add_backup(target, backup_path);
                }
                if applied.missing_fields.is_empty() {
                    outcome.mark_success(target, applied.markers_added, applied.notes);
                } else {
                    outcome.mark_partial(target, applied.markers_added, applied.notes);
                }
            }
            Err(err) => {
                outcome.mark_failed(err.to_string());
                ledger.add_follow_up(
                    FollowUpItem::new(
                        format!("Failed to convert record '{}': {err}", record.id),
                        target.clone(),
                        FollowUpCategory::ManualReview,
                    )
                    .priority(FollowUpPriority::High)
                    .suggested_action(format!(
                        "Manually add markers to: {}",
                        target.display()
                    ))
                    .for_record(record),
                );
            }
        }

        outcome
    }

    /// Rewrite one source file for one record. Errors here fail the record,
    /// never the run; a failed write has already been restored from backup.
    fn rewrite_source(&self, record: &WiringRecord, target: &Path) -> Result<AppliedRewrite> {
        let content = fs::read_to_string(target)?;
        let source = JavaSource::parse(&content)?;
        let class = source
            .find_class(record.unqualified_name())
            .ok_or_else(|| {
                RewriteError::ClassNotFound(record.unqualified_name().to_string())
            })?;

        let plan = MarkerPlanner::plan(record, class);
        let rewrite = SourceRewriter::apply(&content, class, &plan);

        let backup_path = if !rewrite.changed {
            log::debug!("No changes needed in {}", target.display());
            None
        } else if self.config.dry_run {
            log::info!("DRY RUN: would modify {}", target.display());
            None
        } else {
            self.backup.write(target, &rewrite.content)?
        };

        Ok(AppliedRewrite {
            markers_added: rewrite.markers_added,
            notes: rewrite.notes,
            missing_fields: plan.missing_fields,
            backup_path,
        })
    }

    /// Bindings that are neither references nor values came from constructs
    /// the extractor recognizes but does not expand; each one becomes a
    /// follow-up instead of silently dropped data.
    fn report_unsupported_bindings(&self, record: &WiringRecord, ledger: &mut ConversionLedger) {
        for property in record.properties.iter().filter(|p| p.is_unsupported()) {
            let shape = if property.is_map {
                "map"
            } else if property.is_set {
                "set"
            } else {
                "unrecognized"
            };
            ledger.add_follow_up(
                FollowUpItem::new(
                    format!(
                        "Property '{}' on record '{}' uses a nested {shape} construct that was not extracted",
                        property.name, record.id
                    ),
                    record.source_file.clone(),
                    FollowUpCategory::UnsupportedElement,
                )
                .suggested_action(format!(
                    "Migrate property '{}' manually",
                    property.name
                ))
                .for_record(record),
            );
        }
    }

    fn ambiguity_follow_up(
        &self,
        record: &WiringRecord,
        candidates: &[PathBuf],
        ledger: &mut ConversionLedger,
    ) {
        if !self.config.follow_ups_for_ambiguous {
            return;
        }

        let (description, action) = if candidates.is_empty() {
            (
                format!(
                    "No source file found for record '{}' (type: {})",
                    record.id, record.type_name
                ),
                format!("Create or locate the class: {}", record.type_name),
            )
        } else {
            (
                format!(
                    "Multiple source files found for record '{}' (type: {})",
                    record.id, record.type_name
                ),
                format!(
                    "Manually pick the right file: {}",
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        };

        ledger.add_follow_up(
            FollowUpItem::new(
                description,
                record.source_file.clone(),
                FollowUpCategory::AmbiguousMapping,
            )
            .priority(FollowUpPriority::High)
            .suggested_action(action)
            .for_record(record),
        );
    }
}
