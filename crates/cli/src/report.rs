//! Markdown report rendering and the console summary.

use anyhow::{Context, Result};
use rewire_engine::{ConversionLedger, ConverterConfig, OutcomeStatus};
use std::fs;

pub fn write_report(ledger: &ConversionLedger, config: &ConverterConfig) -> Result<()> {
    let path = config.resolved_report_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }

    let content = render_report(ledger, config);
    fs::write(&path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    log::info!("Generated conversion report: {}", path.display());
    Ok(())
}

pub fn render_report(ledger: &ConversionLedger, config: &ConverterConfig) -> String {
    let mut md = String::new();

    md.push_str("# Wiring to Annotation Conversion Report\n\n");
    md.push_str(&format!(
        "**Generated:** {}\n",
        ledger.started_at.format("%Y-%m-%dT%H:%M:%S")
    ));
    md.push_str(&format!(
        "**Project Directory:** {}\n",
        ledger.project_dir.display()
    ));
    if let Some(backup_dir) = &ledger.backup_dir {
        md.push_str(&format!("**Backup Directory:** {}\n", backup_dir.display()));
    }
    md.push_str(&format!(
        "**Duration:** {} seconds\n\n",
        ledger.duration_seconds()
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!(
        "| Descriptor Files Processed | {} |\n",
        ledger.files_scanned
    ));
    md.push_str(&format!(
        "| Source Files Modified | {} |\n",
        ledger.source_files_modified
    ));
    md.push_str(&format!(
        "| Records Converted | {} |\n",
        ledger.records_converted
    ));
    md.push_str(&format!(
        "| Properties Converted | {} |\n",
        ledger.properties_converted
    ));
    md.push_str(&format!(
        "| Constructor Args Converted | {} |\n",
        ledger.constructor_args_converted
    ));
    md.push_str(&format!("| Markers Added | {} |\n", ledger.markers_added));
    md.push_str(&format!(
        "| Follow-ups Generated | {} |\n",
        ledger.follow_ups.len()
    ));
    md.push_str(&format!("| Errors | {} |\n", ledger.errors.len()));
    md.push_str(&format!(
        "| Success | {} |\n\n",
        if ledger.is_successful() {
            "✅ Yes"
        } else {
            "❌ No"
        }
    ));

    md.push_str("## Configuration\n\n");
    md.push_str("| Setting | Value |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!(
        "| Create Backups | {} |\n",
        yes_no(config.create_backups)
    ));
    md.push_str(&format!("| Dry Run | {} |\n", yes_no(config.dry_run)));
    md.push_str(&format!(
        "| Remove Empty Descriptors | {} |\n",
        yes_no(config.remove_empty_descriptors)
    ));
    md.push_str(&format!(
        "| Follow-ups for Ambiguous Cases | {} |\n",
        yes_no(config.follow_ups_for_ambiguous)
    ));
    md.push_str(&format!("| Report Format | {} |\n\n", config.report_format));

    if !ledger.outcomes.is_empty() {
        md.push_str("## Conversion Results\n\n");
        md.push_str("| File | Record | Status | Markers Added |\n");
        md.push_str("|------|--------|--------|---------------|\n");
        for outcome in &ledger.outcomes {
            let markers = outcome.markers_added.join(", ");
            md.push_str(&format!(
                "| {} | {} | {} {} | {} |\n",
                outcome.source_file.display(),
                outcome.record_id,
                status_icon(outcome.status),
                outcome.status.as_str(),
                if markers.is_empty() { "-" } else { markers.as_str() }
            ));
        }
        md.push('\n');
    }

    if !ledger.follow_ups.is_empty() {
        md.push_str("## Follow-up Items\n\n");
        md.push_str("The following items require manual intervention:\n\n");
        for item in &ledger.follow_ups {
            md.push_str(&format!("### {}\n\n", item.id));
            md.push_str(&format!("- **Description:** {}\n", item.description));
            md.push_str(&format!("- **File:** {}\n", item.file_path.display()));
            if item.line_number > 0 {
                md.push_str(&format!("- **Line:** {}\n", item.line_number));
            }
            md.push_str(&format!("- **Category:** {}\n", item.category.as_str()));
            md.push_str(&format!("- **Priority:** {}\n", item.priority.as_str()));
            if let Some(action) = &item.suggested_action {
                md.push_str(&format!("- **Suggested Action:** {action}\n"));
            }
            if let Some(record_id) = &item.record_id {
                md.push_str(&format!("- **Related Record:** {record_id}\n"));
            }
            md.push('\n');
        }
    }

    if !ledger.errors.is_empty() {
        md.push_str("## Errors\n\n");
        md.push_str("The following errors occurred during conversion:\n\n");
        for error in &ledger.errors {
            md.push_str(&format!("### {}\n\n", error.id));
            md.push_str(&format!("- **Message:** {}\n", error.message));
            md.push_str(&format!("- **File:** {}\n", error.file_path.display()));
            md.push_str(&format!("- **Type:** {}\n", error.kind.as_str()));
            md.push_str(&format!("- **Severity:** {}\n", error.severity.as_str()));
            if let Some(record_id) = &error.record_id {
                md.push_str(&format!("- **Related Record:** {record_id}\n"));
            }
            md.push('\n');
        }
    }

    if !ledger.backups.is_empty() {
        md.push_str("## File Backups\n\n");
        md.push_str("The following files were backed up before modification:\n\n");
        md.push_str("| Original File | Backup File |\n");
        md.push_str("|---------------|-------------|\n");
        for (original, backup) in &ledger.backups {
            md.push_str(&format!(
                "| {} | {} |\n",
                original.display(),
                backup.display()
            ));
        }
        md.push('\n');
    }

    md.push_str("## Recommendations\n\n");
    if !ledger.errors.is_empty() {
        md.push_str(&format!(
            "⚠️ **Review Required:** {} errors occurred during conversion. Please review the error section above.\n\n",
            ledger.errors.len()
        ));
    }
    if !ledger.follow_ups.is_empty() {
        md.push_str(&format!(
            "📝 **Manual Intervention Required:** {} follow-up items were generated. Please review and address each item.\n\n",
            ledger.follow_ups.len()
        ));
    }
    if ledger.records_converted > 0 {
        md.push_str(&format!(
            "✅ **Conversion Successful:** {} records were converted to annotations.\n\n",
            ledger.records_converted
        ));
    }

    md.push_str("### Next Steps\n\n");
    md.push_str("1. **Review the converted code** to ensure all annotations are correctly applied\n");
    md.push_str("2. **Address follow-up items** listed in the report\n");
    md.push_str("3. **Test the application** to verify functionality is preserved\n");
    md.push_str("4. **Remove commented descriptor entries** once testing is complete\n");
    md.push_str("5. **Update build configuration** if needed (e.g. component scanning)\n\n");

    md.push_str("---\n");
    md.push_str("*Report generated by rewire*\n");

    md
}

pub fn print_summary(ledger: &ConversionLedger) {
    log::info!("=== Conversion Summary ===");
    log::info!("Descriptor Files Processed: {}", ledger.files_scanned);
    log::info!("Source Files Modified: {}", ledger.source_files_modified);
    log::info!("Records Converted: {}", ledger.records_converted);
    log::info!("Properties Converted: {}", ledger.properties_converted);
    log::info!(
        "Constructor Args Converted: {}",
        ledger.constructor_args_converted
    );
    log::info!("Follow-ups Generated: {}", ledger.follow_ups.len());
    log::info!("Errors: {}", ledger.errors.len());
    log::info!("Duration: {} seconds", ledger.duration_seconds());

    if ledger.is_successful() {
        log::info!("Conversion completed successfully");
    } else {
        log::error!(
            "Conversion completed with {} error(s)",
            ledger.errors.len()
        );
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn status_icon(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Success => "✅",
        OutcomeStatus::Failed => "❌",
        OutcomeStatus::Skipped => "⏭️",
        OutcomeStatus::Partial => "⚠️",
        OutcomeStatus::Pending => "❓",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewire_engine::{
        ConversionLedger, ErrorKind, FollowUpCategory, FollowUpItem, RunError,
    };
    use std::path::Path;

    fn config() -> ConverterConfig {
        ConverterConfig::new("/work/app")
    }

    #[test]
    fn report_carries_every_section() {
        let cfg = config();
        let mut ledger = ConversionLedger::new(&cfg);
        ledger.files_scanned = 1;
        ledger.records_converted = 2;
        ledger.add_follow_up(FollowUpItem::new(
            "needs eyes",
            "beans.xml",
            FollowUpCategory::AmbiguousMapping,
        ));
        ledger.add_error(RunError::new("boom", "bad.xml", ErrorKind::MarkupParse));
        ledger.add_backup(Path::new("a.java"), Path::new("backup/a_1.java"));
        ledger.finalize();

        let md = render_report(&ledger, &cfg);

        assert!(md.contains("# Wiring to Annotation Conversion Report"));
        assert!(md.contains("| Records Converted | 2 |"));
        assert!(md.contains("| Success | ❌ No |"));
        assert!(md.contains("## Follow-up Items"));
        assert!(md.contains("### FU-001"));
        assert!(md.contains("## Errors"));
        assert!(md.contains("### ERR-001"));
        assert!(md.contains("| a.java | backup/a_1.java |"));
        assert!(md.contains("### Next Steps"));
    }

    #[test]
    fn clean_run_reports_success() {
        let cfg = config();
        let mut ledger = ConversionLedger::new(&cfg);
        ledger.records_converted = 1;
        ledger.finalize();

        let md = render_report(&ledger, &cfg);
        assert!(md.contains("| Success | ✅ Yes |"));
        assert!(md.contains("**Conversion Successful:** 1 records"));
        assert!(!md.contains("## Errors"));
    }

    #[test]
    fn write_report_lands_at_configured_path() {
        let temp = tempfile::tempdir().unwrap();
        let mut cfg = ConverterConfig::new(temp.path());
        cfg.report_path = Some(temp.path().join("out").join("report.md"));

        let mut ledger = ConversionLedger::new(&cfg);
        ledger.finalize();
        write_report(&ledger, &cfg).unwrap();

        let written = fs::read_to_string(temp.path().join("out").join("report.md")).unwrap();
        assert!(written.contains("# Wiring to Annotation Conversion Report"));
    }
}
