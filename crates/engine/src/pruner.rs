use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::BackupCoordinator;
use crate::error::Result;

/// A descriptor holding nothing but the XML declaration and a single empty
/// root element. Anything else, comments included, keeps the file alive.
static EMPTY_DESCRIPTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^<\?xml[^>]*\?>\s*<[^>]*>\s*</[^>]*>\s*$").unwrap()
});

/// Mutates originating descriptors after successful conversions: comments
/// out converted elements, and deletes files that end up empty. Entirely
/// inert under dry-run.
pub struct MarkupPruner {
    dry_run: bool,
    remove_empty: bool,
}

impl MarkupPruner {
    pub fn new(dry_run: bool, remove_empty: bool) -> Self {
        Self {
            dry_run,
            remove_empty,
        }
    }

    /// Wrap each converted element in a comment holding its original text.
    /// Returns the backup path when the file was rewritten through one.
    pub fn comment_out_converted(
        &self,
        path: &Path,
        converted_ids: &[String],
        backup: &BackupCoordinator,
    ) -> Result<Option<PathBuf>> {
        if converted_ids.is_empty() {
            return Ok(None);
        }
        if self.dry_run {
            log::info!(
                "DRY RUN: would comment out {} converted element(s) in {}",
                converted_ids.len(),
                path.display()
            );
            return Ok(None);
        }

        let original = fs::read_to_string(path)?;
        let mut content = original.clone();
        for id in converted_ids {
            content = comment_out_element(&content, id);
        }

        if content == original {
            return Ok(None);
        }

        let backup_path = backup.write(path, &content)?;
        log::info!("Updated descriptor: {}", path.display());
        Ok(backup_path)
    }

    /// Delete the descriptor when nothing but an empty root remains.
    /// Returns true when the file was (or would have been) removed.
    pub fn remove_if_empty(&self, path: &Path) -> Result<bool> {
        if !self.remove_empty {
            return Ok(false);
        }

        let content = fs::read_to_string(path)?;
        if !EMPTY_DESCRIPTOR.is_match(content.trim()) {
            return Ok(false);
        }

        if self.dry_run {
            log::info!("DRY RUN: would remove empty descriptor {}", path.display());
            return Ok(true);
        }

        fs::remove_file(path)?;
        log::info!("Removed empty descriptor: {}", path.display());
        Ok(true)
    }
}

/// Comment out the smallest enclosing declaration element with the given id.
/// The self-closing form is tried first: the paired form's lazy body scan
/// would otherwise run a self-closing tag into the next element's close.
fn comment_out_element(content: &str, id: &str) -> String {
    let escaped = regex::escape(id);
    let patterns = [
        format!(r#"(<bean\b[^>]*\bid="{escaped}"[^>]*/>)"#),
        format!(r#"(?s)(<bean\b[^>]*\bid="{escaped}"[^>]*>.*?</bean>)"#),
    ];

    for pattern in &patterns {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(content) => {
                return re
                    .replace_all(content, "<!-- Converted to annotation: $1 -->")
                    .into_owned();
            }
            Ok(_) => {}
            Err(err) => {
                log::warn!("Could not build prune pattern for id '{id}': {err}");
            }
        }
    }

    content.to_string()
}
