use regex::Regex;
use rewire_wiring::is_wiring_descriptor;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{EngineError, Result};

/// Compiled include/exclude filters over full path strings. Exclude is
/// checked before include; an empty include list means include everything.
/// Patterns must match the whole path, not a substring.
#[derive(Debug, Default)]
pub struct PathFilters {
    exclude: Vec<Regex>,
    include: Vec<Regex>,
}

impl PathFilters {
    pub fn compile(exclude: &[String], include: &[String]) -> Result<Self> {
        Ok(Self {
            exclude: compile_all(exclude)?,
            include: compile_all(include)?,
        })
    }

    pub fn allowed(&self, path: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(path)) {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|re| re.is_match(path))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&format!("^(?:{p})$")).map_err(|e| {
                EngineError::configuration(format!("Invalid path pattern '{p}': {e}"))
            })
        })
        .collect()
}

/// Finds wiring descriptor files in the project tree. Only XML files whose
/// content carries recognizable wiring markers are returned; everything else
/// is ignored entirely.
pub struct DescriptorScanner {
    root: PathBuf,
    filters: PathFilters,
}

impl DescriptorScanner {
    pub fn new(root: impl AsRef<Path>, filters: PathFilters) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            filters,
        }
    }

    pub fn scan(&self) -> Vec<PathBuf> {
        let mut descriptors = Vec::new();

        for entry in WalkDir::new(&self.root).into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Failed to read entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let is_xml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
            if !is_xml {
                continue;
            }

            if !self.filters.allowed(&path.display().to_string()) {
                log::debug!("Filtered out {}", path.display());
                continue;
            }

            match fs::read_to_string(path) {
                Ok(content) if is_wiring_descriptor(&content) => {
                    descriptors.push(path.to_path_buf());
                }
                Ok(_) => log::debug!("Not a wiring descriptor: {}", path.display()),
                Err(err) => {
                    log::warn!("Could not read {} while sniffing: {err}", path.display());
                }
            }
        }

        log::info!(
            "Found {} wiring descriptor(s) under {}",
            descriptors.len(),
            self.root.display()
        );
        descriptors
    }
}
