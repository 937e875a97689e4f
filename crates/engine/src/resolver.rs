use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of the source files component types resolve to.
pub const SOURCE_EXTENSION: &str = "java";

/// Maps a record's declared type name to candidate source files.
///
/// Matching is by file name only: `com.example.UserDao` resolves to every
/// `UserDao.java` under the project root. No content is inspected; callers
/// must treat zero or multiple candidates as ambiguity, never guess.
pub struct ComponentResolver {
    project_root: PathBuf,
}

impl ComponentResolver {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, type_name: &str) -> Vec<PathBuf> {
        if type_name.trim().is_empty() {
            return Vec::new();
        }

        let unqualified = type_name.rsplit('.').next().unwrap_or(type_name);
        let wanted = format!("{unqualified}.{SOURCE_EXTENSION}");

        let mut candidates = Vec::new();
        for entry in WalkDir::new(&self.project_root)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("Failed to read entry during resolution: {err}");
                    None
                }
            })
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_str() == Some(wanted.as_str()) {
                candidates.push(entry.into_path());
            }
        }

        log::debug!(
            "Resolved type '{type_name}' to {} candidate(s)",
            candidates.len()
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn resolves_unique_source_file_by_name() {
        let temp = tempdir().unwrap();
        let dao_dir = temp.path().join("src").join("dao");
        fs::create_dir_all(&dao_dir).unwrap();
        fs::write(dao_dir.join("UserDao.java"), "public class UserDao {}").unwrap();
        fs::write(dao_dir.join("OrderDao.java"), "public class OrderDao {}").unwrap();

        let resolver = ComponentResolver::new(temp.path());
        let found = resolver.resolve("com.example.dao.UserDao");

        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("UserDao.java"));
    }

    #[test]
    fn multiple_matches_are_all_returned() {
        let temp = tempdir().unwrap();
        for module in ["a", "b"] {
            let dir = temp.path().join(module);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("UserDao.java"), "public class UserDao {}").unwrap();
        }

        let resolver = ComponentResolver::new(temp.path());
        assert_eq!(resolver.resolve("UserDao").len(), 2);
    }

    #[test]
    fn no_match_is_an_empty_list() {
        let temp = tempdir().unwrap();
        let resolver = ComponentResolver::new(temp.path());
        assert!(resolver.resolve("com.example.Missing").is_empty());
    }

    #[test]
    fn blank_type_name_resolves_to_nothing() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("X.java"), "public class X {}").unwrap();

        let resolver = ComponentResolver::new(temp.path());
        assert!(resolver.resolve("").is_empty());
        assert!(resolver.resolve("   ").is_empty());
    }
}
