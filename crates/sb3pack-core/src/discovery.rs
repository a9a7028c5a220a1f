//! Recursive discovery of project archives.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::PackError;
use crate::Result;

/// Extension of Scratch 3 project archives.
pub const PROJECT_EXTENSION: &str = "sb3";

/// One discovered project archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
    relative: PathBuf,
    extension: String,
}

impl SourceFile {
    /// Absolute path of the archive.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the archive relative to the discovery root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Directory of the archive relative to the discovery root (empty for
    /// files directly under the root).
    #[must_use]
    pub fn relative_dir(&self) -> &Path {
        self.relative.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name without the project extension.
    ///
    /// Falls back to the full file name when stripping the extension would
    /// leave nothing (a file literally named `.sb3`).
    #[must_use]
    pub fn base_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = format!(".{}", self.extension);

        match name.strip_suffix(&suffix) {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => name,
        }
    }
}

/// Finds every file below `root` whose name ends with `.<extension>`.
///
/// The walk is depth-first with unbounded depth and does not follow symbolic
/// links, so symlinked projects and directories are skipped. Entries within a
/// directory are visited in file-name order; callers must not rely on the
/// order across platforms. Matching is case-sensitive.
///
/// # Errors
///
/// Returns `PackError::Discovery` if `root` does not exist, is not a
/// directory, or any directory below it cannot be read.
///
/// # Examples
///
/// ```no_run
/// use sb3pack_core::discovery::discover;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// for project in discover("./sb3", "sb3")? {
///     println!("{}", project.path().display());
/// }
/// # Ok(())
/// # }
/// ```
pub fn discover(root: impl AsRef<Path>, extension: &str) -> Result<Vec<SourceFile>> {
    let root = root.as_ref();
    let root = canonical_root(root)?;
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let extension = suffix[1..].to_string();

    let mut found = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| PackError::Discovery {
            path: e.path().map_or_else(|| root.clone(), Path::to_path_buf),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(&suffix));
        if !matches {
            continue;
        }

        let path = entry.into_path();
        let relative = path
            .strip_prefix(&root)
            .map_or_else(|_| path.clone(), Path::to_path_buf);
        debug!(path = %path.display(), "discovered project");
        found.push(SourceFile {
            path,
            relative,
            extension: extension.clone(),
        });
    }

    debug!(root = %root.display(), count = found.len(), "discovery finished");
    Ok(found)
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    let metadata = std::fs::metadata(root).map_err(|e| PackError::Discovery {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(PackError::Discovery {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    root.canonicalize().map_err(|e| PackError::Discovery {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"project").unwrap();
    }

    #[test]
    fn test_finds_nested_projects() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "top.sb3");
        touch(temp.path(), "a/proj1.sb3");
        touch(temp.path(), "b/c/proj2.sb3");
        touch(temp.path(), "b/c/readme.txt");

        let found = discover(temp.path(), PROJECT_EXTENSION).unwrap();
        let mut rel: Vec<_> = found
            .iter()
            .map(|f| f.relative_path().to_string_lossy().replace('\\', "/"))
            .collect();
        rel.sort();
        assert_eq!(rel, vec!["a/proj1.sb3", "b/c/proj2.sb3", "top.sb3"]);
        assert!(found.iter().all(|f| f.path().is_absolute()));
    }

    #[test]
    fn test_empty_tree() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "notes/todo.md");
        assert!(discover(temp.path(), "sb3").unwrap().is_empty());
    }

    #[test]
    fn test_extension_is_exact() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "upper.SB3");
        touch(temp.path(), "backup.sb3.bak");
        touch(temp.path(), "old.sb2");
        touch(temp.path(), "real.sb3");

        let found = discover(temp.path(), "sb3").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].base_name(), "real");
    }

    #[test]
    fn test_directory_named_like_project_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("folder.sb3")).unwrap();
        touch(temp.path(), "folder.sb3/inner.sb3");

        let found = discover(temp.path(), "sb3").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].base_name(), "inner");
        assert_eq!(found[0].relative_dir(), Path::new("folder.sb3"));
    }

    #[test]
    fn test_leading_dot_in_extension_is_accepted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "game.sb3");
        assert_eq!(discover(temp.path(), ".sb3").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_root_is_discovery_error() {
        let temp = TempDir::new().unwrap();
        let err = discover(temp.path().join("missing"), "sb3").unwrap_err();
        assert!(matches!(err, PackError::Discovery { .. }));
    }

    #[test]
    fn test_file_root_is_discovery_error() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "game.sb3");
        let err = discover(temp.path().join("game.sb3"), "sb3").unwrap_err();
        assert!(
            matches!(err, PackError::Discovery { ref reason, .. } if reason == "not a directory")
        );
    }

    #[test]
    fn test_base_name_fallback() {
        let file = SourceFile {
            path: PathBuf::from("/projects/.sb3"),
            relative: PathBuf::from(".sb3"),
            extension: "sb3".to_string(),
        };
        assert_eq!(file.base_name(), ".sb3");
        assert_eq!(file.relative_dir(), Path::new(""));
    }
}
