//! Conversion jobs and destination planning.

use std::path::Path;
use std::path::PathBuf;

use crate::BatchConfig;
use crate::OutputLayout;
use crate::discovery::SourceFile;

/// Name of the entry page the packager generates inside a zip.
pub const PRIMARY_PAGE: &str = "index.html";

/// Where a job writes its artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// A single output file.
    File(PathBuf),
    /// A directory receiving the expanded artifact.
    Directory {
        /// Directory root.
        root: PathBuf,
        /// File name the primary page should end up with, if renamed.
        primary_page: Option<String>,
    },
}

impl Destination {
    /// The file or directory this destination claims.
    #[must_use]
    pub fn root(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::Directory { root, .. } => root,
        }
    }
}

/// One project paired with its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// The project archive.
    pub source: SourceFile,
    /// Where its artifact is written.
    pub destination: Destination,
}

/// A job as produced by [`plan_jobs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedJob {
    /// The job owns its destination.
    Ready(ConversionJob),
    /// An earlier job already claimed this destination, or one nested with it.
    Collision(ConversionJob),
}

impl PlannedJob {
    /// The underlying job.
    #[must_use]
    pub const fn job(&self) -> &ConversionJob {
        match self {
            Self::Ready(job) | Self::Collision(job) => job,
        }
    }
}

/// Computes the destination of `source` under `config`.
///
/// # Examples
///
/// ```
/// use sb3pack_core::BatchConfig;
/// use sb3pack_core::OutputLayout;
/// use sb3pack_core::Preset;
/// use sb3pack_core::job::Destination;
/// use sb3pack_core::job::destination_for;
/// # use sb3pack_core::discovery::discover;
/// # let temp = tempfile::TempDir::new().unwrap();
/// # std::fs::create_dir_all(temp.path().join("a")).unwrap();
/// # std::fs::write(temp.path().join("a/game.sb3"), b"x").unwrap();
/// # let source = discover(temp.path(), "sb3").unwrap().remove(0);
///
/// let config = BatchConfig::new(temp.path())
///     .with_dest_root("out")
///     .with_layout(OutputLayout::SingleFile)
///     .with_preset(Preset::Html);
/// assert_eq!(
///     destination_for(&source, &config),
///     Destination::File("out/game.html".into())
/// );
/// ```
#[must_use]
pub fn destination_for(source: &SourceFile, config: &BatchConfig) -> Destination {
    let dest_root = config.dest_root();
    let base = source.base_name();
    let primary_page = config.rename_primary_page.then(|| format!("{base}.html"));

    match config.layout {
        OutputLayout::SingleFile => {
            let name = format!("{base}.{}", config.preset.output_extension());
            Destination::File(dest_root.join(name))
        }
        OutputLayout::FlatFolder => Destination::Directory {
            root: dest_root.join(&base),
            primary_page,
        },
        OutputLayout::Mirrored => Destination::Directory {
            root: dest_root.join(source.relative_dir()).join(&base),
            primary_page,
        },
    }
}

/// Pairs every source with its destination, in input order.
///
/// The first job to claim a destination root keeps it. A later job whose root
/// equals, contains or sits inside an already claimed root is returned as
/// [`PlannedJob::Collision`].
#[must_use]
pub fn plan_jobs(sources: &[SourceFile], config: &BatchConfig) -> Vec<PlannedJob> {
    let mut claimed: Vec<PathBuf> = Vec::with_capacity(sources.len());

    sources
        .iter()
        .map(|source| {
            let destination = destination_for(source, config);
            let root = destination.root();
            let overlaps = claimed.iter().any(|c| c.starts_with(root) || root.starts_with(c));
            if !overlaps {
                claimed.push(root.to_path_buf());
            }

            let job = ConversionJob {
                source: source.clone(),
                destination,
            };
            if overlaps {
                PlannedJob::Collision(job)
            } else {
                PlannedJob::Ready(job)
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Preset;
    use crate::discovery::discover;
    use std::fs;
    use tempfile::TempDir;

    fn sources(files: &[&str]) -> (TempDir, Vec<SourceFile>) {
        let temp = TempDir::new().unwrap();
        for rel in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"x").unwrap();
        }
        let found = discover(temp.path(), "sb3").unwrap();
        (temp, found)
    }

    #[test]
    fn test_mirrored_layout_keeps_relative_dirs() {
        let (temp, found) = sources(&["a/proj1.sb3", "b/c/proj2.sb3"]);
        let config = BatchConfig::new(temp.path()).with_dest_root("out");

        let roots: Vec<_> = plan_jobs(&found, &config)
            .iter()
            .map(|p| p.job().destination.root().to_path_buf())
            .collect();
        assert_eq!(
            roots,
            vec![
                PathBuf::from("out/a/proj1"),
                PathBuf::from("out/b/c/proj2")
            ]
        );
    }

    #[test]
    fn test_in_place_default_writes_next_to_source() {
        let (temp, found) = sources(&["games/pong.sb3"]);
        let root = temp.path().canonicalize().unwrap();
        let config = BatchConfig::new(&root);

        let dest = destination_for(&found[0], &config);
        assert_eq!(
            dest,
            Destination::Directory {
                root: root.join("games").join("pong"),
                primary_page: Some("pong.html".to_string()),
            }
        );
    }

    #[test]
    fn test_flat_layout_without_rename() {
        let (temp, found) = sources(&["deep/nested/maze.sb3"]);
        let config = BatchConfig::new(temp.path())
            .with_dest_root("dist")
            .with_layout(OutputLayout::FlatFolder)
            .with_rename_primary_page(false);

        assert_eq!(
            destination_for(&found[0], &config),
            Destination::Directory {
                root: PathBuf::from("dist/maze"),
                primary_page: None,
            }
        );
    }

    #[test]
    fn test_single_file_extension_follows_preset() {
        let (temp, found) = sources(&["maze.sb3"]);
        let config = BatchConfig::new(temp.path())
            .with_dest_root("dist")
            .with_layout(OutputLayout::SingleFile);

        let zip = destination_for(&found[0], &config.clone().with_preset(Preset::Zip));
        let html = destination_for(&found[0], &config.with_preset(Preset::HtmlResizable));
        assert_eq!(zip, Destination::File(PathBuf::from("dist/maze.zip")));
        assert_eq!(html, Destination::File(PathBuf::from("dist/maze.html")));
    }

    #[test]
    fn test_flat_layout_collision_marks_later_job() {
        let (temp, found) = sources(&["x/game.sb3", "y/game.sb3", "z/other.sb3"]);
        let config = BatchConfig::new(temp.path())
            .with_dest_root("dist")
            .with_layout(OutputLayout::FlatFolder);

        let planned = plan_jobs(&found, &config);
        assert!(matches!(planned[0], PlannedJob::Ready(_)));
        assert!(matches!(planned[1], PlannedJob::Collision(_)));
        assert!(matches!(planned[2], PlannedJob::Ready(_)));
    }

    #[test]
    fn test_mirrored_layout_has_no_collisions_for_same_names() {
        let (temp, found) = sources(&["x/game.sb3", "y/game.sb3"]);
        let config = BatchConfig::new(temp.path()).with_dest_root("dist");

        assert!(
            plan_jobs(&found, &config)
                .iter()
                .all(|p| matches!(p, PlannedJob::Ready(_)))
        );
    }

    #[test]
    fn test_nested_roots_collide() {
        let (temp, found) = sources(&["level.sb3", "level/inner.sb3"]);
        let config = BatchConfig::new(temp.path()).with_dest_root("out");

        let planned = plan_jobs(&found, &config);
        assert_eq!(planned.len(), 2);
        // "level" sorts before "level.sb3", so the inner project claims first.
        assert!(planned[0].job().source.path().ends_with("level/inner.sb3"));
        assert!(matches!(planned[0], PlannedJob::Ready(_)));
        assert!(matches!(planned[1], PlannedJob::Collision(_)));
        assert_eq!(
            planned[1].job().destination.root(),
            PathBuf::from("out/level").as_path()
        );
    }

    #[test]
    fn test_sibling_prefix_names_do_not_collide() {
        let (temp, found) = sources(&["level.sb3", "level2/inner.sb3"]);
        let config = BatchConfig::new(temp.path()).with_dest_root("out");

        assert!(
            plan_jobs(&found, &config)
                .iter()
                .all(|p| matches!(p, PlannedJob::Ready(_)))
        );
    }
}
