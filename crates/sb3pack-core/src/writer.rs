//! Materializing packaged artifacts on disk.
//!
//! Documents are written as-is. Archives are either kept as a single zip file
//! or expanded into a directory tree; after expansion the generated
//! `index.html` can be renamed to a caller-chosen name.
//!
//! Existing files are overwritten without prompting. Files left over from a
//! previous, differently shaped artifact are only removed when
//! [`WriteOptions::clean`] is set.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::PackError;
use crate::Result;
use crate::job::Destination;
use crate::job::PRIMARY_PAGE;
use crate::packager::PackagedArtifact;
use crate::report::WriteReport;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Options for [`write_artifact`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Remove an existing destination directory before expanding into it.
    pub clean: bool,
}

/// Writes `artifact` to `destination`.
///
/// # Errors
///
/// Returns an error if:
/// - A file or directory cannot be created (`PackError::Write`)
/// - The archive is not a readable zip (`PackError::InvalidArchive`)
/// - An entry would land outside the destination (`PackError::UnsafeEntry`)
///
/// A missing primary page is not an error; it is logged and recorded as a
/// warning in the returned report.
///
/// # Examples
///
/// ```no_run
/// use sb3pack_core::PackagedArtifact;
/// use sb3pack_core::job::Destination;
/// use sb3pack_core::writer::WriteOptions;
/// use sb3pack_core::writer::write_artifact;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let artifact = PackagedArtifact::Document(b"<html></html>".to_vec());
/// let report = write_artifact(
///     &artifact,
///     &Destination::File("dist/game.html".into()),
///     &WriteOptions::default(),
/// )?;
/// assert_eq!(report.files_written, 1);
/// # Ok(())
/// # }
/// ```
pub fn write_artifact(
    artifact: &PackagedArtifact,
    destination: &Destination,
    options: &WriteOptions,
) -> Result<WriteReport> {
    let mut report = WriteReport::new();

    match destination {
        Destination::File(path) => {
            write_file(path, artifact.bytes(), &mut report)?;
            if !artifact.is_archive() {
                report.primary_page = Some(path.clone());
            }
        }
        Destination::Directory { root, primary_page } => {
            if options.clean && root.is_dir() {
                debug!(path = %root.display(), "removing previous output");
                fs::remove_dir_all(root).map_err(|e| PackError::write(root, e))?;
            }
            create_dir(root)?;

            match artifact {
                PackagedArtifact::Document(bytes) => {
                    let name = primary_page.as_deref().unwrap_or(PRIMARY_PAGE);
                    let path = root.join(name);
                    write_file(&path, bytes, &mut report)?;
                    report.primary_page = Some(path);
                }
                PackagedArtifact::Archive(bytes) => {
                    expand_archive(bytes, root, &mut report)?;
                    settle_primary_page(root, primary_page.as_deref(), &mut report);
                }
            }
        }
    }

    Ok(report)
}

/// Expands every entry of the zip in `bytes` below `root`.
fn expand_archive(bytes: &[u8], root: &Path, report: &mut WriteReport) -> Result<()> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let relative = entry.enclosed_name().ok_or_else(|| PackError::UnsafeEntry {
            name: entry.name().to_string(),
        })?;
        let target = root.join(&relative);

        if entry.is_dir() {
            create_dir(&target)?;
            report.directories_created += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }

        let file = File::create(&target).map_err(|e| PackError::write(&target, e))?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let written =
            std::io::copy(&mut entry, &mut writer).map_err(|e| PackError::write(&target, e))?;
        writer.flush().map_err(|e| PackError::write(&target, e))?;

        debug!(entry = %relative.display(), bytes = written, "extracted entry");
        report.files_written += 1;
        report.bytes_written = report.bytes_written.saturating_add(written);
    }

    Ok(())
}

/// Renames the generated page and records where it ended up.
///
/// Every failure here is downgraded to a warning: the rest of the output is
/// still usable without the rename.
fn settle_primary_page(root: &Path, rename_to: Option<&str>, report: &mut WriteReport) {
    let generated = root.join(PRIMARY_PAGE);

    if !generated.is_file() {
        if rename_to.is_some() {
            let message = format!(
                "{PRIMARY_PAGE} not found in {}; primary page not renamed",
                root.display()
            );
            warn!("{message}");
            report.add_warning(message);
        }
        return;
    }

    let Some(name) = rename_to.filter(|name| *name != PRIMARY_PAGE) else {
        report.primary_page = Some(generated);
        return;
    };

    let renamed = root.join(name);
    match fs::rename(&generated, &renamed) {
        Ok(()) => {
            debug!(from = %generated.display(), to = %renamed.display(), "renamed primary page");
            report.primary_page = Some(renamed);
        }
        Err(e) => {
            let message = format!("could not rename {}: {e}", generated.display());
            warn!("{message}");
            report.add_warning(message);
            report.primary_page = Some(generated);
        }
    }
}

fn write_file(path: &Path, bytes: &[u8], report: &mut WriteReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    fs::write(path, bytes).map_err(|e| PackError::write(path, e))?;

    report.files_written += 1;
    report.bytes_written = report.bytes_written.saturating_add(bytes.len() as u64);
    Ok(())
}

/// Idempotent `create_dir_all` with path context on failure.
fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| PackError::write(path, e))
}
