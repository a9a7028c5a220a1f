//! Test utilities for batch conversion.
//!
//! This module provides in-memory zip builders, a deterministic stand-in for
//! the external packager, and helpers for inspecting output trees.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::cell::Cell;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::PackError;
use crate::PackagedArtifact;
use crate::Packager;
use crate::Preset;
use crate::Result;
use crate::report::BatchProgress;
use crate::report::BatchReport;
use crate::report::WriteReport;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed.
///
/// # Examples
///
/// ```
/// use sb3pack_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("index.html", b"<html>")]);
/// assert!(zip_data.starts_with(b"PK"));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builder for ZIP test archives with files and explicit directory entries.
///
/// # Examples
///
/// ```
/// use sb3pack_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("index.html", b"<html>")
///     .add_directory("assets/")
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644)
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.writer.start_file(path, Self::options()).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.writer
            .add_directory(path, Self::options().unix_permissions(0o755))
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic packager for tests.
///
/// Archive presets produce a zip with `index.html` and
/// `assets/project.json` (holding the project bytes); document presets
/// produce a single HTML page. A project whose bytes contain `FAIL` makes
/// the call fail with `PackError::Packaging`.
#[derive(Debug, Default)]
pub struct FakePackager {
    calls: Cell<usize>,
}

impl FakePackager {
    /// Creates a new fake packager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `pack` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Packager for FakePackager {
    fn pack(&self, project: &[u8], preset: Preset) -> Result<PackagedArtifact> {
        self.calls.set(self.calls.get() + 1);

        if project.windows(4).any(|w| w == b"FAIL") {
            return Err(PackError::Packaging {
                reason: "project refused by fake packager".to_string(),
            });
        }

        let page = format!("<html><body data-preset=\"{preset}\"></body></html>");
        let bytes = if preset.produces_archive() {
            ZipTestBuilder::new()
                .add_file("index.html", page.as_bytes())
                .add_directory("assets/")
                .add_file("assets/project.json", project)
                .build()
        } else {
            page.into_bytes()
        };

        PackagedArtifact::from_output(bytes, preset)
    }
}

/// Progress callback that records what it was told.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    /// Number of job starts.
    pub started: usize,
    /// Destinations of successful jobs.
    pub succeeded: Vec<PathBuf>,
    /// Sources of failed jobs.
    pub failed: Vec<PathBuf>,
    /// Whether `on_complete` ran.
    pub completed: bool,
}

impl BatchProgress for RecordingProgress {
    fn on_job_start(&mut self, _source: &Path, _total: usize, _current: usize) {
        self.started += 1;
    }

    fn on_job_success(&mut self, _source: &Path, destination: &Path, _report: &WriteReport) {
        self.succeeded.push(destination.to_path_buf());
    }

    fn on_job_failure(&mut self, source: &Path, _error: &PackError) {
        self.failed.push(source.to_path_buf());
    }

    fn on_complete(&mut self, _report: &BatchReport) {
        self.completed = true;
    }
}

/// Lists every regular file below `root` as sorted `/`-separated relative
/// paths.
#[must_use]
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}
