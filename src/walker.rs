//! Depth-first traversal of the input tree.
//!
//! Within a directory, all direct file children are visited before any
//! subdirectory, each group in directory-listing order. Filters decide
//! whether an entry is reported; they never stop the walker from descending,
//! so a filtered-out directory is omitted while its children are still
//! judged on their own.

use crate::error::{Error, Result};
use crate::filter::FilterSet;
use crate::notifier::Notifier;
use crate::path_mapper::{is_lossy, relative_path};
use crate::IMAGE_EXTENSION;
use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A surviving node of the input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemEntry {
    /// Source path, rooted at the walker's input path.
    pub path: PathBuf,
    pub kind: EntryKind,
    /// `/`-separated path relative to the input root; empty for the root itself.
    pub relative: String,
}

impl FilesystemEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

pub struct DirectoryWalker<'a> {
    input: &'a Path,
    filters: &'a FilterSet,
    notifier: &'a Notifier,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(input: &'a Path, filters: &'a FilterSet, notifier: &'a Notifier) -> Self {
        Self {
            input,
            filters,
            notifier,
        }
    }

    /// Walks the tree, handing every surviving entry to `visit` in traversal
    /// order. An error returned by `visit` stops the walk and is propagated.
    ///
    /// A missing input root is not an error: nothing is visited. Entries that
    /// cannot be reached (broken links, unlistable directories) are skipped
    /// with a warning.
    pub fn walk<F>(&self, visit: &mut F) -> Result<()>
    where
        F: FnMut(FilesystemEntry) -> Result<()>,
    {
        match fs::metadata(self.input) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.notifier.warn(&format!(
                    "input '{}' does not exist, image will be empty",
                    self.input.display()
                ));
                return Ok(());
            }
            Err(e) => return Err(Error::io("failed to stat input", self.input, e)),
        }
        // `filter_entry` is never consulted for the root itself.
        if is_image_file(self.input) {
            self.notifier.debug(&format!(
                "skipping previously generated image: {}",
                self.input.display()
            ));
            return Ok(());
        }

        for result in self.build_walk().build() {
            match result {
                Ok(entry) => self.visit_entry(&entry, visit)?,
                Err(err) => match loop_child(&err) {
                    // The link itself is a directory entry; only its contents repeat.
                    Some(child) => {
                        self.notifier.warn(&format!(
                            "not descending into '{}': directory cycle",
                            child.display()
                        ));
                        self.report(child.to_path_buf(), EntryKind::Directory, visit)?;
                    }
                    None => self.notifier.warn(&format!("skipping entry: {}", err)),
                },
            }
        }
        Ok(())
    }

    fn build_walk(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(self.input);

        // Every entry counts: no ignore files, no hidden-file pruning.
        builder.standard_filters(false);
        // Links are followed; the walker reports cycles as errors.
        builder.follow_links(true);
        // Stable sort: files ahead of subdirectories, listing order within each group.
        builder.sort_by_file_path(|a, b| a.is_dir().cmp(&b.is_dir()));
        // Previous images, and anything below a directory named like one.
        builder.filter_entry(|entry: &DirEntry| !is_image_file(entry.path()));

        builder
    }

    fn visit_entry<F>(&self, entry: &DirEntry, visit: &mut F) -> Result<()>
    where
        F: FnMut(FilesystemEntry) -> Result<()>,
    {
        let kind = match entry.file_type() {
            Some(ft) if ft.is_file() => EntryKind::File,
            Some(ft) if ft.is_dir() => EntryKind::Directory,
            _ => {
                self.notifier.warn(&format!(
                    "skipping '{}': not a regular file or directory",
                    entry.path().display()
                ));
                return Ok(());
            }
        };
        self.report(entry.path().to_path_buf(), kind, visit)
    }

    /// Applies the filters at yield time; descending is never affected.
    fn report<F>(&self, path: PathBuf, kind: EntryKind, visit: &mut F) -> Result<()>
    where
        F: FnMut(FilesystemEntry) -> Result<()>,
    {
        let relative = relative_path(self.input, &path);
        if is_lossy(self.input, &path) {
            self.notifier.warn(&format!(
                "'{}' is not valid UTF-8, stored as '{}'",
                path.display(),
                relative
            ));
        }

        let accepted = match kind {
            EntryKind::File => self.filters.accepts_file(&relative),
            EntryKind::Directory => self.filters.accepts_dir(&relative),
        };
        if accepted {
            visit(FilesystemEntry {
                path,
                kind,
                relative,
            })
        } else {
            self.notifier
                .debug(&format!("{:?} filtered out: '{}'", kind, relative));
            Ok(())
        }
    }
}

/// Whether `path` names a previously generated image.
pub fn is_image_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(IMAGE_EXTENSION))
        .unwrap_or(false)
}

/// The offending link when `err` reports a directory cycle.
fn loop_child(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => loop_child(err),
        _ => None,
    }
}
