//! Relative and destination path computation.
//!
//! Relative paths are always `/`-separated, whatever the host platform, since
//! they are matched against globs and written into the image verbatim.

use crate::walker::FilesystemEntry;
use std::path::{Component, Path};

/// Path of `absolute` relative to `input`, or `""` when they are the same.
pub fn relative_path(input: &Path, absolute: &Path) -> String {
    if absolute == input {
        return String::new();
    }
    match absolute.strip_prefix(input) {
        Ok(rest) => rest
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        // Not under `input`: strip the textual prefix and one separator.
        Err(_) => {
            let input = input.to_string_lossy();
            let absolute = absolute.to_string_lossy();
            match absolute.strip_prefix(&*input) {
                Some(rest) => rest.strip_prefix(['/', '\\']).unwrap_or(rest).to_string(),
                None => absolute.into_owned(),
            }
        }
    }
}

/// Whether [`relative_path`] had to replace bytes of `absolute` that are not
/// valid UTF-8. Two such names can collide once replaced.
pub fn is_lossy(input: &Path, absolute: &Path) -> bool {
    match absolute.strip_prefix(input) {
        Ok(rest) => rest.to_str().is_none(),
        Err(_) => absolute.to_str().is_none(),
    }
}

/// Destination of an entry under the optional virtual root.
pub fn destination_path(root: Option<&str>, relative: &str) -> String {
    match root {
        None => relative.to_string(),
        Some(root) if relative.is_empty() => root.to_string(),
        Some(root) => format!("{}/{}", root, relative),
    }
}

/// A surviving entry together with its path inside the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedEntry {
    pub entry: FilesystemEntry,
    pub destination: String,
}

/// Binds an input root and a virtual root so entries can be mapped in one call.
#[derive(Debug, Clone)]
pub struct PathMapper<'a> {
    input: &'a Path,
    root: Option<&'a str>,
}

impl<'a> PathMapper<'a> {
    pub fn new(input: &'a Path, root: Option<&'a str>) -> Self {
        Self { input, root }
    }

    pub fn relative(&self, absolute: &Path) -> String {
        relative_path(self.input, absolute)
    }

    pub fn destination(&self, relative: &str) -> String {
        destination_path(self.root, relative)
    }

    pub fn map(&self, entry: FilesystemEntry) -> MappedEntry {
        let destination = self.destination(&entry.relative);
        MappedEntry { entry, destination }
    }
}
