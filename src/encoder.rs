//! Statement generation for LocalStorageFS images.
//!
//! An image is a JavaScript snippet evaluated by the LocalStorageFS runtime.
//! The whole body sits in a guard keyed by a per-run UUID that is persisted
//! under [`MARKER_KEY`](crate::MARKER_KEY): the first evaluation clears the
//! store and repopulates it, later evaluations of the same image are no-ops.

use crate::error::{Error, Result};
use crate::path_mapper::MappedEntry;
use crate::walker::EntryKind;
use crate::writer::StatementWriter;
use crate::MARKER_KEY;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::fs;
use std::io::Write;
use uuid::Uuid;

/// The statement vocabulary understood by the target runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    GuardOpen { id: &'a str },
    ClearStore,
    StoreMarker { id: &'a str },
    CreatePath { path: &'a str },
    MakeDirectories,
    CreateFile,
    ReadEntry,
    SetContent { base64: &'a str },
    WriteEntry,
    GuardClose,
}

impl fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::GuardOpen { id } => {
                write!(f, "if(localStorage.getItem('{}') !== '{}') {{", MARKER_KEY, id)
            }
            Statement::ClearStore => f.write_str("java.io.File.fs.clear();"),
            Statement::StoreMarker { id } => {
                write!(f, "localStorage.setItem('{}', '{}');", MARKER_KEY, id)
            }
            Statement::CreatePath { path } => {
                write!(f, "f = new java.io.File({});", js_string(path))
            }
            Statement::MakeDirectories => f.write_str("f.mkdirs();"),
            Statement::CreateFile => f.write_str("f.createNewFile();"),
            Statement::ReadEntry => {
                f.write_str("e = java.io.File.fs.getEntry(f.getAbsolutePath());")
            }
            Statement::SetContent { base64 } => write!(f, "e.data = '{}';", base64),
            Statement::WriteEntry => {
                f.write_str("java.io.File.fs.putEntry(f.getAbsolutePath(), e);")
            }
            Statement::GuardClose => f.write_str("}"),
        }
    }
}

/// Quotes `s` as a double-quoted JavaScript string literal.
pub fn js_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Emits an image into `W`, one statement group per entry.
///
/// Call [`begin`](Self::begin) once, [`encode`](Self::encode) per entry in
/// traversal order, then [`finish`](Self::finish) to close the guard.
pub struct ImageEncoder<W: Write> {
    writer: StatementWriter<W>,
    id: String,
    directories: usize,
    files: usize,
}

impl<W: Write> ImageEncoder<W> {
    /// Creates an encoder keyed by a freshly generated identifier.
    pub fn new(out: W) -> Self {
        Self::with_id(out, Uuid::new_v4())
    }

    pub fn with_id(out: W, id: Uuid) -> Self {
        Self {
            writer: StatementWriter::new(out),
            id: id.hyphenated().to_string(),
            directories: 0,
            files: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn directories(&self) -> usize {
        self.directories
    }

    pub fn files(&self) -> usize {
        self.files
    }

    /// Opens the guard, resets the store and records the marker.
    pub fn begin(&mut self) -> Result<()> {
        let id = self.id.clone();
        self.emit(Statement::GuardOpen { id: &id })?;
        self.writer.increase_indent();
        self.emit(Statement::ClearStore)?;
        self.emit(Statement::StoreMarker { id: &id })
    }

    /// Emits the statement group for one entry.
    ///
    /// File content is read in full before anything is written, so an
    /// [`Error::ReadEntry`] leaves the output untouched and the caller may
    /// carry on with the next entry. Any other error is fatal.
    pub fn encode(&mut self, mapped: &MappedEntry) -> Result<()> {
        let path = mapped.destination.as_str();
        match mapped.entry.kind {
            EntryKind::Directory => {
                self.emit(Statement::CreatePath { path })?;
                self.emit(Statement::MakeDirectories)?;
                self.directories += 1;
            }
            EntryKind::File => {
                let content = fs::read(&mapped.entry.path).map_err(|source| Error::ReadEntry {
                    path: mapped.entry.path.clone(),
                    source,
                })?;
                let base64 = STANDARD.encode(content);

                self.emit(Statement::CreatePath { path })?;
                self.emit(Statement::CreateFile)?;
                self.emit(Statement::ReadEntry)?;
                self.emit(Statement::SetContent { base64: &base64 })?;
                self.emit(Statement::WriteEntry)?;
                self.files += 1;
            }
        }
        Ok(())
    }

    /// Closes the guard, flushes and hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.writer.decrease_indent();
        self.emit(Statement::GuardClose)?;
        self.writer.flush().map_err(Error::WriteImage)?;
        Ok(self.writer.into_inner())
    }

    fn emit(&mut self, statement: Statement<'_>) -> Result<()> {
        self.writer
            .write_line(&statement.to_string())
            .map_err(Error::WriteImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::FilesystemEntry;
    use std::io;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn encoder() -> ImageEncoder<Vec<u8>> {
        ImageEncoder::with_id(Vec::new(), Uuid::parse_str(ID).unwrap())
    }

    fn mapped(path: &Path, kind: EntryKind, destination: &str) -> MappedEntry {
        MappedEntry {
            entry: FilesystemEntry {
                path: path.to_path_buf(),
                kind,
                relative: destination.to_string(),
            },
            destination: destination.to_string(),
        }
    }

    fn output(encoder: ImageEncoder<Vec<u8>>) -> String {
        String::from_utf8(encoder.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_image_has_guard_clear_and_marker() {
        let mut enc = encoder();
        enc.begin().unwrap();
        let expected = format!(
            "if(localStorage.getItem('lsfs.id') !== '{id}') {{\n    java.io.File.fs.clear();\n    localStorage.setItem('lsfs.id', '{id}');\n}}\n",
            id = ID
        );
        assert_eq!(output(enc), expected);
    }

    #[test]
    fn test_directory_group() {
        let tmp = TempDir::new().unwrap();
        let mut enc = encoder();
        enc.begin().unwrap();
        enc.encode(&mapped(tmp.path(), EntryKind::Directory, "app/css"))
            .unwrap();
        assert_eq!(enc.directories(), 1);

        let text = output(enc);
        assert!(text.contains("    f = new java.io.File(\"app/css\");\n    f.mkdirs();\n"));
    }

    #[test]
    fn test_file_group_carries_base64_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("keep.txt");
        fs::write(&file, "hi").unwrap();

        let mut enc = encoder();
        enc.begin().unwrap();
        enc.encode(&mapped(&file, EntryKind::File, "keep.txt")).unwrap();
        assert_eq!(enc.files(), 1);

        let text = output(enc);
        let group = "    f = new java.io.File(\"keep.txt\");\n    f.createNewFile();\n    e = java.io.File.fs.getEntry(f.getAbsolutePath());\n    e.data = 'aGk=';\n    java.io.File.fs.putEntry(f.getAbsolutePath(), e);\n";
        assert!(text.contains(group), "unexpected image:\n{}", text);
    }

    #[test]
    fn test_unreadable_file_leaves_output_untouched() {
        let tmp = TempDir::new().unwrap();
        let mut enc = encoder();
        enc.begin().unwrap();
        let before = enc.writer.depth();

        let missing = PathBuf::from(tmp.path()).join("gone.txt");
        let err = enc
            .encode(&mapped(&missing, EntryKind::File, "gone.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::ReadEntry { .. }));
        assert_eq!(enc.files(), 0);
        assert_eq!(enc.writer.depth(), before);

        let text = output(enc);
        assert!(!text.contains("gone.txt"));
    }

    #[test]
    fn test_fresh_identifier_per_encoder() {
        let a = ImageEncoder::new(Vec::new());
        let b = ImageEncoder::new(Vec::new());
        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());
    }

    #[test]
    fn test_sink_failure_is_fatal() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut enc = ImageEncoder::new(Broken);
        let err = enc.begin().unwrap_err();
        assert!(matches!(err, Error::WriteImage(_)));
    }

    #[test]
    fn test_js_string_escaping() {
        assert_eq!(js_string("plain/path.txt"), "\"plain/path.txt\"");
        assert_eq!(js_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(js_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(js_string("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(js_string("bell\u{7}"), "\"bell\\u0007\"");
    }
}
