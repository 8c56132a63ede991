//! Common utilities for integration tests
#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lsfs::{ImageBuilder, ImageSummary, Notifier, Options};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A node of the simulated LocalStorageFS store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
}

/// Minimal interpreter for the image statement vocabulary, backed by an
/// in-memory store that persists the guard marker between applications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    pub marker: Option<String>,
    pub nodes: BTreeMap<String, Node>,
}

impl MemoryStore {
    pub fn apply(&mut self, image: &str) {
        let mut skipping = false;
        let mut current_path = String::new();
        let mut current_entry: Option<Node> = None;

        for line in image.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("if(localStorage.getItem('lsfs.id') !== '") {
                let id = rest.trim_end_matches("') {");
                skipping = self.marker.as_deref() == Some(id);
                continue;
            }
            if line == "}" {
                skipping = false;
                continue;
            }
            if skipping {
                continue;
            }

            if line == "java.io.File.fs.clear();" {
                self.nodes.clear();
            } else if let Some(rest) = line.strip_prefix("localStorage.setItem('lsfs.id', '") {
                self.marker = Some(rest.trim_end_matches("');").to_string());
            } else if let Some(rest) = line.strip_prefix("f = new java.io.File(") {
                current_path = unquote(rest.trim_end_matches(");"));
            } else if line == "f.mkdirs();" {
                let mut prefix = String::new();
                for part in current_path.split('/') {
                    if !prefix.is_empty() {
                        prefix.push('/');
                    }
                    prefix.push_str(part);
                    self.nodes.entry(prefix.clone()).or_insert(Node::Dir);
                }
            } else if line == "f.createNewFile();" {
                self.nodes
                    .entry(current_path.clone())
                    .or_insert_with(|| Node::File(Vec::new()));
            } else if line == "e = java.io.File.fs.getEntry(f.getAbsolutePath());" {
                current_entry = self.nodes.get(&current_path).cloned();
            } else if let Some(rest) = line.strip_prefix("e.data = '") {
                let data = STANDARD
                    .decode(rest.trim_end_matches("';"))
                    .expect("content should be valid base64");
                current_entry = Some(Node::File(data));
            } else if line == "java.io.File.fs.putEntry(f.getAbsolutePath(), e);" {
                let entry = current_entry.take().expect("putEntry without getEntry");
                self.nodes.insert(current_path.clone(), entry);
            } else {
                panic!("unknown statement: {}", line);
            }
        }
    }

    pub fn file(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(path) {
            Some(Node::File(data)) => Some(data),
            _ => None,
        }
    }
}

/// Reverses the double-quoted literal produced by the encoder.
fn unquote(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16).expect("bad escape");
                out.push(char::from_u32(code).expect("bad code point"));
            }
            Some(other) => out.push(other),
            None => break,
        }
    }
    out
}

/// Creates `files` (relative path → content) under a fresh temporary directory.
pub fn fixture(files: &[(&str, &[u8])]) -> TempDir {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    for (path, content) in files {
        let path = tmp.path().join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
    }
    tmp
}

/// Builds an image in `base_dir` from a JSON configuration and returns it as text.
pub fn build_image(base_dir: &Path, config: &str) -> (ImageSummary, String) {
    let options = Options::parse(config, Path::new("lsfs.json")).expect("valid configuration");
    let notifier = Notifier::plain(0);
    let summary = ImageBuilder::new(&options, &notifier)
        .expect("filters compile")
        .build(base_dir)
        .expect("image builds");
    let image = fs::read_to_string(&summary.image_path).expect("image is readable");
    (summary, image)
}

/// Destination paths in the order their statement groups appear.
pub fn created_paths(image: &str) -> Vec<String> {
    image
        .lines()
        .filter_map(|line| line.trim().strip_prefix("f = new java.io.File("))
        .map(|rest| unquote(rest.trim_end_matches(");")))
        .collect()
}
