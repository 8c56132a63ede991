//! Configuration loaded from `lsfs.json` in the working directory.

use crate::error::{Error, Result};
use crate::filter::FilterSet;
use crate::{CONFIG_FILE_NAME, IMAGE_EXTENSION};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The configuration file as written by the user. Every field is optional
/// here; [`ConfigFile::validate`] enforces the mandatory ones.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(rename = "in")]
    input: Option<String>,
    out: Option<String>,
    root: Option<String>,
    include_filter: Option<String>,
    include_dir_filter: Option<String>,
    exclude_filter: Option<String>,
    exclude_dir_filter: Option<String>,
}

impl ConfigFile {
    /// Reads `lsfs.json` from `working_dir` without validating it.
    pub fn load(working_dir: &Path) -> Result<Self> {
        match fs::metadata(working_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(Error::NotADirectory {
                    path: working_dir.to_path_buf(),
                })
            }
            Err(_) => {
                return Err(Error::MissingWorkingDirectory {
                    path: working_dir.to_path_buf(),
                })
            }
        }

        let config_path = working_dir.join(CONFIG_FILE_NAME);
        let json = match fs::read_to_string(&config_path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingConfig {
                    file: CONFIG_FILE_NAME.to_string(),
                    dir: working_dir.to_path_buf(),
                })
            }
            Err(e) => return Err(Error::io("failed to read configuration", config_path, e)),
        };
        Self::parse(&json, &config_path)
    }

    /// Parses configuration JSON. `source` only labels errors.
    pub fn parse(json: &str, source: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|source_err| Error::InvalidConfig {
            path: source.to_path_buf(),
            source: source_err,
        })
    }

    /// Checks the mandatory fields, `in` first.
    pub fn validate(self) -> Result<Options> {
        let input = mandatory("in", self.input)?;
        let out = mandatory("out", self.out)?;
        Ok(Options {
            input,
            out,
            root: self.root,
            include_filter: self.include_filter,
            include_dir_filter: self.include_dir_filter,
            exclude_filter: self.exclude_filter,
            exclude_dir_filter: self.exclude_dir_filter,
        })
    }
}

/// Validated, immutable run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Source root, relative to the working directory unless absolute.
    pub input: String,
    /// Image base name; the image is written to `<out>.lsfs.js`.
    pub out: String,
    /// Virtual destination prefix.
    pub root: Option<String>,
    pub include_filter: Option<String>,
    pub include_dir_filter: Option<String>,
    pub exclude_filter: Option<String>,
    pub exclude_dir_filter: Option<String>,
}

impl Options {
    /// Loads and validates `lsfs.json` from `working_dir`.
    pub fn load(working_dir: &Path) -> Result<Self> {
        ConfigFile::load(working_dir)?.validate()
    }

    /// Parses and validates configuration JSON. `source` only labels errors.
    pub fn parse(json: &str, source: &Path) -> Result<Self> {
        ConfigFile::parse(json, source)?.validate()
    }

    pub fn compile_filters(&self) -> Result<FilterSet> {
        FilterSet::compile(
            self.include_filter.as_deref(),
            self.exclude_filter.as_deref(),
            self.include_dir_filter.as_deref(),
            self.exclude_dir_filter.as_deref(),
        )
    }

    pub fn image_name(&self) -> String {
        format!("{}{}", self.out, IMAGE_EXTENSION)
    }

    pub fn input_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.input)
    }

    pub fn image_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.image_name())
    }
}

fn mandatory(name: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingParameter(name)),
    }
}

struct Field<'a>(&'a Option<String>);

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => f.write_str(value),
            None => f.write_str("null"),
        }
    }
}

/// One-line summary; absent fields print as `null`.
impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ in={}, out={}, root={}, includeFilter={}, includeDirFilter={}, excludeFilter={}, excludeDirFilter={} }}",
            Field(&self.input),
            Field(&self.out),
            Field(&self.root),
            Field(&self.include_filter),
            Field(&self.include_dir_filter),
            Field(&self.exclude_filter),
            Field(&self.exclude_dir_filter),
        )
    }
}
