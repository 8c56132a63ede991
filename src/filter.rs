//! Include/exclude filters, applied independently to files and directories.

use crate::error::{Error, Result};
use crate::pattern::Pattern;

/// The four optional matchers derived from [`crate::Options`].
///
/// File filters never influence directory decisions and vice versa.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub include: Option<Pattern>,
    pub exclude: Option<Pattern>,
    pub include_dir: Option<Pattern>,
    pub exclude_dir: Option<Pattern>,
}

impl FilterSet {
    pub fn compile(
        include: Option<&str>,
        exclude: Option<&str>,
        include_dir: Option<&str>,
        exclude_dir: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            include: compile_field("includeFilter", include)?,
            exclude: compile_field("excludeFilter", exclude)?,
            include_dir: compile_field("includeDirFilter", include_dir)?,
            exclude_dir: compile_field("excludeDirFilter", exclude_dir)?,
        })
    }

    pub fn accepts_file(&self, relative: &str) -> bool {
        accepts(&self.include, &self.exclude, relative)
    }

    pub fn accepts_dir(&self, relative: &str) -> bool {
        accepts(&self.include_dir, &self.exclude_dir, relative)
    }
}

fn compile_field(field: &'static str, glob: Option<&str>) -> Result<Option<Pattern>> {
    glob.map(|glob| {
        Pattern::compile(glob).map_err(|source| Error::InvalidPattern {
            field,
            glob: glob.to_string(),
            source,
        })
    })
    .transpose()
}

fn accepts(include: &Option<Pattern>, exclude: &Option<Pattern>, relative: &str) -> bool {
    if let Some(include) = include {
        if !include.matches(relative) {
            return false;
        }
    }
    if let Some(exclude) = exclude {
        if exclude.matches(relative) {
            return false;
        }
    }
    true
}
