//! End-to-end "directory → image" pipeline.
//!
//! [`ImageBuilder`] ties the pieces together in a single pass:
//! - walks the input tree with [`DirectoryWalker`] (filters applied there),
//! - maps every surviving entry to its destination with [`PathMapper`],
//! - encodes it through [`ImageEncoder`] into a temporary file next to the image,
//! - and persists the temporary file as `<out>.lsfs.js` once the guard is closed.
//!
//! A file that cannot be read is logged and skipped; any other failure drops the
//! temporary file so no half-written image is left behind.

use crate::encoder::ImageEncoder;
use crate::error::{Error, Result};
use crate::filter::FilterSet;
use crate::notifier::Notifier;
use crate::options::Options;
use crate::path_mapper::PathMapper;
use crate::walker::DirectoryWalker;
use crate::IMAGE_EXTENSION;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub image_path: PathBuf,
    /// The guard identifier stored as the marker.
    pub id: String,
    pub directories: usize,
    pub files: usize,
    /// Files skipped because their content could not be read.
    pub failed: usize,
}

pub struct ImageBuilder<'a> {
    options: &'a Options,
    filters: FilterSet,
    notifier: &'a Notifier,
}

impl<'a> ImageBuilder<'a> {
    /// Compiles the filters once; a bad pattern is a startup error.
    pub fn new(options: &'a Options, notifier: &'a Notifier) -> Result<Self> {
        let filters = options.compile_filters()?;
        Ok(Self {
            options,
            filters,
            notifier,
        })
    }

    /// Builds the image, resolving `in` and `out` against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<ImageSummary> {
        let input = self.options.input_path(base_dir);
        let image_path = self.options.image_path(base_dir);
        let image_dir = match image_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => base_dir.to_path_buf(),
        };

        self.notifier
            .status(&format!("creating image: {}", self.options.image_name()));
        self.notifier
            .debug(&format!("input directory: {}", input.display()));

        // The image suffix keeps the walker away from the file being written.
        let mut temp_builder = tempfile::Builder::new();
        temp_builder.prefix(".").suffix(IMAGE_EXTENSION);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode as any plainly created file (umask applies), not 0600.
            temp_builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let temp = temp_builder
            .tempfile_in(&image_dir)
            .map_err(|e| Error::io("failed to create image in", &image_dir, e))?;
        let mut encoder = ImageEncoder::new(BufWriter::new(temp));
        self.notifier.debug(&format!("image id: {}", encoder.id()));
        encoder.begin()?;

        let mapper = PathMapper::new(&input, self.options.root.as_deref());
        let walker = DirectoryWalker::new(&input, &self.filters, self.notifier);
        let mut failed = 0;

        walker.walk(&mut |entry| {
            let mapped = mapper.map(entry);
            self.notifier.progress(&format!("encoding {}", mapped.destination));
            match encoder.encode(&mapped) {
                Ok(()) => {
                    self.notifier
                        .status(&format!("adding: {}", mapped.destination));
                    Ok(())
                }
                Err(e @ Error::ReadEntry { .. }) => {
                    self.notifier.warn(&format!("skipping entry: {}", e));
                    failed += 1;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        })?;

        let id = encoder.id().to_string();
        let directories = encoder.directories();
        let files = encoder.files();
        let temp = encoder
            .finish()?
            .into_inner()
            .map_err(|e| Error::WriteImage(e.into_error()))?;
        temp.persist(&image_path)
            .map_err(|e| Error::io("failed to persist image", &image_path, e.error))?;
        self.notifier.finish();

        self.notifier.status(&format!(
            "image '{}' created successfully",
            self.options.image_name()
        ));
        self.notifier.info(&format!(
            "{} directories, {} files, {} unreadable",
            directories, files, failed
        ));

        Ok(ImageSummary {
            image_path,
            id,
            directories,
            files,
            failed,
        })
    }
}
