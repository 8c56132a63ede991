pub mod encoder;
pub mod error;
pub mod filter;
pub mod image;
pub mod notifier;
pub mod options;
pub mod path_mapper;
pub mod pattern;
pub mod walker;
pub mod writer;

/// Suffix of generated images. Files carrying it are never put into an image.
pub const IMAGE_EXTENSION: &str = ".lsfs.js";
/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lsfs.json";
/// Store key holding the identifier of the last applied image.
pub const MARKER_KEY: &str = "lsfs.id";

// Re-exports for easy access
pub use encoder::{ImageEncoder, Statement};
pub use error::{Error, Result};
pub use filter::FilterSet;
pub use image::{ImageBuilder, ImageSummary};
pub use notifier::Notifier;
pub use options::{ConfigFile, Options};
pub use path_mapper::{destination_path, is_lossy, relative_path, MappedEntry, PathMapper};
pub use pattern::Pattern;
pub use walker::{DirectoryWalker, EntryKind, FilesystemEntry};
pub use writer::StatementWriter;
