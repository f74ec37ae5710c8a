//! Configuration for table storage.
//!
//! Every table is constructed with an explicit [`TableConfig`]; there is no
//! process-wide base directory.

use std::path::{Path, PathBuf};

/// Field separator used in the header line and in every body line.
pub const SEPARATOR: char = ',';

/// Quote character wrapped around text values and keys.
pub const QUOTE: char = '"';

/// Literal written for a null value.
pub const NULL_LITERAL: &str = "null";

/// File extension of the line-delimited text variant.
pub const CSV_EXTENSION: &str = "csv";

/// File extension of the structured-document variant.
pub const XML_EXTENSION: &str = "xml";

/// Base directory used when none is configured.
pub const DEFAULT_BASE_DIR: &str = "db/tables";

/// Where tables live and how they are written.
///
/// # Example
/// ```
/// use tablestore::TableConfig;
///
/// let config = TableConfig::new("/tmp/tables").with_sync_writes(false);
/// assert_eq!(
///     config.path_for("people", "csv"),
///     std::path::Path::new("/tmp/tables/people.csv")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    base_dir: PathBuf,
    sync_writes: bool,
}

impl TableConfig {
    /// Create a config rooted at `base_dir`, with synced writes.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            sync_writes: true,
        }
    }

    /// Toggle `fsync` after every full-file rewrite.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Directory holding every table file.
    #[inline]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn sync_writes(&self) -> bool {
        self.sync_writes
    }

    /// Backing file for table `name` of a variant with `extension`.
    pub fn path_for(&self, name: &str, extension: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.{extension}"))
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}
