//! Line File - whole-file text I/O for table storage.
//!
//! The [`LineFile`] handles all direct file operations:
//! - Reading every line of a table file
//! - Rewriting the whole file from a line sequence
//! - Creating the file and its directory

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// A text file addressed as an ordered sequence of lines.
///
/// # File Layout
/// ```text
/// line 0   id,name,age            <- header
/// line 1   "k1","Ann",31          <- body
/// line 2   "k2","Bob",null        <- body
/// ```
///
/// Every line ends with `\n`. No handle is held between calls: each read or
/// write opens the file and closes it before returning, on success and on
/// failure.
///
/// # Thread Safety
/// `LineFile` does no locking. Two writers on the same path interleave
/// whole-file rewrites and the last one wins.
///
/// # Durability
/// A rewrite never truncates the live file: it writes `.<name>.tmp` in the
/// same directory and renames it over the target. When `sync` is set, the
/// temp file is `fsync()`ed before the rename.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
    sync: bool,
}

impl LineFile {
    /// Create (or truncate) the file, creating its parent directory first.
    ///
    /// # Errors
    /// Returns `Error::StorageInit` if the directory or file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::init(dir, e))?;
        }
        File::create(&path).map_err(|e| Error::init(&path, e))?;

        Ok(Self { path, sync })
    }

    /// Create a brand-new file; fails if one already exists.
    ///
    /// # Errors
    /// Returns `Error::StorageInit` if the file exists or cannot be created.
    pub fn create_new<P: AsRef<Path>>(path: P, sync: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::init(dir, e))?;
        }
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::init(&path, e))?;

        Ok(Self { path, sync })
    }

    /// Attach to an existing file without reading it.
    ///
    /// Returns `None` if nothing exists at `path`.
    pub fn existing<P: AsRef<Path>>(path: P, sync: bool) -> Option<Self> {
        let path = path.as_ref();
        path.is_file().then(|| Self {
            path: path.to_path_buf(),
            sync,
        })
    }

    /// Read every line of the file.
    ///
    /// A trailing newline does not produce an extra empty line.
    ///
    /// # Errors
    /// Returns `Error::StorageIo` if the file cannot be opened or read.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;

        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::io(&self.path, e))
    }

    /// Replace the whole file with `lines`.
    ///
    /// The new content goes to a sibling temp file first and is renamed over
    /// the target, so a failed write leaves the previous content in place.
    ///
    /// # Errors
    /// Returns `Error::StorageIo` if the file cannot be written.
    pub fn write_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        let tmp = self.temp_path();

        let result = self
            .write_to(&tmp, lines)
            .and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(Error::io(&self.path, e));
        }

        Ok(())
    }

    fn write_to<S: AsRef<str>>(&self, tmp: &Path, lines: &[S]) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(tmp)?);
        for line in lines {
            writer.write_all(line.as_ref().as_bytes())?;
            writer.write_all(b"\n")?;
        }

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.sync {
            file.sync_all()?; // fsync before publishing
        }
        Ok(())
    }

    /// `dir/.name.tmp` next to the backing file.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
