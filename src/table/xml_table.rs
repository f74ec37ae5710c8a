//! XML Table - the structured-document variant.
//!
//! Only attaching to an existing file works. The document format is not
//! defined yet, so every other operation fails with
//! [`Error::Unimplemented`].

use std::path::Path;

use crate::common::config::XML_EXTENSION;
use crate::common::{Error, Result, TableConfig, Value};
use crate::storage::LineFile;
use crate::table::{Rows, Table};

const VARIANT: &str = "xml";

/// Structured-document table sharing the [`Table`] contract.
#[derive(Debug)]
pub struct XmlTable {
    name: String,
    file: LineFile,
}

impl XmlTable {
    /// Create a fresh table.
    ///
    /// # Errors
    /// Always `Error::Unimplemented`; nothing is written.
    pub fn create<S: AsRef<str>>(
        _config: &TableConfig,
        _name: &str,
        _columns: &[S],
    ) -> Result<Self> {
        Err(not_implemented("create"))
    }

    /// Attach to an existing document without parsing it.
    ///
    /// # Errors
    /// Returns `Error::TableNotFound` if there is no file for `name`.
    pub fn open(config: &TableConfig, name: &str) -> Result<Self> {
        let path = config.path_for(name, XML_EXTENSION);
        let file = LineFile::existing(&path, config.sync_writes()).ok_or_else(|| {
            Error::TableNotFound {
                name: name.to_string(),
                path: path.clone(),
            }
        })?;

        Ok(Self {
            name: name.to_string(),
            file,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn not_implemented(operation: &'static str) -> Error {
    Error::Unimplemented {
        variant: VARIANT,
        operation,
    }
}

impl Table for XmlTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> Result<Vec<String>> {
        Err(not_implemented("columns"))
    }

    fn degree(&self) -> Result<usize> {
        Err(not_implemented("degree"))
    }

    fn size(&self) -> Result<usize> {
        Err(not_implemented("size"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(not_implemented("clear"))
    }

    fn put(&mut self, _key: &str, _values: Vec<Value>) -> Result<Option<Vec<Value>>> {
        Err(not_implemented("put"))
    }

    fn get(&mut self, _key: &str) -> Result<Option<Vec<Value>>> {
        Err(not_implemented("get"))
    }

    fn remove(&mut self, _key: &str) -> Result<Option<Vec<Value>>> {
        Err(not_implemented("remove"))
    }

    fn rows(&self) -> Result<Rows> {
        Err(not_implemented("rows"))
    }

    fn fingerprint(&self) -> Result<u32> {
        Err(not_implemented("fingerprint"))
    }
}
