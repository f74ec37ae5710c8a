//! Shared table handle with caller-side locking.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::common::{Result, Value};
use crate::table::{Rows, Table};

/// A cloneable handle that serializes every operation on one table.
///
/// Tables do no locking of their own. `SharedTable` holds the table behind a
/// `parking_lot::Mutex`, so each call (load, scan, rewrite) runs to
/// completion before the next one starts. It only protects callers that go
/// through the same handle: a second table opened on the same file, or
/// another process, is not excluded.
///
/// # Example
/// ```no_run
/// use tablestore::{CsvTable, SharedTable, TableConfig, Value};
///
/// let table = CsvTable::create(&TableConfig::default(), "hits", &["page", "count"])?;
/// let shared = SharedTable::new(table);
///
/// let worker = shared.clone();
/// std::thread::spawn(move || worker.put("home", vec![Value::Int(1)])).join().unwrap()?;
/// assert_eq!(shared.get("home")?, Some(vec![Value::Int(1)]));
/// # Ok::<(), tablestore::Error>(())
/// ```
pub struct SharedTable<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for SharedTable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Table> SharedTable<T> {
    pub fn new(table: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    /// Hold the lock across several operations.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    pub fn put(&self, key: &str, values: Vec<Value>) -> Result<Option<Vec<Value>>> {
        self.inner.lock().put(key, values)
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<Value>>> {
        self.inner.lock().get(key)
    }

    pub fn remove(&self, key: &str) -> Result<Option<Vec<Value>>> {
        self.inner.lock().remove(key)
    }

    pub fn size(&self) -> Result<usize> {
        self.inner.lock().size()
    }

    pub fn rows(&self) -> Result<Rows> {
        self.inner.lock().rows()
    }

    pub fn fingerprint(&self) -> Result<u32> {
        self.inner.lock().fingerprint()
    }

    /// Take the table back if this is the last handle.
    pub fn into_inner(self) -> Option<T> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}
