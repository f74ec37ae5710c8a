//! Tables - the keyed record store contract and its variants.
//!
//! # Components
//! - [`Table`] - Operations every storage variant provides
//! - [`BoundedTable`] - Optional fixed-capacity extension
//! - [`CsvTable`] - Self-organizing, line-delimited text variant
//! - [`XmlTable`] - Structured-document variant (not implemented yet)
//! - [`SharedTable`] - Caller-side mutual exclusion around any table
//! - [`TableStats`] - Per-handle access counters

mod csv_table;
mod shared;
mod stats;
mod xml_table;

pub use csv_table::CsvTable;
pub use shared::SharedTable;
pub use stats::{StatsSnapshot, TableStats};
pub use xml_table::XmlTable;

use crate::common::{Result, Row, Value};
use crate::storage::record;

/// A persistent keyed collection of fixed-arity rows.
///
/// Callers are agnostic to the physical encoding: every variant exposes the
/// same operations. `put`, `get` and `remove` return `Ok(None)` when the key
/// was absent and `Ok(Some(values))` with the previous values otherwise, so
/// "no previous row" never looks like "previous row of nulls".
///
/// # Concurrency
/// Implementations do no locking. Two handles on the same backing store,
/// used from different threads or processes, may lose each other's writes.
/// Wrap a handle in [`SharedTable`] (or hold an external lock around each
/// call) when sharing.
pub trait Table {
    /// Logical name, derived from the storage identifier.
    fn name(&self) -> &str;

    /// Column names, key column first.
    fn columns(&self) -> Result<Vec<String>>;

    /// Total column count including the key column.
    fn degree(&self) -> Result<usize> {
        Ok(self.columns()?.len())
    }

    /// Number of rows.
    fn size(&self) -> Result<usize>;

    /// Remove every row, keeping the columns.
    fn clear(&mut self) -> Result<()>;

    /// Insert or replace the row for `key`.
    fn put(&mut self, key: &str, values: Vec<Value>) -> Result<Option<Vec<Value>>>;

    /// Look up the row for `key`.
    fn get(&mut self, key: &str) -> Result<Option<Vec<Value>>>;

    /// Delete the row for `key`.
    fn remove(&mut self, key: &str) -> Result<Option<Vec<Value>>>;

    /// Snapshot of every row in storage order.
    fn rows(&self) -> Result<Rows>;

    /// Sum of every row's content hash.
    ///
    /// Addition commutes, so two tables holding the same rows in a different
    /// physical order fingerprint equal.
    fn fingerprint(&self) -> Result<u32> {
        Ok(self
            .rows()?
            .fold(0u32, |acc, row| acc.wrapping_add(row.content_hash())))
    }

    /// Compare fingerprints with any other table.
    ///
    /// Probabilistic: distinct contents can collide on the 32-bit
    /// fingerprint.
    fn equals(&self, other: &dyn Table) -> Result<bool> {
        Ok(self.fingerprint()? == other.fingerprint()?)
    }

    /// Boxed text grid of the header and every row.
    fn to_pretty_string(&self) -> Result<String> {
        Ok(render_grid(&self.columns()?, self.rows()?))
    }
}

/// A table with a fixed number of slots.
///
/// [`CsvTable`] is unbounded and does not implement this.
pub trait BoundedTable: Table {
    /// Maximum number of rows.
    fn capacity(&self) -> usize;

    fn is_full(&self) -> Result<bool> {
        Ok(self.size()? == self.capacity())
    }

    /// `size / capacity` as floating point.
    fn load_factor(&self) -> Result<f64> {
        Ok(self.size()? as f64 / self.capacity() as f64)
    }
}

/// Rows read from one snapshot of a table.
///
/// Later changes to the table do not affect rows already captured.
#[derive(Debug)]
pub struct Rows {
    inner: std::vec::IntoIter<Row>,
}

impl Rows {
    pub(crate) fn new(rows: Vec<Row>) -> Self {
        Self {
            inner: rows.into_iter(),
        }
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows {}

fn render_grid(columns: &[String], rows: Rows) -> String {
    let body: Vec<Vec<String>> = rows
        .map(|row| {
            std::iter::once(row.key().to_string())
                .chain(row.values().iter().map(record::encode_value))
                .collect()
        })
        .collect();

    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(columns.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; width];
    for cells in std::iter::once(columns).chain(body.iter().map(Vec::as_slice)) {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let line = |cells: &[String]| -> String {
        let mut out = String::new();
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            out.push_str(&format!("| {:<w$} ", cell, w = *w));
        }
        out.push_str("|\n");
        out
    };

    let mut out = rule.clone();
    out.push_str(&line(columns));
    out.push_str(&rule);
    for cells in &body {
        out.push_str(&line(cells.as_slice()));
    }
    if !body.is_empty() {
        out.push_str(&rule);
    }
    out
}
