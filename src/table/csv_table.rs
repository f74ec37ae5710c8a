//! CSV Table - the self-organizing, line-delimited text variant.
//!
//! Every operation loads the whole file, scans it linearly, and writes the
//! whole file back. Row order on disk is not insertion order: hits move rows
//! toward the front.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::common::config::{CSV_EXTENSION, SEPARATOR};
use crate::common::{Error, Result, Row, TableConfig, Value};
use crate::storage::record;
use crate::storage::LineFile;
use crate::table::{Rows, Table, TableStats};

/// A keyed table stored as one delimited text file.
///
/// # File Layout
/// ```text
/// ┌──────────────────────────┐
/// │ id,name,age              │  line 0: header (never re-derived)
/// ├──────────────────────────┤
/// │ "k2","Bob",null          │  line 1..N: rows in current
/// │ "k1","Ann",31            │  self-organized order
/// └──────────────────────────┘
/// ```
///
/// # Access Heuristics
/// - `put` on an existing key writes the new row one position earlier than
///   the old one (a hit on the first row stays first).
/// - `get` swaps the hit row with the row before it (a hit on the first row
///   stays put).
/// - `rows`, `size` and `fingerprint` never reorder.
///
/// # Thread Safety
/// No locking. Use one handle from one thread at a time, or wrap it in
/// [`SharedTable`](crate::SharedTable).
///
/// # Usage
/// ```no_run
/// use tablestore::{CsvTable, Table, TableConfig, Value};
///
/// let config = TableConfig::default();
/// let mut table = CsvTable::create(&config, "people", &["id", "name", "age"])?;
///
/// assert_eq!(table.put("k1", vec!["Ann".into(), 31.into()])?, None);
/// assert_eq!(table.get("k1")?, Some(vec![Value::from("Ann"), Value::Int(31)]));
/// # Ok::<(), tablestore::Error>(())
/// ```
#[derive(Debug)]
pub struct CsvTable {
    /// Logical name (the file stem).
    name: String,

    /// Column names, key column first. Fixed at construction.
    columns: Vec<String>,

    /// Encoded header, written back verbatim on every rewrite.
    header: String,

    file: LineFile,

    stats: TableStats,
}

impl CsvTable {
    /// Create a fresh table, replacing any existing file with just a header.
    ///
    /// # Errors
    /// - `Error::InvalidColumns` if `columns` is empty or a name contains the
    ///   separator or a line break
    /// - `Error::StorageInit` if the directory or file cannot be created or
    ///   written
    pub fn create<S: AsRef<str>>(config: &TableConfig, name: &str, columns: &[S]) -> Result<Self> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        validate_columns(&columns)?;

        let path = config.path_for(name, CSV_EXTENSION);
        let file = LineFile::create(&path, config.sync_writes())?;

        let table = Self::attach(file, columns);
        table
            .file
            .write_lines(&[table.header.as_str()])
            .map_err(Error::into_init)?;

        info!(table = %table.name, columns = table.columns.len(), "created table");
        Ok(table)
    }

    /// Reopen an existing table.
    ///
    /// # Errors
    /// - `Error::TableNotFound` if there is no file for `name`
    /// - `Error::StorageInit` if the file cannot be read
    /// - `Error::Decode` if the file has no header line
    pub fn open(config: &TableConfig, name: &str) -> Result<Self> {
        let path = config.path_for(name, CSV_EXTENSION);
        let file = LineFile::existing(&path, config.sync_writes()).ok_or_else(|| {
            Error::TableNotFound {
                name: name.to_string(),
                path: path.clone(),
            }
        })?;

        let lines = file.read_lines().map_err(Error::into_init)?;
        let header = lines.first().ok_or_else(|| Error::Decode {
            line: 0,
            reason: "missing header line".to_string(),
        })?;
        let columns = record::decode_header(header);

        let table = Self::attach(file, columns);
        info!(
            table = %table.name,
            rows = lines.len() - 1,
            "opened table"
        );
        Ok(table)
    }

    /// Store `contents` verbatim as a brand-new table file, then reopen it.
    ///
    /// The first line of `contents` is the header. Every line is checked
    /// before anything is written, so a rejected `contents` leaves no file.
    ///
    /// # Errors
    /// - `Error::Decode` if `contents` has no header line or a body line
    ///   cannot be decoded
    /// - `Error::InvalidColumns` if the header cannot be a column list
    /// - `Error::ArityMismatch` if a body line does not carry `degree - 1`
    ///   values
    /// - `Error::StorageInit` if a file for `name` already exists or cannot
    ///   be written
    pub fn from_string(config: &TableConfig, name: &str, contents: &str) -> Result<Self> {
        let lines: Vec<&str> = contents.lines().collect();
        check_contents(&lines)?;

        let path = config.path_for(name, CSV_EXTENSION);
        let file = LineFile::create_new(&path, config.sync_writes())?;

        let result = file
            .write_lines(&lines)
            .map_err(Error::into_init)
            .and_then(|()| Self::open(config, name));
        if result.is_err() {
            // create_new made this file, so it is ours to drop
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = ?path, error = %e, "cannot remove partial table file");
            }
        }
        result
    }

    fn attach(file: LineFile, columns: Vec<String>) -> Self {
        let name = file
            .path()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let header = record::encode_header(&columns);

        Self {
            name,
            columns,
            header,
            file,
            stats: TableStats::new(),
        }
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Access counters for this handle.
    #[inline]
    pub fn stats(&self) -> &TableStats {
        &self.stats
    }

    /// Number of values every row carries (`degree - 1`).
    #[inline]
    fn arity(&self) -> usize {
        // columns always holds at least the key column
        self.columns.len() - 1
    }

    // ========================================================================
    // Whole-file load / persist
    // ========================================================================

    /// Read the body lines (everything after the header).
    fn load(&self) -> Result<Vec<String>> {
        let mut lines = self.file.read_lines()?;
        self.stats.record_load();

        if !lines.is_empty() {
            lines.remove(0);
        }
        Ok(lines)
    }

    /// Rewrite the whole file as header + `body`.
    fn persist(&self, body: &[String]) -> Result<()> {
        let lines: Vec<&str> = std::iter::once(self.header.as_str())
            .chain(body.iter().map(String::as_str))
            .collect();

        self.file.write_lines(&lines)?;
        self.stats.record_write();
        Ok(())
    }

    /// Decode a body line at zero-based body position `pos`.
    fn decode(&self, line: &str, pos: usize) -> Result<Row> {
        record::decode_row(line, pos + 1).map_err(|e| {
            warn!(table = %self.name, line = pos + 1, error = %e, "corrupt row");
            e
        })
    }

    /// First body position whose key matches, with its decoded row.
    fn find(&self, body: &[String], key: &str) -> Result<Option<(usize, Row)>> {
        for (pos, line) in body.iter().enumerate() {
            let row = self.decode(line, pos)?;
            if row.key() == key {
                return Ok(Some((pos, row)));
            }
        }
        Ok(None)
    }
}

impl Table for CsvTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> Result<Vec<String>> {
        Ok(self.columns.clone())
    }

    fn degree(&self) -> Result<usize> {
        Ok(self.columns.len())
    }

    fn size(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    fn clear(&mut self) -> Result<()> {
        self.persist(&[])?;
        info!(table = %self.name, "cleared table");
        Ok(())
    }

    /// Insert or replace, moving a replaced row one position forward.
    ///
    /// # Errors
    /// Returns `Error::ArityMismatch` before touching storage if
    /// `values.len() != degree - 1`.
    fn put(&mut self, key: &str, values: Vec<Value>) -> Result<Option<Vec<Value>>> {
        if values.len() != self.arity() {
            return Err(Error::ArityMismatch {
                expected: self.arity(),
                actual: values.len(),
            });
        }

        let mut body = self.load()?;
        let line = record::encode_row(key, &values);

        let previous = match self.find(&body, key)? {
            Some((pos, old)) => {
                body.remove(pos);
                let target = pos.saturating_sub(1);
                body.insert(target, line);

                if target != pos {
                    self.stats.record_promotion();
                }
                debug!(table = %self.name, key, from = pos, to = target, "put hit");
                Some(old.into_parts().1)
            }
            None => {
                body.push(line);
                debug!(table = %self.name, key, position = body.len() - 1, "put miss");
                None
            }
        };

        self.stats.record_lookup(previous.is_some());
        self.persist(&body)?;
        Ok(previous)
    }

    /// Look up `key`, swapping a hit with the row before it.
    ///
    /// The file is rewritten even on a miss.
    fn get(&mut self, key: &str) -> Result<Option<Vec<Value>>> {
        let mut body = self.load()?;

        let found = self.find(&body, key)?.map(|(pos, row)| {
            if pos > 0 {
                body.swap(pos - 1, pos);
                self.stats.record_promotion();
            }
            debug!(table = %self.name, key, position = pos, "get hit");
            row.into_parts().1
        });
        if found.is_none() {
            debug!(table = %self.name, key, "get miss");
        }

        self.stats.record_lookup(found.is_some());
        self.persist(&body)?;
        Ok(found)
    }

    fn remove(&mut self, key: &str) -> Result<Option<Vec<Value>>> {
        let mut body = self.load()?;

        let removed = self.find(&body, key)?.map(|(pos, row)| {
            body.remove(pos);
            debug!(table = %self.name, key, position = pos, "remove hit");
            row.into_parts().1
        });
        if removed.is_none() {
            debug!(table = %self.name, key, "remove miss");
        }

        self.stats.record_lookup(removed.is_some());
        self.persist(&body)?;
        Ok(removed)
    }

    fn rows(&self) -> Result<Rows> {
        let body = self.load()?;
        let rows = body
            .iter()
            .enumerate()
            .map(|(pos, line)| self.decode(line, pos))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rows::new(rows))
    }
}

impl fmt::Display for CsvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = self.to_pretty_string().map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

/// Header and body checks for a whole table image.
fn check_contents(lines: &[&str]) -> Result<()> {
    let header = lines.first().ok_or_else(|| Error::Decode {
        line: 0,
        reason: "missing header line".to_string(),
    })?;
    let columns = record::decode_header(header);
    validate_columns(&columns)?;

    let arity = columns.len() - 1;
    for (line_no, line) in lines.iter().enumerate().skip(1) {
        let row = record::decode_row(line, line_no)?;
        if row.values().len() != arity {
            return Err(Error::ArityMismatch {
                expected: arity,
                actual: row.values().len(),
            });
        }
    }
    Ok(())
}

fn validate_columns(columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(Error::InvalidColumns(
            "at least the key column is required".to_string(),
        ));
    }
    if let Some(bad) = columns
        .iter()
        .find(|c| c.contains(SEPARATOR) || c.contains(['\n', '\r']))
    {
        return Err(Error::InvalidColumns(format!(
            "column name {bad:?} contains a separator or line break"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn setup(columns: &[&str]) -> (CsvTable, TempDir) {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path()).with_sync_writes(false);
        let table = CsvTable::create(&config, "t", columns).unwrap();
        (table, dir)
    }

    fn body(table: &CsvTable) -> Vec<String> {
        fs::read_to_string(table.path())
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    fn keys(table: &CsvTable) -> Vec<String> {
        table.rows().unwrap().map(|r| r.key().to_string()).collect()
    }

    // --- construction ---

    #[test]
    fn test_create_writes_only_header() {
        let (table, _dir) = setup(&["id", "name", "age"]);

        assert_eq!(fs::read_to_string(table.path()).unwrap(), "id,name,age\n");
        assert_eq!(table.name(), "t");
        assert_eq!(table.degree().unwrap(), 3);
        assert_eq!(table.size().unwrap(), 0);
    }

    #[test]
    fn test_create_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());
        fs::write(dir.path().join("t.csv"), "x,y\n\"k\",1\n").unwrap();

        let table = CsvTable::create(&config, "t", &["id", "v"]).unwrap();
        assert_eq!(fs::read_to_string(table.path()).unwrap(), "id,v\n");
    }

    #[test]
    fn test_create_rejects_bad_columns() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());

        let empty: [&str; 0] = [];
        assert!(matches!(
            CsvTable::create(&config, "t", &empty),
            Err(Error::InvalidColumns(_))
        ));
        assert!(matches!(
            CsvTable::create(&config, "t", &["id", "a,b"]),
            Err(Error::InvalidColumns(_))
        ));
    }

    #[test]
    fn test_create_in_unwritable_location() {
        let dir = tempdir().unwrap();
        // A regular file where the base directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let config = TableConfig::new(&blocker);

        let result = CsvTable::create(&config, "t", &["id"]);
        assert!(matches!(result, Err(Error::StorageInit { .. })));
    }

    #[test]
    fn test_open_missing() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());

        match CsvTable::open(&config, "nope") {
            Err(Error::TableNotFound { name, .. }) => assert_eq!(name, "nope"),
            other => panic!("Expected TableNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_open_empty_file_has_no_header() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());
        fs::write(dir.path().join("t.csv"), "").unwrap();

        assert!(matches!(
            CsvTable::open(&config, "t"),
            Err(Error::Decode { line: 0, .. })
        ));
    }

    // --- put ---

    #[test]
    fn test_put_arity_mismatch_leaves_file_untouched() {
        let (mut table, _dir) = setup(&["id", "a"]);
        table.put("k", vec![Value::Int(1)]).unwrap();
        let before = fs::read_to_string(table.path()).unwrap();

        let err = table.put("k", vec![Value::Int(1), Value::Int(2)]).unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { expected: 1, actual: 2 }));
        assert!(matches!(
            table.put("z", vec![]),
            Err(Error::ArityMismatch { expected: 1, actual: 0 })
        ));

        assert_eq!(fs::read_to_string(table.path()).unwrap(), before);
    }

    #[test]
    fn test_put_miss_appends() {
        let (mut table, _dir) = setup(&["id", "a"]);

        assert_eq!(table.put("a", vec![Value::Int(1)]).unwrap(), None);
        assert_eq!(table.put("b", vec![Value::Int(2)]).unwrap(), None);

        assert_eq!(body(&table), vec!["\"a\",1", "\"b\",2"]);
    }

    #[test]
    fn test_put_hit_returns_previous() {
        let (mut table, _dir) = setup(&["id", "a"]);

        table.put("a", vec![Value::Int(1)]).unwrap();
        let previous = table.put("a", vec![Value::Int(2)]).unwrap();

        assert_eq!(previous, Some(vec![Value::Int(1)]));
        assert_eq!(table.size().unwrap(), 1);
        assert_eq!(body(&table), vec!["\"a\",2"]);
    }

    #[test]
    fn test_put_hit_previous_null_is_not_a_miss() {
        let (mut table, _dir) = setup(&["id", "a"]);

        table.put("a", vec![Value::Null]).unwrap();
        let previous = table.put("a", vec![Value::Int(2)]).unwrap();

        assert_eq!(previous, Some(vec![Value::Null]));
    }

    #[test]
    fn test_put_hit_moves_one_position_earlier() {
        let (mut table, _dir) = setup(&["id", "v"]);
        for key in ["a", "b", "c"] {
            table.put(key, vec![Value::Int(0)]).unwrap();
        }

        table.put("c", vec![Value::Int(9)]).unwrap();
        assert_eq!(keys(&table), ["a", "c", "b"]);

        table.put("c", vec![Value::Int(10)]).unwrap();
        assert_eq!(keys(&table), ["c", "a", "b"]);

        // Hit on the first row stays first
        table.put("c", vec![Value::Int(11)]).unwrap();
        assert_eq!(keys(&table), ["c", "a", "b"]);
        assert_eq!(body(&table)[0], "\"c\",11");
    }

    // --- get ---

    #[test]
    fn test_get_transposes_toward_front() {
        let (mut table, _dir) = setup(&["id", "v"]);
        for key in ["a", "b", "c"] {
            table.put(key, vec![Value::Text(key.to_uppercase())]).unwrap();
        }

        assert_eq!(table.get("c").unwrap(), Some(vec![Value::Text("C".into())]));
        assert_eq!(keys(&table), ["a", "c", "b"]);

        table.get("c").unwrap();
        assert_eq!(keys(&table), ["c", "a", "b"]);

        // First row: no swap, header untouched
        table.get("c").unwrap();
        assert_eq!(keys(&table), ["c", "a", "b"]);
        assert!(fs::read_to_string(table.path()).unwrap().starts_with("id,v\n"));
    }

    #[test]
    fn test_get_miss() {
        let (mut table, _dir) = setup(&["id", "v"]);
        table.put("a", vec![Value::Int(1)]).unwrap();

        assert_eq!(table.get("zz").unwrap(), None);
        assert_eq!(keys(&table), ["a"]);
    }

    #[test]
    fn test_numeric_looking_key_is_text() {
        let (mut table, _dir) = setup(&["id", "v"]);
        table.put("42", vec![Value::Bool(true)]).unwrap();

        assert_eq!(table.get("42").unwrap(), Some(vec![Value::Bool(true)]));
    }

    // --- remove ---

    #[test]
    fn test_remove_hit_and_miss() {
        let (mut table, _dir) = setup(&["id", "v"]);
        table.put("a", vec![Value::Float(1.5)]).unwrap();
        table.put("b", vec![Value::Null]).unwrap();

        assert_eq!(table.remove("zz").unwrap(), None);
        assert_eq!(table.size().unwrap(), 2);

        assert_eq!(table.remove("a").unwrap(), Some(vec![Value::Float(1.5)]));
        assert_eq!(table.size().unwrap(), 1);
        assert_eq!(keys(&table), ["b"]);
    }

    // --- clear / rows / fingerprint ---

    #[test]
    fn test_clear_keeps_header() {
        let (mut table, _dir) = setup(&["id", "a", "b"]);
        table.put("k", vec![Value::Int(1), Value::Int(2)]).unwrap();

        table.clear().unwrap();

        assert_eq!(table.size().unwrap(), 0);
        assert_eq!(table.degree().unwrap(), 3);
        assert_eq!(table.columns().unwrap(), ["id", "a", "b"]);
        assert_eq!(fs::read_to_string(table.path()).unwrap(), "id,a,b\n");
    }

    #[test]
    fn test_rows_do_not_reorder() {
        let (mut table, _dir) = setup(&["id", "v"]);
        for key in ["a", "b", "c"] {
            table.put(key, vec![Value::Int(0)]).unwrap();
        }
        let before = body(&table);

        let _ = table.rows().unwrap().count();
        let _ = table.fingerprint().unwrap();
        let _ = table.size().unwrap();

        assert_eq!(body(&table), before);
    }

    #[test]
    fn test_fingerprint_of_empty_table_is_zero() {
        let (table, _dir) = setup(&["id"]);
        assert_eq!(table.fingerprint().unwrap(), 0);
    }

    #[test]
    fn test_fingerprint_survives_heuristic_moves() {
        let (mut table, _dir) = setup(&["id", "v"]);
        for key in ["a", "b", "c"] {
            table.put(key, vec![Value::Int(1)]).unwrap();
        }
        let before = table.fingerprint().unwrap();

        table.get("c").unwrap();
        table.get("c").unwrap();

        assert_eq!(table.fingerprint().unwrap(), before);
    }

    #[test]
    fn test_corrupt_row_is_decode_error() {
        let (mut table, _dir) = setup(&["id", "v"]);
        table.put("a", vec![Value::Int(1)]).unwrap();
        fs::write(table.path(), "id,v\n\"a\",1\n\"b\",99999999999\n").unwrap();

        assert!(matches!(table.rows(), Err(Error::Decode { line: 2, .. })));
        // A lookup that stops before the bad line still works
        assert_eq!(table.get("a").unwrap(), Some(vec![Value::Int(1)]));
    }

    // --- factory / display / stats ---

    #[test]
    fn test_from_string() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());

        let table = CsvTable::from_string(&config, "s", "id,v\n\"x\",1\n\"y\",true").unwrap();
        assert_eq!(table.columns().unwrap(), ["id", "v"]);
        assert_eq!(table.size().unwrap(), 2);

        assert!(matches!(
            CsvTable::from_string(&config, "s", "id"),
            Err(Error::StorageInit { .. })
        ));
    }

    #[test]
    fn test_from_string_rejects_wrong_arity() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());

        match CsvTable::from_string(&config, "s", "id,v\n\"x\",1,2,3") {
            Err(Error::ArityMismatch { expected, actual }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 3);
            }
            other => panic!("Expected ArityMismatch, got {other:?}"),
        }
        assert!(!config.path_for("s", CSV_EXTENSION).exists());

        assert!(matches!(
            CsvTable::from_string(&config, "s", "id,v\n\"x\",99999999999"),
            Err(Error::Decode { line: 1, .. })
        ));
        assert!(matches!(
            CsvTable::from_string(&config, "s", "id,v\nid"),
            Err(Error::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_from_string_failure_leaves_no_file() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());
        let path = config.path_for("e", CSV_EXTENSION);

        assert!(matches!(
            CsvTable::from_string(&config, "e", ""),
            Err(Error::Decode { line: 0, .. })
        ));
        assert!(!path.exists());

        // Retry with valid contents succeeds
        let table = CsvTable::from_string(&config, "e", "id,v").unwrap();
        assert_eq!(table.size().unwrap(), 0);
        assert_eq!(table.degree().unwrap(), 2);
    }

    #[test]
    fn test_open_unreadable_file_is_init_error() {
        let dir = tempdir().unwrap();
        let config = TableConfig::new(dir.path());
        fs::write(dir.path().join("t.csv"), b"id,v\n\xff\xfe\n").unwrap();

        assert!(matches!(
            CsvTable::open(&config, "t"),
            Err(Error::StorageInit { .. })
        ));
    }

    #[test]
    fn test_display_renders_grid() {
        let (mut table, _dir) = setup(&["id", "v"]);
        table.put("a", vec![Value::Int(1)]).unwrap();

        let out = table.to_string();
        assert!(out.contains("| id | v |"));
        assert!(out.contains("| a  | 1 |"));
    }

    #[test]
    fn test_stats_track_heuristics() {
        let (mut table, _dir) = setup(&["id", "v"]);
        table.put("a", vec![Value::Int(1)]).unwrap();
        table.put("b", vec![Value::Int(2)]).unwrap();
        table.stats().reset();

        table.get("b").unwrap(); // hit, swap
        table.get("b").unwrap(); // hit, already first
        table.get("zz").unwrap(); // miss

        let snapshot = table.stats().snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.promotions, 1);
        assert_eq!(snapshot.file_loads, 3);
        assert_eq!(snapshot.file_writes, 3);
    }
}
