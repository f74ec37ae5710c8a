//! tablestore - a file-backed, self-organizing keyed table.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           tablestore                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Table Layer (table/)                     │   │
//! │  │      Table trait ── CsvTable | XmlTable (stub)           │   │
//! │  │      put: move-near-front   get: transpose               │   │
//! │  │      SharedTable (caller locking) + TableStats           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Storage Layer (storage/)                   │   │
//! │  │     record codec (row <-> line) + LineFile (whole-file)  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every table operation reads the whole backing file, scans it, and writes
//! the whole file back before returning. There is no cache and no index.
//!
//! # Modules
//! - [`common`] - Shared primitives (Value, Row, Error, config)
//! - [`storage`] - File I/O and the record format
//! - [`table`] - The table contract and its storage variants
//!
//! # Quick Start
//! ```no_run
//! use tablestore::{CsvTable, Table, TableConfig, Value};
//!
//! let config = TableConfig::new("db/tables");
//! let mut table = CsvTable::create(&config, "people", &["id", "name", "age"]).unwrap();
//!
//! table.put("k1", vec!["Ann".into(), 31.into()]).unwrap();
//! let previous = table.put("k1", vec!["Ann".into(), 32.into()]).unwrap();
//! assert_eq!(previous, Some(vec![Value::from("Ann"), Value::Int(31)]));
//! ```

pub mod common;
pub mod storage;
pub mod table;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, Result, Row, TableConfig, Value};

pub use table::{
    BoundedTable, CsvTable, Rows, SharedTable, StatsSnapshot, Table, TableStats, XmlTable,
};
