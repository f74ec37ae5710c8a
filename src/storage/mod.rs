//! Storage layer - file I/O and the record format.
//!
//! This module handles persistent storage:
//! - [`LineFile`] - Whole-file line I/O
//! - [`record`] - Row codec for the delimited text format

mod line_file;
pub mod record;

pub use line_file::LineFile;
