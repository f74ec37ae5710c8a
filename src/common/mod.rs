//! Common types and utilities shared across tablestore.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`TableConfig`]
//! - Error types
//! - [`Value`] and [`Row`]

pub mod config;
pub mod error;
mod row;
mod value;

pub use config::TableConfig;
pub use error::{Error, Result};
pub use row::Row;
pub use value::Value;
pub(crate) use value::format_float;
