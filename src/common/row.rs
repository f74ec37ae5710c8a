//! Keyed rows.

use crate::common::Value;

/// A key plus its ordered field values.
///
/// The key is always text, even when it looks numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: String,
    values: Vec<Value>,
}

impl Row {
    /// Create a new row.
    pub fn new(key: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Split into key and values.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.key, self.values)
    }

    /// Content-derived hash of the key and every value.
    ///
    /// CRC32 over a length-prefixed key followed by, per value, a kind tag
    /// and its payload. Stable across processes and platforms.
    pub fn content_hash(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();

        hasher.update(&(self.key.len() as u32).to_le_bytes());
        hasher.update(self.key.as_bytes());

        for value in &self.values {
            match value {
                Value::Null => hasher.update(&[0]),
                Value::Text(s) => {
                    hasher.update(&[1]);
                    hasher.update(&(s.len() as u32).to_le_bytes());
                    hasher.update(s.as_bytes());
                }
                Value::Int(i) => {
                    hasher.update(&[2]);
                    hasher.update(&i.to_le_bytes());
                }
                Value::Float(f) => {
                    hasher.update(&[3]);
                    hasher.update(&f.to_bits().to_le_bytes());
                }
                Value::Bool(b) => hasher.update(&[4, *b as u8]),
            }
        }

        hasher.finalize()
    }
}
