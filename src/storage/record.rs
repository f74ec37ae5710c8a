//! Record codec - rows to and from one line of delimited text.
//!
//! # Field encoding
//! ```text
//! Value           On disk
//! -----           -------
//! Null            null
//! Text("Ann")     "Ann"
//! Int(-7)         -7
//! Float(2.5)      2.5
//! Bool(true)      true
//! ```
//!
//! Text is quoted verbatim: separators and quotes inside text are not
//! escaped, and splitting on decode is not quote-aware. Text containing
//! `,` or `"` therefore does not round-trip. This is the on-disk contract.

use crate::common::config::{NULL_LITERAL, QUOTE, SEPARATOR};
use crate::common::{format_float, Error, Result, Row, Value};

/// Encode a key and its values as one line.
pub fn encode_row(key: &str, values: &[Value]) -> String {
    let mut line = quote(key);
    for value in values {
        line.push(SEPARATOR);
        line.push_str(&encode_value(value));
    }
    line
}

/// Encode a single value.
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::Null => NULL_LITERAL.to_string(),
        Value::Text(s) => quote(s),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Bool(b) => b.to_string(),
    }
}

/// Decode one body line.
///
/// `line_no` is only used to label a `Decode` error.
///
/// # Errors
/// Returns `Error::Decode` if an integer-looking field does not fit in `i32`.
pub fn decode_row(line: &str, line_no: usize) -> Result<Row> {
    let mut fields = line.split(SEPARATOR);

    // split always yields at least one field
    let key = fields.next().unwrap_or_default().trim().trim_matches(QUOTE);

    let values = fields
        .map(|field| decode_value(field, line_no))
        .collect::<Result<Vec<_>>>()?;

    Ok(Row::new(key, values))
}

/// Decode one field by sniffing its type.
///
/// Priority: `null`, quoted text, boolean (any case), integer, float, then
/// the raw text. Integers are tried before floats and booleans before
/// numbers.
pub fn decode_value(field: &str, line_no: usize) -> Result<Value> {
    if field == NULL_LITERAL {
        return Ok(Value::Null);
    }

    if field.len() >= 2 && field.starts_with(QUOTE) && field.ends_with(QUOTE) {
        return Ok(Value::Text(field[1..field.len() - 1].to_string()));
    }

    if field.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if field.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }

    if is_integer(field) {
        return field.parse::<i32>().map(Value::Int).map_err(|e| Error::Decode {
            line: line_no,
            reason: format!("integer field '{field}' out of range: {e}"),
        });
    }

    if is_decimal(field) {
        return field.parse::<f64>().map(Value::Float).map_err(|e| Error::Decode {
            line: line_no,
            reason: format!("float field '{field}': {e}"),
        });
    }

    Ok(Value::Text(field.to_string()))
}

/// Encode the header line.
pub fn encode_header<S: AsRef<str>>(columns: &[S]) -> String {
    let mut line = String::new();
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            line.push(SEPARATOR);
        }
        line.push_str(column.as_ref());
    }
    line
}

/// Decode the header line into column names.
pub fn decode_header(line: &str) -> Vec<String> {
    line.split(SEPARATOR).map(str::to_string).collect()
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(QUOTE);
    out.push_str(s);
    out.push(QUOTE);
    out
}

/// `-?\d+`
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?\d+(\.\d+)?`
fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    match unsigned.split_once('.') {
        Some((whole, frac)) => is_unsigned_digits(whole) && is_unsigned_digits(frac),
        None => is_unsigned_digits(unsigned),
    }
}

fn is_unsigned_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
