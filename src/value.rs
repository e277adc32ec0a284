//! Bound values: typed, mutable borrows of configuration fields.
//!
//! A [`Value`] never owns its data. Registering one with an
//! [`EnvSet`](crate::EnvSet) or a [`Parser`](crate::Parser) hands over a
//! `&mut` borrow of the field, so every successful write lands directly in the
//! caller's struct.

use std::fmt;

use crate::error::ValueError;

/// The field kinds a record may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Int64,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Text => f.write_str("string"),
            Kind::Int64 => f.write_str("int64"),
        }
    }
}

/// A mutable borrow of one supported field.
///
/// Construct it through `From`, which is implemented only for the supported
/// kinds; any other field type is rejected at compile time.
#[derive(Debug)]
pub enum Value<'a> {
    Text(&'a mut String),
    Int64(&'a mut i64),
}

impl<'a> From<&'a mut String> for Value<'a> {
    fn from(cell: &'a mut String) -> Self {
        Value::Text(cell)
    }
}

impl<'a> From<&'a mut i64> for Value<'a> {
    fn from(cell: &'a mut i64) -> Self {
        Value::Int64(cell)
    }
}

impl Value<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Text(_) => Kind::Text,
            Value::Int64(_) => Kind::Int64,
        }
    }

    /// Convert `raw` and store it. On error the field keeps its old value.
    pub fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        match self {
            Value::Text(cell) => **cell = raw.to_owned(),
            Value::Int64(cell) => **cell = parse_int64(raw)?,
        }
        Ok(())
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(cell) => f.write_str(cell),
            Value::Int64(cell) => write!(f, "{cell}"),
        }
    }
}

/// Parse a signed 64-bit integer, inferring the base from its prefix.
///
/// Accepts an optional sign followed by `0x`/`0X` (hex), `0o`/`0O` or a bare
/// leading `0` (octal), `0b`/`0B` (binary), or plain decimal digits. When the
/// base comes from a prefix, single underscores may separate digits.
pub fn parse_int64(raw: &str) -> Result<i64, ValueError> {
    let syntax = || ValueError::Syntax(raw.to_owned());

    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits, prefixed) = split_radix(unsigned);
    if !valid_underscores(digits, prefixed) {
        return Err(syntax());
    }
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    // from_str_radix tolerates its own sign, which would let "--1" through.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(syntax());
    }

    let magnitude = u64::from_str_radix(&digits, radix)
        .map_err(|_| ValueError::Range(raw.to_owned()))?;
    let limit = if negative {
        i64::MIN.unsigned_abs()
    } else {
        i64::MAX as u64
    };
    if magnitude > limit {
        return Err(ValueError::Range(raw.to_owned()));
    }

    Ok(if negative {
        0i64.wrapping_sub_unsigned(magnitude)
    } else {
        magnitude as i64
    })
}

fn split_radix(s: &str) -> (u32, &str, bool) {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return (10, s, false);
    }
    match bytes[1] {
        b'x' | b'X' => (16, &s[2..], true),
        b'o' | b'O' => (8, &s[2..], true),
        b'b' | b'B' => (2, &s[2..], true),
        _ => (8, &s[1..], true),
    }
}

/// Underscores are allowed only in prefixed literals, and only between
/// digits (a leading underscore directly after the base prefix is fine).
fn valid_underscores(digits: &str, prefixed: bool) -> bool {
    if !digits.contains('_') {
        return true;
    }
    if !prefixed {
        return false;
    }
    !digits.ends_with('_') && !digits.contains("__")
}
