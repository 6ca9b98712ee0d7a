//! Value decoder: protocol tokens to typed scalars.
//!
//! - NUMBER with a decimal point or exponent → floating point, otherwise integer
//! - `true` / `false` → boolean
//! - STRING → string, verbatim
//! - anything else → [`KernelError::Decode`] naming the token
//!
//! Arrays are ordered sequences of scalars and need not be homogeneous.
//!
//! Treating an exponent without a decimal point (`1e3`) as floating point is
//! a deliberate extension: a decoder keyed on `.` alone would hand `1e3` to
//! the integer parser and fail. JSON allows the form, so it decodes here.

use revtree_jsop::{JsopReader, TokenKind};
use revtree_types::{CoreValue, ValueFactory};

use crate::error::{KernelError, KernelResult};

/// Decode one scalar at the reader's position.
pub fn read_value<R: JsopReader>(reader: &mut R, values: &dyn ValueFactory) -> KernelResult<CoreValue> {
    if reader.matches(TokenKind::Number)? {
        return decode_number(reader.token(), values);
    }
    if reader.matches(TokenKind::True)? {
        return Ok(values.boolean(true));
    }
    if reader.matches(TokenKind::False)? {
        return Ok(values.boolean(false));
    }
    if reader.matches(TokenKind::String)? {
        return Ok(values.string(reader.token().to_string()));
    }
    let token = reader.read_any()?;
    Err(KernelError::decode(token))
}

/// Decode the elements of an array whose `[` has already been consumed,
/// up to and including the closing `]`.
pub fn read_array<R: JsopReader>(
    reader: &mut R,
    values: &dyn ValueFactory,
) -> KernelResult<Vec<CoreValue>> {
    let mut out = Vec::new();
    if reader.matches(TokenKind::RightBracket)? {
        return Ok(out);
    }
    loop {
        out.push(read_value(reader, values)?);
        if !reader.matches(TokenKind::Comma)? {
            break;
        }
    }
    reader.read(TokenKind::RightBracket)?;
    Ok(out)
}

fn decode_number(number: &str, values: &dyn ValueFactory) -> KernelResult<CoreValue> {
    if number.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        let v: f64 = number.parse().map_err(|_| KernelError::decode(number))?;
        Ok(values.double(v))
    } else {
        let v: i64 = number.parse().map_err(|_| KernelError::decode(number))?;
        Ok(values.long(v))
    }
}
