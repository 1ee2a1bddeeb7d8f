//! Typed column parsers.
//!
//! Each parser owns a mutable borrow of one destination column and converts
//! tokens into that column's element type, writing in place. Conversion is
//! locale-independent and strict: a token must be a complete literal of the
//! destination type (surrounding ASCII whitespace aside), and numeric values
//! outside the destination range are rejected, never wrapped or truncated.

use std::num::IntErrorKind;

use tabload_model::{ArrayData, ScalarType};
use thiserror::Error;

/// Why a single token could not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("value does not fit the destination type")]
    Overflow,
    #[error("value is not a valid literal of the destination type")]
    InvalidArgument,
    #[error("row {row} is past the end of a column of {len} values")]
    RowOutOfBounds { row: usize, len: usize },
}

/// Conversion from one token to a destination element.
pub trait ParseToken: Sized {
    fn parse_token(token: &str) -> Result<Self, ParseError>;
}

fn trim(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Parses through `i128`, which holds every `i64` and `u64`, then narrows
/// with an exact range check.
fn parse_integer<T: TryFrom<i128>>(token: &str) -> Result<T, ParseError> {
    let wide = trim(token).parse::<i128>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseError::Overflow,
        _ => ParseError::InvalidArgument,
    })?;
    T::try_from(wide).map_err(|_| ParseError::Overflow)
}

fn is_infinity_literal(token: &str) -> bool {
    let unsigned = token.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! impl_parse_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParseToken for $ty {
                fn parse_token(token: &str) -> Result<Self, ParseError> {
                    parse_integer::<$ty>(token)
                }
            }
        )*
    };
}

impl_parse_integer!(i8, u8, i16, u16, i32, u32, i64, u64);

macro_rules! impl_parse_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParseToken for $ty {
                /// Finite literals that round to infinity are overflows;
                /// explicit `inf`/`nan` literals are accepted.
                fn parse_token(token: &str) -> Result<Self, ParseError> {
                    let trimmed = trim(token);
                    let value = trimmed
                        .parse::<$ty>()
                        .map_err(|_| ParseError::InvalidArgument)?;
                    if value.is_infinite() && !is_infinity_literal(trimmed) {
                        return Err(ParseError::Overflow);
                    }
                    Ok(value)
                }
            }
        )*
    };
}

impl_parse_float!(f32, f64);

impl ParseToken for bool {
    /// Accepts `true`/`false` (any ASCII case) and `1`/`0`.
    fn parse_token(token: &str) -> Result<Self, ParseError> {
        match trim(token) {
            "1" => Ok(true),
            "0" => Ok(false),
            t if t.eq_ignore_ascii_case("true") => Ok(true),
            t if t.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(ParseError::InvalidArgument),
        }
    }
}

impl ParseToken for String {
    fn parse_token(token: &str) -> Result<Self, ParseError> {
        Ok(token.to_string())
    }
}

/// Parser for one column with element type `T`.
#[derive(Debug)]
pub struct TypedParser<'a, T> {
    buffer: &'a mut Vec<T>,
    header: String,
    column: usize,
}

impl<'a, T: ParseToken> TypedParser<'a, T> {
    pub fn new(buffer: &'a mut Vec<T>, header: impl Into<String>, column: usize) -> Self {
        Self {
            buffer,
            header: header.into(),
            column,
        }
    }

    /// Converts `token` and stores it at `row`.
    pub fn parse(&mut self, token: &str, row: usize) -> Result<(), ParseError> {
        let len = self.buffer.len();
        let slot = self
            .buffer
            .get_mut(row)
            .ok_or(ParseError::RowOutOfBounds { row, len })?;
        *slot = T::parse_token(token)?;
        Ok(())
    }
}

/// One parser per destination type, built once by the parser factory.
#[derive(Debug)]
pub enum ColumnParser<'a> {
    Int8(TypedParser<'a, i8>),
    UInt8(TypedParser<'a, u8>),
    Int16(TypedParser<'a, i16>),
    UInt16(TypedParser<'a, u16>),
    Int32(TypedParser<'a, i32>),
    UInt32(TypedParser<'a, u32>),
    Int64(TypedParser<'a, i64>),
    UInt64(TypedParser<'a, u64>),
    Float32(TypedParser<'a, f32>),
    Float64(TypedParser<'a, f64>),
    Bool(TypedParser<'a, bool>),
    Text(TypedParser<'a, String>),
}

macro_rules! dispatch {
    ($value:expr, $parser:ident => $body:expr) => {
        match $value {
            ColumnParser::Int8($parser) => $body,
            ColumnParser::UInt8($parser) => $body,
            ColumnParser::Int16($parser) => $body,
            ColumnParser::UInt16($parser) => $body,
            ColumnParser::Int32($parser) => $body,
            ColumnParser::UInt32($parser) => $body,
            ColumnParser::Int64($parser) => $body,
            ColumnParser::UInt64($parser) => $body,
            ColumnParser::Float32($parser) => $body,
            ColumnParser::Float64($parser) => $body,
            ColumnParser::Bool($parser) => $body,
            ColumnParser::Text($parser) => $body,
        }
    };
}

impl<'a> ColumnParser<'a> {
    /// Wraps `data` in the parser for `scalar_type`.
    ///
    /// Returns `None` when the storage does not hold `scalar_type` elements.
    pub fn bind(
        scalar_type: ScalarType,
        data: &'a mut ArrayData,
        header: impl Into<String>,
        column: usize,
    ) -> Option<Self> {
        let header = header.into();
        let parser = match (scalar_type, data) {
            (ScalarType::Int8, ArrayData::Int8(v)) => Self::Int8(TypedParser::new(v, header, column)),
            (ScalarType::UInt8, ArrayData::UInt8(v)) => {
                Self::UInt8(TypedParser::new(v, header, column))
            }
            (ScalarType::Int16, ArrayData::Int16(v)) => {
                Self::Int16(TypedParser::new(v, header, column))
            }
            (ScalarType::UInt16, ArrayData::UInt16(v)) => {
                Self::UInt16(TypedParser::new(v, header, column))
            }
            (ScalarType::Int32, ArrayData::Int32(v)) => {
                Self::Int32(TypedParser::new(v, header, column))
            }
            (ScalarType::UInt32, ArrayData::UInt32(v)) => {
                Self::UInt32(TypedParser::new(v, header, column))
            }
            (ScalarType::Int64, ArrayData::Int64(v)) => {
                Self::Int64(TypedParser::new(v, header, column))
            }
            (ScalarType::UInt64, ArrayData::UInt64(v)) => {
                Self::UInt64(TypedParser::new(v, header, column))
            }
            (ScalarType::Float32, ArrayData::Float32(v)) => {
                Self::Float32(TypedParser::new(v, header, column))
            }
            (ScalarType::Float64, ArrayData::Float64(v)) => {
                Self::Float64(TypedParser::new(v, header, column))
            }
            (ScalarType::Bool, ArrayData::Bool(v)) => Self::Bool(TypedParser::new(v, header, column)),
            (ScalarType::Text, ArrayData::Text(v)) => Self::Text(TypedParser::new(v, header, column)),
            _ => return None,
        };
        Some(parser)
    }

    /// Converts `token` and stores it at `row` (0-based within the import).
    pub fn parse(&mut self, token: &str, row: usize) -> Result<(), ParseError> {
        dispatch!(self, p => p.parse(token, row))
    }

    pub fn header(&self) -> &str {
        dispatch!(self, p => p.header.as_str())
    }

    /// Zero-based column position within each line.
    pub fn column(&self) -> usize {
        dispatch!(self, p => p.column)
    }

    /// Number of rows the destination column can hold.
    pub fn capacity(&self) -> usize {
        dispatch!(self, p => p.buffer.len())
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Int8(_) => ScalarType::Int8,
            Self::UInt8(_) => ScalarType::UInt8,
            Self::Int16(_) => ScalarType::Int16,
            Self::UInt16(_) => ScalarType::UInt16,
            Self::Int32(_) => ScalarType::Int32,
            Self::UInt32(_) => ScalarType::UInt32,
            Self::Int64(_) => ScalarType::Int64,
            Self::UInt64(_) => ScalarType::UInt64,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
            Self::Bool(_) => ScalarType::Bool,
            Self::Text(_) => ScalarType::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range_is_exact() {
        assert_eq!(i8::parse_token("127"), Ok(127));
        assert_eq!(i8::parse_token("-128"), Ok(-128));
        assert_eq!(i8::parse_token("128"), Err(ParseError::Overflow));
        assert_eq!(i8::parse_token("300"), Err(ParseError::Overflow));
        assert_eq!(u8::parse_token("-1"), Err(ParseError::Overflow));
        assert_eq!(u64::parse_token("18446744073709551615"), Ok(u64::MAX));
        assert_eq!(
            u64::parse_token("18446744073709551616"),
            Err(ParseError::Overflow)
        );
        assert_eq!(
            i64::parse_token("99999999999999999999999999999999999999999999"),
            Err(ParseError::Overflow)
        );
    }

    #[test]
    fn test_integer_rejects_garbage() {
        for token in ["", "  ", "1.5", "12abc", "abc", "1e3", "0x10", "--1", "1 2", "$5"] {
            assert_eq!(
                i32::parse_token(token),
                Err(ParseError::InvalidArgument),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(i16::parse_token(" 42\r"), Ok(42));
        assert_eq!(f64::parse_token("\t2.5 "), Ok(2.5));
        assert_eq!(bool::parse_token(" TRUE"), Ok(true));
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(f32::parse_token("1.5e3"), Ok(1500.0));
        assert_eq!(f64::parse_token("-0.25"), Ok(-0.25));
        assert_eq!(f32::parse_token("1e39"), Err(ParseError::Overflow));
        assert_eq!(f64::parse_token("1e400"), Err(ParseError::Overflow));
        assert_eq!(f64::parse_token("-inf"), Ok(f64::NEG_INFINITY));
        assert!(f32::parse_token("NaN").unwrap().is_nan());
        assert_eq!(f64::parse_token("1,5"), Err(ParseError::InvalidArgument));
        assert_eq!(f64::parse_token("2.0x"), Err(ParseError::InvalidArgument));
        assert_eq!(f64::parse_token(""), Err(ParseError::InvalidArgument));
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(bool::parse_token("1"), Ok(true));
        assert_eq!(bool::parse_token("0"), Ok(false));
        assert_eq!(bool::parse_token("False"), Ok(false));
        assert_eq!(bool::parse_token("2"), Err(ParseError::InvalidArgument));
        assert_eq!(bool::parse_token("yes"), Err(ParseError::InvalidArgument));
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(String::parse_token(" keep me "), Ok(" keep me ".to_string()));
    }

    #[test]
    fn test_typed_parser_writes_in_place() {
        let mut buffer = vec![0i32; 3];
        let mut parser = TypedParser::new(&mut buffer, "x", 0);
        parser.parse("7", 2).unwrap();
        parser.parse("-3", 0).unwrap();
        assert_eq!(
            parser.parse("1", 3),
            Err(ParseError::RowOutOfBounds { row: 3, len: 3 })
        );
        assert_eq!(buffer, vec![-3, 0, 7]);
    }

    #[test]
    fn test_bind_checks_element_type() {
        let mut data = ArrayData::zeroed(ScalarType::UInt16, 2);
        assert!(ColumnParser::bind(ScalarType::Int16, &mut data, "h", 0).is_none());

        let mut parser = ColumnParser::bind(ScalarType::UInt16, &mut data, "h", 4).unwrap();
        assert_eq!(parser.scalar_type(), ScalarType::UInt16);
        assert_eq!(parser.header(), "h");
        assert_eq!(parser.column(), 4);
        assert_eq!(parser.capacity(), 2);
        parser.parse("65535", 1).unwrap();
        assert_eq!(data, ArrayData::UInt16(vec![0, 65535]));
    }
}
