//! Fixed-layout struct reads
//!
//! A layout is a list of fixed-width fields read back to back. A layout made
//! only of [`Field::Char`] is text and goes through the string policy; a
//! single field yields that scalar; anything else is a multi-field record that
//! is only accepted when [`Config::tolerate_multi_byte_struct`] is set.

use tracing::error;

use crate::config::Config;
use crate::constants::FLOAT_LEN;
use crate::error::{Result, SbvjError};
use crate::text::decode_text;

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

/// One fixed-width field of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Raw byte, part of a character run
    Char,
    /// Signed byte
    I8,
    /// Unsigned byte
    U8,
    /// Signed 16-bit integer
    I16(Endian),
    /// Unsigned 16-bit integer
    U16(Endian),
    /// Signed 32-bit integer
    I32(Endian),
    /// Unsigned 32-bit integer
    U32(Endian),
    /// Signed 64-bit integer
    I64(Endian),
    /// Unsigned 64-bit integer
    U64(Endian),
    /// Single-precision float
    F32(Endian),
    /// Double-precision float
    F64(Endian),
}

/// A single decoded field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Signed integer field
    Int(i64),
    /// Unsigned integer field (including raw bytes)
    UInt(u64),
    /// Float field
    Float(f64),
}

/// Result of reading a layout
#[derive(Debug, Clone, PartialEq)]
pub enum StructValue {
    /// A character-only layout, decoded as text
    Text(String),
    /// A single non-character field
    Scalar(Scalar),
    /// Several fields, only produced when multi-field reads are tolerated
    Fields(Vec<Scalar>),
}

impl Field {
    /// Width of the field in bytes
    pub fn width(self) -> usize {
        match self {
            Field::Char | Field::I8 | Field::U8 => 1,
            Field::I16(_) | Field::U16(_) => 2,
            Field::I32(_) | Field::U32(_) | Field::F32(_) => 4,
            Field::I64(_) | Field::U64(_) | Field::F64(_) => 8,
        }
    }

    /// Read this field at `offset`, returning the scalar and the new offset
    pub fn read(self, bytes: &[u8], offset: usize) -> Result<(Scalar, usize)> {
        let raw = take(bytes, offset, self.width())?;
        let scalar = match self {
            Field::Char | Field::U8 => Scalar::UInt(raw[0].into()),
            Field::I8 => Scalar::Int((raw[0] as i8).into()),
            Field::I16(e) => Scalar::Int(i16::read_endian(e, raw).into()),
            Field::U16(e) => Scalar::UInt(u16::read_endian(e, raw).into()),
            Field::I32(e) => Scalar::Int(i32::read_endian(e, raw).into()),
            Field::U32(e) => Scalar::UInt(u32::read_endian(e, raw).into()),
            Field::I64(e) => Scalar::Int(i64::read_endian(e, raw)),
            Field::U64(e) => Scalar::UInt(u64::read_endian(e, raw)),
            Field::F32(e) => Scalar::Float(f32::read_endian(e, raw).into()),
            Field::F64(e) => Scalar::Float(f64::read_endian(e, raw)),
        };
        Ok((scalar, offset + raw.len()))
    }
}

/// Fixed-width numbers readable in either byte order
trait FromBytes: Sized {
    fn read_endian(endian: Endian, raw: &[u8]) -> Self;
}

macro_rules! impl_from_bytes {
    ($($ty:ty),*) => {
        $(
            impl FromBytes for $ty {
                fn read_endian(endian: Endian, raw: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(raw);
                    match endian {
                        Endian::Big => <$ty>::from_be_bytes(buf),
                        Endian::Little => <$ty>::from_le_bytes(buf),
                    }
                }
            }
        )*
    };
}

impl_from_bytes!(i16, u16, i32, u32, i64, u64, f32, f64);

/// Borrow `len` bytes at `offset` or report how many are missing
pub(crate) fn take(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let available = bytes.len().saturating_sub(offset);
    if available < len {
        return Err(SbvjError::truncated(offset, len - available));
    }
    Ok(&bytes[offset..offset + len])
}

/// Read a big-endian IEEE-754 double at `offset`
pub fn read_f64_be(bytes: &[u8], offset: usize) -> Result<(f64, usize)> {
    let raw = take(bytes, offset, FLOAT_LEN)?;
    Ok((f64::read_endian(Endian::Big, raw), offset + FLOAT_LEN))
}

/// Read `layout` at `offset`, returning the decoded value and the new offset
pub fn read_struct(
    layout: &[Field],
    bytes: &[u8],
    offset: usize,
    config: &Config,
) -> Result<(StructValue, usize)> {
    if layout.iter().all(|field| *field == Field::Char) {
        let raw = take(bytes, offset, layout.len())?;
        let text = decode_text(raw, offset, config)?;
        return Ok((StructValue::Text(text), offset + raw.len()));
    }

    let mut pos = offset;
    let mut fields = Vec::with_capacity(layout.len());
    for field in layout {
        let (scalar, next) = field.read(bytes, pos)?;
        fields.push(scalar);
        pos = next;
    }

    if fields.len() == 1 {
        return Ok((StructValue::Scalar(fields[0]), pos));
    }
    if !config.tolerate_multi_byte_struct {
        error!(offset, fields = fields.len(), "multiple non-byte fields in struct");
        return Err(SbvjError::DecodingError {
            offset,
            message: format!("struct has {} fields, not all bytes", fields.len()),
        });
    }
    Ok((StructValue::Fields(fields), pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(n: usize) -> Vec<Field> {
        vec![Field::Char; n]
    }

    #[test]
    fn test_char_runs_decode_as_text() {
        let config = Config::default();
        let cases: Vec<(&[u8], usize, usize, (StructValue, usize))> = vec![
            (&b"Alen"[..], 4, 0, (StructValue::Text("Alen".into()), 4)),
            (&b"Alen B"[..], 4, 0, (StructValue::Text("Alen".into()), 4)),
            (&b"Alen B"[..], 2, 2, (StructValue::Text("en".into()), 4)),
            (&b""[..], 0, 0, (StructValue::Text(String::new()), 0)),
        ];
        for (bytes, len, offset, expected) in cases {
            assert_eq!(read_struct(&chars(len), bytes, offset, &config).unwrap(), expected);
        }
    }

    #[test]
    fn test_single_field_is_scalar() {
        let config = Config::default();
        assert_eq!(
            read_struct(&[Field::I8], b"\x01\xFF", 0, &config).unwrap(),
            (StructValue::Scalar(Scalar::Int(1)), 1)
        );
        assert_eq!(
            read_struct(&[Field::I8], b"\xFF", 0, &config).unwrap(),
            (StructValue::Scalar(Scalar::Int(-1)), 1)
        );
        assert_eq!(
            read_struct(&[Field::I32(Endian::Little)], b"\x00\x88\x00\x00", 0, &config).unwrap(),
            (StructValue::Scalar(Scalar::Int(34816)), 4)
        );
        assert_eq!(
            read_struct(&[Field::U16(Endian::Big)], b"\x01\x02", 0, &config).unwrap(),
            (StructValue::Scalar(Scalar::UInt(258)), 2)
        );
    }

    #[test]
    fn test_multi_field_needs_tolerance() {
        let layout = [Field::U8, Field::I16(Endian::Big)];
        let bytes = b"\x07\xFF\xFE";

        assert!(matches!(
            read_struct(&layout, bytes, 0, &Config::default()),
            Err(SbvjError::DecodingError { offset: 0, .. })
        ));

        let tolerant = Config::default().with_tolerate_multi_byte_struct(true);
        assert_eq!(
            read_struct(&layout, bytes, 0, &tolerant).unwrap(),
            (
                StructValue::Fields(vec![Scalar::UInt(7), Scalar::Int(-2)]),
                3
            )
        );
    }

    #[test]
    fn test_non_ascii_chars_follow_string_policy() {
        let bytes = "é".as_bytes();
        assert!(read_struct(&chars(2), bytes, 0, &Config::default()).is_err());
        let config = Config::default().with_utf8_fallback(true);
        assert_eq!(
            read_struct(&chars(2), bytes, 0, &config).unwrap(),
            (StructValue::Text("é".into()), 2)
        );
    }

    #[test]
    fn test_truncated_field() {
        match read_struct(&[Field::F64(Endian::Big)], &[0; 5], 0, &Config::default()) {
            Err(SbvjError::TruncatedInput { offset, needed }) => {
                assert_eq!(offset, 0);
                assert_eq!(needed, 3);
            }
            other => panic!("expected TruncatedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_read_f64_be() {
        let bytes = 1.5f64.to_be_bytes();
        assert_eq!(read_f64_be(&bytes, 0).unwrap(), (1.5, 8));
    }
}
