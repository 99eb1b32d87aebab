use std::ops::Range;
use std::str::FromStr;

/// Failed to pull a fixed-width field out of a record line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The line ends before the field does.
    #[error("record is {len} bytes long, but the field at {}..{} needs {} bytes", .range.start, .range.end, .range.end)]
    TruncatedRecord {
        /// Byte range of the requested field.
        range: Range<usize>,
        /// Actual length of the line.
        len: usize,
    },
    /// A numeric field contained something other than ASCII digits, or did not fit the target
    /// integer type.
    #[error("expected an unsigned number at bytes {}..{}, found {found:?}", .range.start, .range.end)]
    NonNumericField {
        /// Byte range of the requested field.
        range: Range<usize>,
        /// The field contents, lossily decoded.
        found: String,
    },
}

impl FieldError {
    /// The byte range of the field that failed to extract.
    pub fn range(&self) -> Range<usize> {
        match self {
            FieldError::TruncatedRecord { range, .. } => range.clone(),
            FieldError::NonNumericField { range, .. } => range.clone(),
        }
    }
}

/// Extract the bytes at `range` from a record line.
///
/// ## Example
///
/// ```rust
/// use roa_support::{extract, FieldError};
///
/// assert_eq!(extract(b"1v1.4.2", 1..4).unwrap(), b"v1.");
/// assert!(matches!(
///     extract(b"1v1", 1..8),
///     Err(FieldError::TruncatedRecord { len: 3, .. })
/// ));
/// ```
pub fn extract(line: &[u8], range: Range<usize>) -> Result<&[u8], FieldError> {
    match line.get(range.clone()) {
        Some(bytes) => Ok(bytes),
        None => Err(FieldError::TruncatedRecord {
            range,
            len: line.len(),
        }),
    }
}

/// Extract an unsigned decimal number from a record line.
///
/// Only ASCII digits are accepted; signs, spaces and other numerals are rejected.
///
/// ## Example
///
/// ```rust
/// use roa_support::extract_uint;
///
/// assert_eq!(extract_uint::<u8>(b"001030805", 3..5).unwrap(), 3);
/// assert!(extract_uint::<u8>(b"0 1", 0..3).is_err());
/// ```
pub fn extract_uint<T: FromStr>(line: &[u8], range: Range<usize>) -> Result<T, FieldError> {
    let bytes = extract(line, range.clone())?;
    let non_numeric = || FieldError::NonNumericField {
        range: range.clone(),
        found: String::from_utf8_lossy(bytes).into_owned(),
    };
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(non_numeric());
    }
    // all ASCII, so this cannot fail
    let text = std::str::from_utf8(bytes).map_err(|_| non_numeric())?;
    text.parse().map_err(|_| non_numeric())
}

/// Extract a numeric flag: zero is `false`, anything else is `true`.
pub fn extract_flag(line: &[u8], range: Range<usize>) -> Result<bool, FieldError> {
    extract_uint::<u32>(line, range).map(|n| n != 0)
}

/// Extract a text field, replacing invalid UTF-8 sequences.
pub fn extract_str(line: &[u8], range: Range<usize>) -> Result<String, FieldError> {
    extract(line, range).map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

/// Extract a space-padded text field, dropping the trailing padding.
pub fn extract_padded_str(line: &[u8], range: Range<usize>) -> Result<String, FieldError> {
    extract_str(line, range).map(|s| s.trim_end().to_string())
}

/// Extension trait for pulling fixed-width fields out of a record line.
pub trait FixedWidthExt {
    /// See [`extract`].
    fn field(&self, range: Range<usize>) -> Result<&[u8], FieldError>;
    /// See [`extract_uint`].
    fn uint_field<T: FromStr>(&self, range: Range<usize>) -> Result<T, FieldError>;
    /// See [`extract_flag`].
    fn flag_field(&self, range: Range<usize>) -> Result<bool, FieldError>;
    /// See [`extract_str`].
    fn str_field(&self, range: Range<usize>) -> Result<String, FieldError>;
    /// See [`extract_padded_str`].
    fn padded_str_field(&self, range: Range<usize>) -> Result<String, FieldError>;
}

impl FixedWidthExt for [u8] {
    #[inline]
    fn field(&self, range: Range<usize>) -> Result<&[u8], FieldError> {
        extract(self, range)
    }

    #[inline]
    fn uint_field<T: FromStr>(&self, range: Range<usize>) -> Result<T, FieldError> {
        extract_uint(self, range)
    }

    #[inline]
    fn flag_field(&self, range: Range<usize>) -> Result<bool, FieldError> {
        extract_flag(self, range)
    }

    #[inline]
    fn str_field(&self, range: Range<usize>) -> Result<String, FieldError> {
        extract_str(self, range)
    }

    #[inline]
    fn padded_str_field(&self, range: Range<usize>) -> Result<String, FieldError> {
        extract_padded_str(self, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_length_is_enough() {
        assert_eq!(extract(b"abc", 0..3).unwrap(), b"abc");
        assert_eq!(extract(b"abc", 3..3).unwrap(), b"");
    }

    #[test]
    fn truncated_reports_range_and_length() {
        let err = extract(b"abc", 2..5).unwrap_err();
        assert_eq!(
            err,
            FieldError::TruncatedRecord {
                range: 2..5,
                len: 3
            }
        );
        assert_eq!(err.range(), 2..5);
    }

    #[test]
    fn uint_rejects_non_ascii_digits() {
        // U+0663 ARABIC-INDIC DIGIT THREE
        let line = "\u{663}1".as_bytes();
        assert!(matches!(
            extract_uint::<u32>(line, 0..line.len()),
            Err(FieldError::NonNumericField { .. })
        ));
    }

    #[test]
    fn uint_rejects_empty_and_overflow() {
        assert!(extract_uint::<u8>(b"", 0..0).is_err());
        assert!(extract_uint::<u8>(b"999", 0..3).is_err());
        assert_eq!(extract_uint::<u16>(b"999", 0..3).unwrap(), 999);
    }

    #[test]
    fn flags() {
        assert!(!b"0".flag_field(0..1).unwrap());
        assert!(b"1".flag_field(0..1).unwrap());
        assert!(b"x".flag_field(0..1).is_err());
    }

    #[test]
    fn padded_strings_are_trimmed() -> anyhow::Result<()> {
        let line = b"HPlayer One                      ";
        assert_eq!(line.padded_str_field(1..33)?, "Player One");
        assert_eq!(line.str_field(1..7)?, "Player");
        Ok(())
    }
}
