use crate::error::{EdfError, Result};
use crate::types::FieldLocation;

/// Checks that a byte is printable ASCII (32..=126)
pub fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E)
}

/// Packs `value` into a `width`-byte field, right-padded with spaces.
///
/// An empty value yields an all-space field, EDF's "unspecified" blank.
///
/// ```rust
/// use edfcodec::utils::pack;
///
/// let field = pack("foo", 8)?;
/// assert_eq!(&field, b"foo     ");
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
pub fn pack(value: &str, width: usize) -> Result<Vec<u8>> {
    let bytes = value.as_bytes();

    if let Some(position) = bytes.iter().position(|&b| !is_printable(b)) {
        return Err(EdfError::NonPrintableCharacter {
            location: FieldLocation::Unbound,
            byte: bytes[position],
            position,
        });
    }

    if bytes.len() > width {
        return Err(EdfError::FieldOverflow {
            location: FieldLocation::Unbound,
            width,
            len: bytes.len(),
        });
    }

    let mut field = vec![b' '; width];
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(field)
}

/// Bytes up to the first NUL or space
fn leading_token(buffer: &[u8]) -> &[u8] {
    let end = buffer
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(buffer.len());
    &buffer[..end]
}

/// Parses an ASCII decimal integer, stopping at the first NUL or space.
///
/// Leading blanks are not skipped: a field that starts with a space has an
/// empty prefix and fails with [`EdfError::MalformedInteger`].
pub fn unpack_int(buffer: &[u8]) -> Result<i64> {
    std::str::from_utf8(leading_token(buffer))
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| EdfError::MalformedInteger {
            location: FieldLocation::Unbound,
            text: unpack_str(buffer),
        })
}

/// Parses an ASCII decimal number that may carry a fraction ("0.5", "-440")
pub fn unpack_number(buffer: &[u8]) -> Result<f64> {
    std::str::from_utf8(leading_token(buffer))
        .ok()
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| EdfError::MalformedNumber {
            location: FieldLocation::Unbound,
            text: unpack_str(buffer),
        })
}

/// Returns the field text with trailing spaces and NULs trimmed.
///
/// Non-ASCII bytes are replaced lossily; the raw bytes stay untouched in
/// the header, so trimming never affects round-trips.
pub fn unpack_str(buffer: &[u8]) -> String {
    String::from_utf8_lossy(buffer)
        .trim_end_matches(|c| c == ' ' || c == '\0')
        .to_string()
}

/// Validates decoded field bytes: printable ASCII, NUL tolerated as padding
pub(crate) fn check_decoded(buffer: &[u8], skip: usize) -> Result<()> {
    match buffer
        .iter()
        .enumerate()
        .skip(skip)
        .find(|(_, &b)| b != 0 && !is_printable(b))
    {
        Some((position, &byte)) => Err(EdfError::NonPrintableCharacter {
            location: FieldLocation::Unbound,
            byte,
            position,
        }),
        None => Ok(()),
    }
}
