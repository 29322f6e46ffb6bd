//! Decoding of the service's obfuscated path segments.
//!
//! Remote resource names and directory paths arrive as "encoded paths": a
//! printable representation where a handful of characters stand in for
//! common bytes and `*HH` escapes carry arbitrary raw bytes as hex pairs.
//! [`decode_path`] turns one of these segments back into the Unicode text
//! it encodes.

use thiserror::Error;

/// Errors produced while decoding an encoded path segment.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A `*` escape started with fewer than two characters remaining.
    #[error("truncated escape at offset {offset}: `*` must be followed by two hex digits")]
    TruncatedEscape {
        /// Byte offset of the `*` in the input.
        offset: usize,
    },

    /// A `*` escape carried characters that are not hex digits.
    #[error("invalid escape `*{first}{second}` at offset {offset}")]
    InvalidEscape {
        /// Byte offset of the `*` in the input.
        offset: usize,
        /// First character after the `*`.
        first: char,
        /// Second character after the `*`.
        second: char,
    },

    /// A literal character whose code point does not fit in one byte.
    #[error("character {ch:?} (U+{code:04X}) cannot appear literally in an encoded path")]
    WideCharacter {
        /// The offending character.
        ch: char,
        /// Its code point.
        code: u32,
    },

    /// The decoded byte sequence is not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8: {source}")]
    InvalidUtf8 {
        /// The underlying conversion error.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Decodes an encoded path segment into the Unicode string it represents.
///
/// Scheme, one input character at a time:
/// - `+` decodes to a space, `:` to `-`, `?` to `_`
/// - `*` is an escape marker: the next two characters are a hex pair for
///   one raw byte
/// - any other character contributes its own code point as one byte
///
/// The accumulated bytes are then decoded as UTF-8. Callers may split the
/// result on `/` to recover directory segments.
///
/// # Errors
///
/// Returns [`DecodeError`] for a `*` with fewer than two characters left,
/// a non-hex escape pair, a literal character above U+00FF, or a decoded
/// byte sequence that is not valid UTF-8.
pub fn decode_path(path: &str) -> Result<String, DecodeError> {
    let mut bytes = Vec::with_capacity(path.len());
    let mut chars = path.char_indices();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '+' => bytes.push(b' '),
            ':' => bytes.push(b'-'),
            '?' => bytes.push(b'_'),
            '*' => {
                let (_, first) = chars
                    .next()
                    .ok_or(DecodeError::TruncatedEscape { offset })?;
                let (_, second) = chars
                    .next()
                    .ok_or(DecodeError::TruncatedEscape { offset })?;
                match (first.to_digit(16), second.to_digit(16)) {
                    #[allow(clippy::cast_possible_truncation)]
                    (Some(hi), Some(lo)) => bytes.push((hi * 16 + lo) as u8),
                    _ => {
                        return Err(DecodeError::InvalidEscape {
                            offset,
                            first,
                            second,
                        });
                    }
                }
            }
            _ => {
                let code = u32::from(ch);
                if code > 0xFF {
                    return Err(DecodeError::WideCharacter { ch, code });
                }
                #[allow(clippy::cast_possible_truncation)]
                bytes.push(code as u8);
            }
        }
    }

    String::from_utf8(bytes).map_err(|source| DecodeError::InvalidUtf8 { source })
}
