// SPDX-License-Identifier: Apache-2.0

//! Separator helpers and the shape precheck.

use log::debug;

use crate::parse_error::ParseError;

pub const MOLECULE_SPLIT_KEY: u8 = b',';
pub const ATOM_SPLIT_KEY: u8 = b':';

/// Bytes ignored between tokens.
pub(crate) fn is_padding(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Control bytes that are not padding.
pub(crate) fn is_control(byte: u8) -> bool {
    byte < 0x20 && !is_padding(byte)
}

/// Position of the first `needle` in `buffer[start..end]` that is not inside quotes.
pub(crate) fn find_unquoted(buffer: &[u8], needle: u8, start: usize, end: usize) -> Option<usize> {
    let span = buffer.get(start..end)?;
    let mut in_string = false;
    for (offset, &byte) in span.iter().enumerate() {
        if byte == b'"' {
            in_string = !in_string;
        } else if !in_string && byte == needle {
            return Some(start + offset);
        }
    }
    None
}

/// Counts top-level `,` and `:` outside quotes and checks they are consistent.
///
/// A buffer is plausible only if it has exactly one more colon than commas. On success
/// the number of top-level key/value pairs (commas + 1) is returned, which can be used
/// to presize an [`Organism`](crate::Organism).
pub fn count_separators(buffer: &[u8]) -> Result<usize, ParseError> {
    let mut colons = 0usize;
    let mut commas = 0usize;
    let mut depth = 0usize;
    let mut in_string = false;

    for &byte in buffer {
        match byte {
            b'"' => in_string = !in_string,
            _ if in_string => {}
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            MOLECULE_SPLIT_KEY if depth <= 1 => commas += 1,
            ATOM_SPLIT_KEY if depth <= 1 => colons += 1,
            _ => {}
        }
    }

    if colons != commas + 1 {
        debug!("Shape check failed: {} colons, {} commas", colons, commas);
        return Err(ParseError::ShapeError { colons, commas });
    }
    Ok(commas + 1)
}

/// Counts `:` outside quotes at every depth.
///
/// Each key/value pair has one, so this is the number of molecules a scan of a
/// well-formed buffer appends, nested pairs included.
pub fn count_molecules(buffer: &[u8]) -> usize {
    let mut in_string = false;
    buffer
        .iter()
        .filter(|&&byte| {
            if byte == b'"' {
                in_string = !in_string;
            }
            !in_string && byte == ATOM_SPLIT_KEY
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_count_flat() {
        assert_eq!(
            count_separators(br#"{"key1":"value1","key2":5,"key3":"value3"}"#),
            Ok(3)
        );
        assert_eq!(count_separators(br#"{"key":1}"#), Ok(1));
    }

    #[test]
    fn test_count_ignores_nested_and_quoted() {
        assert_eq!(
            count_separators(br#"{"key":123, "obj":{"key2":"value","k":1}}"#),
            Ok(2)
        );
        assert_eq!(count_separators(br#"{"a,b":"c:d"}"#), Ok(1));
    }

    #[test]
    fn test_count_inconsistent() {
        assert_eq!(
            count_separators(br#"{"key1":"value1","key2"}"#),
            Err(ParseError::ShapeError {
                colons: 1,
                commas: 1
            })
        );
        assert_eq!(
            count_separators(b"{}"),
            Err(ParseError::ShapeError {
                colons: 0,
                commas: 0
            })
        );
    }

    #[test]
    fn test_count_molecules_nested() {
        assert_eq!(
            count_molecules(br#"{"key":123, "obj":{"key2":"value","k":{"x":1}}}"#),
            5
        );
        assert_eq!(count_molecules(br#"{"a:b":"c:d"}"#), 1);
        assert_eq!(count_molecules(b"{}"), 0);
    }

    #[test]
    fn test_find_unquoted() {
        let input = br#""a:b":"c""#;
        assert_eq!(find_unquoted(input, b':', 0, input.len()), Some(5));
        assert_eq!(find_unquoted(input, b',', 0, input.len()), None);
        assert_eq!(find_unquoted(input, b':', 6, input.len()), None);
        assert_eq!(find_unquoted(input, b':', 6, 100), None);
    }

    #[test]
    fn test_padding() {
        for byte in [b' ', b'\t', b'\n', b'\r'] {
            assert!(is_padding(byte));
        }
        assert!(!is_padding(b'a'));
        assert!(!is_padding(b','));
    }

    #[test]
    fn test_control() {
        assert!(is_control(0x00));
        assert!(is_control(0x01));
        assert!(is_control(0x1f));
        assert!(!is_control(b'\t'));
        assert!(!is_control(b'\n'));
        assert!(!is_control(b' '));
        assert!(!is_control(b'a'));
    }
}
