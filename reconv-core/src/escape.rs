//! Escape classification shared by both converters
//!
//! Two questions are answered here:
//! - given the byte after a `\`, is it a valid escape introducer and what
//!   literal byte does it stand for
//! - given a raw literal byte about to be written, does it need an
//!   escaped spelling in canonical output

use crate::cursor::Cursor;
use crate::emitter::Emitter;
use crate::error::{ConversionError, Result, SyntaxErrorKind};

/// The escape character (`\e`)
pub const ESC: u8 = 0x1B;

/// Control escape letters paired with the bytes they denote
const CONTROL_ESCAPES: [(u8, u8); 8] = [
    (b'a', 0x07),
    (b'b', 0x08),
    (b'e', ESC),
    (b'f', 0x0C),
    (b'n', b'\n'),
    (b'r', b'\r'),
    (b't', b'\t'),
    (b'v', 0x0B),
];

/// Characters that stand for themselves when escaped
const META_ESCAPES: &[u8] = b"()[]<>.\\|^$*+?&\"";

/// How a raw literal byte must be written in canonical output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralForm {
    /// Written as-is
    Plain,
    /// Written as `\` followed by the given letter
    Letter(u8),
    /// Written as a three digit octal escape `\0ddd`
    Octal,
}

/// Resolve the byte following a `\` to the literal value it denotes.
///
/// Returns `None` when the byte does not introduce a valid escape.
pub fn canonicalize_escape(byte: u8) -> Option<u8> {
    CONTROL_ESCAPES
        .iter()
        .find(|(letter, _)| *letter == byte)
        .map(|(_, value)| *value)
        .or_else(|| META_ESCAPES.contains(&byte).then_some(byte))
}

/// Find the escape letter for a raw control byte, e.g. TAB -> `t`.
pub fn control_to_escape_letter(byte: u8) -> Option<u8> {
    CONTROL_ESCAPES
        .iter()
        .find(|(_, value)| *value == byte)
        .map(|(letter, _)| *letter)
}

/// Decide how a raw literal byte is spelled in canonical output.
///
/// Bytes at or above 0x80 belong to multi-byte characters and are passed
/// through untouched.
pub fn classify_literal(byte: u8) -> LiteralForm {
    if let Some(letter) = control_to_escape_letter(byte) {
        LiteralForm::Letter(letter)
    } else if byte.is_ascii_control() {
        LiteralForm::Octal
    } else {
        LiteralForm::Plain
    }
}

/// Fixed width octal digits of a byte, most significant first.
pub fn octal_digits(byte: u8) -> [u8; 3] {
    [
        b'0' + byte / 64,
        b'0' + (byte % 64) / 8,
        b'0' + byte % 8,
    ]
}

/// Emit `\0ddd` for the given value.
pub fn emit_octal<E: Emitter>(value: u8, out: &mut E) {
    out.emit(b'\\');
    out.emit(b'0');
    out.emit_all(&octal_digits(value));
}

/// Emit a raw literal byte in its canonical spelling.
///
/// Returns the number of bytes written.
pub fn emit_literal<E: Emitter>(byte: u8, out: &mut E) -> usize {
    match classify_literal(byte) {
        LiteralForm::Plain => {
            out.emit(byte);
            1
        }
        LiteralForm::Letter(letter) => {
            out.emit(b'\\');
            out.emit(letter);
            2
        }
        LiteralForm::Octal => {
            emit_octal(byte, out);
            5
        }
    }
}

/// Read the digits of a numeric escape.
///
/// The cursor sits after `\0`; one to three octal digits are consumed.
/// `offset` is where the escape started and is used for errors.
pub fn read_octal(cursor: &mut Cursor<'_>, offset: usize) -> Result<u8> {
    let mut value: u32 = 0;
    let mut digits = 0;
    while digits < 3 {
        match cursor.peek() {
            Some(d @ b'0'..=b'7') => {
                cursor.bump();
                value = value * 8 + u32::from(d - b'0');
                digits += 1;
            }
            _ => break,
        }
    }
    if digits == 0 {
        return Err(ConversionError::syntax(
            offset,
            SyntaxErrorKind::InvalidEscape { escape: '0' },
        ));
    }
    u8::try_from(value).map_err(|_| {
        ConversionError::syntax(offset, SyntaxErrorKind::InvalidEscape { escape: '0' })
    })
}

/// Length in bytes of the UTF-8 sequence introduced by `lead`.
pub(crate) fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Decode the code point of a UTF-8 sequence taken from valid `str` input.
pub(crate) fn code_point(bytes: &[u8]) -> u32 {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(u32::from(bytes[0]), u32::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::WritingEmitter;

    #[test]
    fn test_control_escapes() {
        assert_eq!(canonicalize_escape(b'n'), Some(b'\n'));
        assert_eq!(canonicalize_escape(b't'), Some(b'\t'));
        assert_eq!(canonicalize_escape(b'e'), Some(0x1B));
        assert_eq!(canonicalize_escape(b'a'), Some(0x07));
        assert_eq!(canonicalize_escape(b'v'), Some(0x0B));
    }

    #[test]
    fn test_meta_escapes_stand_for_themselves() {
        for &c in b"()[]<>.\\|^$*+?&\"" {
            assert_eq!(canonicalize_escape(c), Some(c), "escape of {}", c as char);
        }
    }

    #[test]
    fn test_unknown_escapes() {
        assert_eq!(canonicalize_escape(b'q'), None);
        assert_eq!(canonicalize_escape(b'{'), None);
        assert_eq!(canonicalize_escape(b'-'), None);
        assert_eq!(canonicalize_escape(b'0'), None);
    }

    #[test]
    fn test_control_to_letter() {
        assert_eq!(control_to_escape_letter(b'\n'), Some(b'n'));
        assert_eq!(control_to_escape_letter(b'\r'), Some(b'r'));
        assert_eq!(control_to_escape_letter(0x08), Some(b'b'));
        assert_eq!(control_to_escape_letter(b'x'), None);
    }

    #[test]
    fn test_classify_literal() {
        assert_eq!(classify_literal(b'a'), LiteralForm::Plain);
        assert_eq!(classify_literal(b' '), LiteralForm::Plain);
        assert_eq!(classify_literal(b'\t'), LiteralForm::Letter(b't'));
        assert_eq!(classify_literal(0x01), LiteralForm::Octal);
        assert_eq!(classify_literal(0x7F), LiteralForm::Octal);
        assert_eq!(classify_literal(0xC3), LiteralForm::Plain);
    }

    #[test]
    fn test_octal_digits() {
        assert_eq!(&octal_digits(0x01), b"001");
        assert_eq!(&octal_digits(0x7F), b"177");
        assert_eq!(&octal_digits(0xFF), b"377");
    }

    #[test]
    fn test_emit_literal() {
        let mut out = WritingEmitter::with_capacity(16);
        assert_eq!(emit_literal(b'x', &mut out), 1);
        assert_eq!(emit_literal(b'\n', &mut out), 2);
        assert_eq!(emit_literal(0x02, &mut out), 5);
        assert_eq!(out.into_bytes(), b"x\\n\\0002".to_vec());
    }

    #[test]
    fn test_read_octal() {
        let mut cursor = Cursor::new("0179");
        assert_eq!(read_octal(&mut cursor, 0).unwrap(), 0o17);
        assert_eq!(cursor.peek(), Some(b'9'));

        let mut cursor = Cursor::new("1234");
        assert_eq!(read_octal(&mut cursor, 0).unwrap(), 0o123);
        assert_eq!(cursor.peek(), Some(b'4'));
    }

    #[test]
    fn test_read_octal_errors() {
        let mut cursor = Cursor::new("x");
        assert_eq!(
            read_octal(&mut cursor, 3).unwrap_err(),
            ConversionError::syntax(3, SyntaxErrorKind::InvalidEscape { escape: '0' })
        );

        let mut cursor = Cursor::new("777");
        assert!(read_octal(&mut cursor, 0).is_err());
    }

    #[test]
    fn test_code_point() {
        assert_eq!(code_point("é".as_bytes()), 0xE9);
        assert_eq!(code_point(b"a"), 0x61);
        assert_eq!(utf8_len("é".as_bytes()[0]), 2);
    }
}
