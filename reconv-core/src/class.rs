//! Bracket expression canonicalization
//!
//! A class body is scanned member by member into an accumulator. The ranges
//! `0-9`, `a-z` and `A-Z` and the underscore are not copied but recorded in
//! detectors, so that a class made only of them can collapse to `\d`, `\l`
//! or `\w` (`\D`, `\L`, `\W` when negated). Otherwise the detectors are
//! written back as shorthands in front of the remaining members.

use crate::cursor::Cursor;
use crate::emitter::{Emitter, WritingEmitter};
use crate::error::{ConversionError, LimitKind, Result, SyntaxErrorKind};
use crate::escape::{canonicalize_escape, code_point, emit_literal, emit_octal, read_octal, utf8_len};
use crate::flags::Flags;
use crate::options::ConvertOptions;

/// Ranges and members that can fold into a shorthand class
#[derive(Debug, Default, Clone, Copy)]
struct Detectors {
    lower: bool,
    upper: bool,
    digits: bool,
    underscores: usize,
}

impl Detectors {
    fn is_word(&self) -> bool {
        self.lower && self.upper && self.digits && self.underscores > 0
    }

    /// The single shorthand letter this exact set of detectors folds into
    fn shorthand(&self) -> Option<u8> {
        match (self.lower, self.upper, self.digits, self.underscores > 0) {
            (true, true, true, true) => Some(b'w'),
            (true, true, false, false) => Some(b'l'),
            (false, false, true, false) => Some(b'd'),
            _ => None,
        }
    }
}

/// The member that a following `-` would start a range from
#[derive(Debug, Clone, Copy)]
struct RangeStart {
    value: u32,
    /// Accumulator offset of the member when it is one plain byte
    literal_at: Option<usize>,
    /// The member is a deferred `_`
    underscore: bool,
}

impl RangeStart {
    fn new(value: u32) -> Self {
        RangeStart {
            value,
            literal_at: None,
            underscore: false,
        }
    }
}

/// The right endpoint of a range
struct Endpoint {
    value: u32,
    text: Vec<u8>,
    raw: Option<u8>,
}

struct ClassBuilder {
    members: WritingEmitter,
    detectors: Detectors,
    left: Option<RangeStart>,
    limit: usize,
}

/// Convert a bracket expression.
///
/// The cursor must sit just after the opening `[`; it is left just after
/// the closing `]`.
pub(crate) fn convert_class<E: Emitter>(
    cursor: &mut Cursor<'_>,
    out: &mut E,
    options: &ConvertOptions,
) -> Result<Flags> {
    let mut class = ClassBuilder {
        members: WritingEmitter::default(),
        detectors: Detectors::default(),
        left: None,
        limit: options.max_class_bytes,
    };

    let negated = cursor.eat(b'^');

    // `]` and `-` are literal members when they come first
    if let Some(first @ (b']' | b'-')) = cursor.peek() {
        cursor.bump();
        class.members.emit(b'\\');
        class.members.emit(first);
        class.left = Some(RangeStart::new(u32::from(first)));
    }

    loop {
        let offset = cursor.position();
        match cursor.bump() {
            None => {
                return Err(ConversionError::syntax(
                    offset,
                    SyntaxErrorKind::UnterminatedClass,
                ));
            }
            Some(b']') => break,
            Some(b'-') => class.range(cursor, offset)?,
            Some(b'\\') => class.escape(cursor, offset)?,
            Some(b'_') => class.underscore(),
            Some(byte) => class.literal(cursor, byte),
        }
        class.check_limit(cursor.position())?;
    }

    class.finish(negated, out);
    Ok(Flags::HAS_WIDTH | Flags::SIMPLE)
}

impl ClassBuilder {
    fn check_limit(&self, offset: usize) -> Result<()> {
        if self.members.mark() > self.limit {
            return Err(ConversionError::limit(
                offset,
                LimitKind::ClassTooComplex { limit: self.limit },
            ));
        }
        Ok(())
    }

    fn push_dash(&mut self) {
        self.members.emit_all(b"\\-");
        self.left = None;
    }

    /// Handle a `-` at `offset`
    fn range(&mut self, cursor: &mut Cursor<'_>, offset: usize) -> Result<()> {
        if matches!(cursor.peek(), None | Some(b']')) {
            self.push_dash();
            return Ok(());
        }
        let Some(left) = self.left.take() else {
            self.push_dash();
            return Ok(());
        };

        let right = read_endpoint(cursor)?;
        if right.value < left.value {
            return Err(ConversionError::syntax(offset, SyntaxErrorKind::InvalidRange));
        }

        if let (Some(at), Some(raw)) = (left.literal_at, right.raw) {
            let from = self.members.as_bytes()[at];
            if at + 1 == self.members.mark() && self.fold_range(from, raw) {
                self.members.rewind(at);
                return Ok(());
            }
        }

        if left.underscore {
            self.detectors.underscores -= 1;
            self.members.emit(b'_');
        }
        self.members.emit(b'-');
        self.members.emit_all(&right.text);
        Ok(())
    }

    fn fold_range(&mut self, from: u8, to: u8) -> bool {
        match (from, to) {
            (b'0', b'9') => self.detectors.digits = true,
            (b'a', b'z') => self.detectors.lower = true,
            (b'A', b'Z') => self.detectors.upper = true,
            _ => return false,
        }
        true
    }

    /// Handle a `\` at `offset`
    fn escape(&mut self, cursor: &mut Cursor<'_>, offset: usize) -> Result<()> {
        let Some(c) = cursor.bump() else {
            return Err(ConversionError::syntax(
                cursor.position(),
                SyntaxErrorKind::UnterminatedClass,
            ));
        };

        self.left = None;
        match c {
            b'd' => self.detectors.digits = true,
            b'l' => {
                self.detectors.lower = true;
                self.detectors.upper = true;
            }
            b'w' => {
                self.detectors.lower = true;
                self.detectors.upper = true;
                self.detectors.digits = true;
                self.detectors.underscores += 1;
            }
            b'D' | b'L' | b's' | b'S' | b'W' => {
                self.members.emit(b'\\');
                self.members.emit(c);
            }
            b'0' => {
                let value = read_octal(cursor, offset)?;
                emit_octal(value, &mut self.members);
                self.left = Some(RangeStart::new(u32::from(value)));
            }
            b'-' => {
                self.members.emit_all(b"\\-");
                self.left = Some(RangeStart::new(u32::from(b'-')));
            }
            _ => {
                let value = canonicalize_escape(c).ok_or_else(|| {
                    ConversionError::syntax(
                        offset,
                        SyntaxErrorKind::InvalidEscape {
                            escape: cursor.char_at(offset + 1).unwrap_or(char::from(c)),
                        },
                    )
                })?;
                self.members.emit(b'\\');
                self.members.emit(c);
                self.left = Some(RangeStart::new(u32::from(value)));
            }
        }
        Ok(())
    }

    fn underscore(&mut self) {
        self.detectors.underscores += 1;
        self.left = Some(RangeStart {
            value: u32::from(b'_'),
            literal_at: None,
            underscore: true,
        });
    }

    fn literal(&mut self, cursor: &mut Cursor<'_>, byte: u8) {
        if byte.is_ascii() {
            let at = self.members.mark();
            let written = emit_literal(byte, &mut self.members);
            self.left = Some(RangeStart {
                value: u32::from(byte),
                literal_at: (written == 1).then_some(at),
                underscore: false,
            });
        } else {
            let mut bytes = vec![byte];
            bytes.extend_from_slice(cursor.take(utf8_len(byte) - 1));
            self.members.emit_all(&bytes);
            self.left = Some(RangeStart::new(code_point(&bytes)));
        }
    }

    fn finish<E: Emitter>(self, negated: bool, out: &mut E) {
        let mut detectors = self.detectors;

        if self.members.mark() == 0 {
            if let Some(letter) = detectors.shorthand() {
                out.emit(b'\\');
                out.emit(if negated { letter.to_ascii_uppercase() } else { letter });
                return;
            }
        }

        out.emit(b'[');
        if negated {
            out.emit(b'^');
        }
        if detectors.is_word() {
            out.emit_all(b"\\w");
            detectors = Detectors::default();
        }
        if detectors.lower && detectors.upper {
            out.emit_all(b"\\l");
            detectors.lower = false;
            detectors.upper = false;
        }
        if detectors.lower {
            out.emit_all(b"a-z");
        }
        if detectors.upper {
            out.emit_all(b"A-Z");
        }
        if detectors.digits {
            out.emit_all(b"\\d");
        }
        if detectors.underscores > 0 {
            out.emit(b'_');
        }
        out.emit_all(self.members.as_bytes());
        out.emit(b']');
    }
}

fn read_endpoint(cursor: &mut Cursor<'_>) -> Result<Endpoint> {
    let offset = cursor.position();
    let Some(byte) = cursor.bump() else {
        return Err(ConversionError::syntax(offset, SyntaxErrorKind::UnterminatedClass));
    };

    if byte == b'\\' {
        let Some(c) = cursor.bump() else {
            return Err(ConversionError::syntax(
                cursor.position(),
                SyntaxErrorKind::UnterminatedClass,
            ));
        };
        let mut text = WritingEmitter::with_capacity(5);
        let value = match c {
            b'0' => {
                let value = read_octal(cursor, offset)?;
                emit_octal(value, &mut text);
                value
            }
            b'-' => {
                text.emit_all(b"\\-");
                b'-'
            }
            _ => {
                let value = canonicalize_escape(c).ok_or_else(|| {
                    ConversionError::syntax(
                        offset,
                        SyntaxErrorKind::InvalidEscape {
                            escape: cursor.char_at(offset + 1).unwrap_or(char::from(c)),
                        },
                    )
                })?;
                text.emit(b'\\');
                text.emit(c);
                value
            }
        };
        return Ok(Endpoint {
            value: u32::from(value),
            text: text.into_bytes(),
            raw: None,
        });
    }

    if byte.is_ascii() {
        let mut text = WritingEmitter::with_capacity(5);
        let written = emit_literal(byte, &mut text);
        Ok(Endpoint {
            value: u32::from(byte),
            text: text.into_bytes(),
            raw: (written == 1).then_some(byte),
        })
    } else {
        let mut bytes = vec![byte];
        bytes.extend_from_slice(cursor.take(utf8_len(byte) - 1));
        Ok(Endpoint {
            value: code_point(&bytes),
            text: bytes,
            raw: None,
        })
    }
}
