//! Legacy pattern to canonical pattern conversion
//!
//! A recursive descent converter, one function per non-terminal:
//!
//! ```text
//!   chunk       := alternative ( '|' alternative )*
//!   alternative := piece*
//!   piece       := atom ( '*' | '+' | '?' )?
//!   atom        := '^' | '$' | '<' | '>' | '.' | '(' chunk ')' | '{'
//!                | '[' class ']' | '\' backref | '\' shorthand | literal-run
//! ```
//!
//! The grammar runs twice over the same input: first into a
//! [`CountingEmitter`] to size the output, then into a [`WritingEmitter`]
//! allocated once from that count.

use crate::class::convert_class;
use crate::cursor::Cursor;
use crate::emitter::{CountingEmitter, Emitter, WritingEmitter};
use crate::error::{ConversionError, LimitKind, Result, SyntaxErrorKind};
use crate::escape::{canonicalize_escape, emit_literal, emit_octal, read_octal, utf8_len};
use crate::flags::Flags;
use crate::options::ConvertOptions;

/// Shorthand class escapes that form an atom of their own
const SHORTHANDS: &[u8] = b"dDlLsSwW";

fn is_quantifier(byte: u8) -> bool {
    matches!(byte, b'*' | b'+' | b'?')
}

/// Bytes that end a literal run
fn is_meta(byte: u8) -> bool {
    matches!(
        byte,
        b'.' | b'*' | b'+' | b'?' | b'[' | b'(' | b'|' | b')' | b'^' | b'<' | b'>' | b'$' | b'{'
    )
}

/// Converts legacy patterns to the canonical dialect
#[derive(Debug, Clone, Default)]
pub struct PatternConverter {
    options: ConvertOptions,
}

/// Result of a conversion with the details gathered along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// The original legacy pattern
    pub input: String,
    /// The canonical pattern
    pub output: String,
    /// Whether every match of the pattern consumes at least one character
    pub has_width: bool,
    /// Byte count produced by the counting pass
    pub counted_len: usize,
    /// Number of capturing groups
    pub groups: usize,
}

impl ConversionReport {
    /// Print a formatted report of the conversion
    pub fn report(&self) {
        println!("Conversion Report");
        println!("=================");
        println!("Input:     {}", self.input);
        println!("Output:    {}", self.output);
        println!("Has width: {}", self.has_width);
        println!("Groups:    {}", self.groups);
        println!("Length:    {}", self.counted_len);
    }
}

/// What a single grammar walk produced
struct Walk<E> {
    out: E,
    flags: Flags,
    groups: usize,
}

impl PatternConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        PatternConverter {
            options: ConvertOptions::default(),
        }
    }

    /// Create a converter with the given options
    pub fn with_options(options: ConvertOptions) -> Self {
        PatternConverter { options }
    }

    /// The options in effect
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a legacy pattern to the canonical dialect
    pub fn convert(&self, pattern: &str) -> Result<String> {
        self.convert_with_report(pattern).map(|report| report.output)
    }

    /// Convert a legacy pattern and report the width and size details
    pub fn convert_with_report(&self, pattern: &str) -> Result<ConversionReport> {
        let counted = self.walk(pattern, CountingEmitter::new())?;
        let counted_len = counted.out.count();

        let written = self
            .walk(pattern, WritingEmitter::with_capacity(counted_len))
            .map_err(|e| {
                log::error!("writing pass failed after counting pass succeeded: {}", e);
                ConversionError::Internal(format!("writing pass diverged: {}", e))
            })?;
        let bytes = written.out.into_bytes();

        if bytes.len() != counted_len || written.flags != counted.flags {
            log::error!(
                "conversion passes disagree: counted {} bytes, wrote {}",
                counted_len,
                bytes.len()
            );
            return Err(ConversionError::Internal(format!(
                "counted {} bytes but wrote {}",
                counted_len,
                bytes.len()
            )));
        }

        let output = String::from_utf8(bytes)
            .map_err(|e| ConversionError::Internal(format!("output is not UTF-8: {}", e)))?;

        log::debug!(
            "converted pattern ({} -> {} bytes, width: {})",
            pattern.len(),
            output.len(),
            counted.flags.has_width()
        );

        Ok(ConversionReport {
            input: pattern.to_string(),
            output,
            has_width: counted.flags.has_width(),
            counted_len,
            groups: counted.groups,
        })
    }

    fn walk<E: Emitter>(&self, pattern: &str, out: E) -> Result<Walk<E>> {
        let mut converter = Converter {
            cursor: Cursor::new(pattern),
            out,
            options: &self.options,
            groups: 0,
        };
        let flags = converter.chunk(false)?;
        Ok(Walk {
            out: converter.out,
            flags,
            groups: converter.groups,
        })
    }
}

/// State of one grammar walk
struct Converter<'a, 'o, E> {
    cursor: Cursor<'a>,
    out: E,
    options: &'o ConvertOptions,
    groups: usize,
}

impl<E: Emitter> Converter<'_, '_, E> {
    /// chunk := alternative ( '|' alternative )*
    ///
    /// Inside parentheses the closing `)` is consumed and emitted here.
    fn chunk(&mut self, in_parens: bool) -> Result<Flags> {
        let mut flags = Flags::HAS_WIDTH;

        loop {
            let branch = self.alternative()?;
            if !branch.has_width() {
                flags.remove(Flags::HAS_WIDTH);
            }
            if self.cursor.eat(b'|') {
                self.out.emit(b'|');
            } else {
                break;
            }
        }

        let offset = self.cursor.position();
        if in_parens {
            if !self.cursor.eat(b')') {
                return Err(ConversionError::syntax(
                    offset,
                    SyntaxErrorKind::MissingRightParen,
                ));
            }
            self.out.emit(b')');
        } else if let Some(byte) = self.cursor.peek() {
            let kind = if byte == b')' {
                SyntaxErrorKind::MissingLeftParen
            } else {
                SyntaxErrorKind::JunkOnEnd
            };
            return Err(ConversionError::syntax(offset, kind));
        }

        Ok(flags)
    }

    /// alternative := piece*
    fn alternative(&mut self) -> Result<Flags> {
        let mut flags = Flags::WORST;
        while let Some(byte) = self.cursor.peek() {
            if byte == b'|' || byte == b')' {
                break;
            }
            let piece = self.piece()?;
            flags |= piece & Flags::HAS_WIDTH;
        }
        Ok(flags)
    }

    /// piece := atom ( '*' | '+' | '?' )?
    fn piece(&mut self) -> Result<Flags> {
        let flags = self.atom()?;

        let Some(op) = self.cursor.peek().filter(|&b| is_quantifier(b)) else {
            return Ok(flags);
        };
        let offset = self.cursor.position();

        if op == b'+' && !flags.has_width() {
            return Err(ConversionError::syntax(
                offset,
                SyntaxErrorKind::EmptyOperand {
                    quantifier: char::from(op),
                },
            ));
        }
        self.cursor.bump();
        self.out.emit(op);

        if self.cursor.peek().is_some_and(is_quantifier) {
            return Err(ConversionError::syntax(
                self.cursor.position(),
                SyntaxErrorKind::NestedQuantifiers,
            ));
        }

        Ok(if op == b'+' {
            Flags::HAS_WIDTH
        } else {
            Flags::WORST
        })
    }

    fn atom(&mut self) -> Result<Flags> {
        let offset = self.cursor.position();
        let Some(byte) = self.cursor.peek() else {
            return Err(ConversionError::Internal(format!(
                "atom called at end of input (offset {})",
                offset
            )));
        };

        match byte {
            b'^' | b'$' | b'<' | b'>' => {
                self.cursor.bump();
                self.out.emit(byte);
                Ok(Flags::WORST)
            }
            b'.' => {
                self.cursor.bump();
                self.out.emit(byte);
                Ok(Flags::HAS_WIDTH | Flags::SIMPLE)
            }
            b'(' => {
                self.cursor.bump();
                self.groups += 1;
                if self.groups > self.options.max_groups {
                    return Err(ConversionError::limit(
                        offset,
                        LimitKind::TooManyGroups {
                            limit: self.options.max_groups,
                        },
                    ));
                }
                self.out.emit(b'(');
                let inner = self.chunk(true)?;
                Ok(inner & Flags::HAS_WIDTH)
            }
            b'{' => {
                self.cursor.bump();
                self.out.emit_all(b"\\{");
                Ok(Flags::HAS_WIDTH | Flags::SIMPLE)
            }
            b'[' => {
                self.cursor.bump();
                convert_class(&mut self.cursor, &mut self.out, self.options)
            }
            b'*' | b'+' | b'?' => Err(ConversionError::syntax(
                offset,
                SyntaxErrorKind::QuantifierFollowsNothing {
                    quantifier: char::from(byte),
                },
            )),
            b'|' | b')' => Err(ConversionError::Internal(format!(
                "unexpected '{}' in atom at offset {}",
                char::from(byte),
                offset
            ))),
            b'\\' => match self.cursor.peek_at(1) {
                Some(digit @ b'1'..=b'9') => {
                    self.cursor.take(2);
                    self.out.emit(b'\\');
                    self.out.emit(digit);
                    Ok(Flags::WORST)
                }
                Some(letter) if SHORTHANDS.contains(&letter) => {
                    self.cursor.take(2);
                    self.out.emit(b'\\');
                    self.out.emit(letter);
                    Ok(Flags::HAS_WIDTH | Flags::SIMPLE)
                }
                _ => self.literal_run(),
            },
            _ => self.literal_run(),
        }
    }

    /// Whether the cursor sits on something that ends a literal run
    fn at_run_end(&self) -> bool {
        match self.cursor.peek() {
            None => true,
            Some(b'\\') => match self.cursor.peek_at(1) {
                Some(b'1'..=b'9') => true,
                Some(b) => SHORTHANDS.contains(&b),
                None => false,
            },
            Some(byte) => is_meta(byte),
        }
    }

    /// Consume the longest run of ordinary or escaped characters.
    ///
    /// When a quantifier follows a run of more than one character, the last
    /// character is given back so the quantifier applies to it alone.
    fn literal_run(&mut self) -> Result<Flags> {
        let mut units = 0;
        let mut last = (self.cursor.checkpoint(), self.out.mark());

        while !self.at_run_end() {
            last = (self.cursor.checkpoint(), self.out.mark());
            self.literal_unit()?;
            units += 1;
        }

        if units > 1 && self.cursor.peek().is_some_and(is_quantifier) {
            log::trace!(
                "splitting last character off literal run at offset {}",
                self.cursor.position()
            );
            self.cursor.restore(last.0);
            self.out.rewind(last.1);
            units -= 1;
        }

        match units {
            0 => Err(ConversionError::Internal(format!(
                "empty literal run at offset {}",
                self.cursor.position()
            ))),
            1 => Ok(Flags::HAS_WIDTH | Flags::SIMPLE),
            _ => Ok(Flags::HAS_WIDTH),
        }
    }

    /// Convert one character of a literal run
    fn literal_unit(&mut self) -> Result<()> {
        let offset = self.cursor.position();
        let Some(byte) = self.cursor.bump() else {
            return Ok(());
        };

        if byte == b'\\' {
            let Some(c) = self.cursor.bump() else {
                return Err(ConversionError::syntax(
                    offset,
                    SyntaxErrorKind::TrailingBackslash,
                ));
            };
            match c {
                b'0' => {
                    let value = read_octal(&mut self.cursor, offset)?;
                    emit_octal(value, &mut self.out);
                }
                b'{' | b'}' => {
                    self.out.emit(b'\\');
                    self.out.emit(c);
                }
                _ if canonicalize_escape(c).is_some() => {
                    self.out.emit(b'\\');
                    self.out.emit(c);
                }
                _ => {
                    return Err(ConversionError::syntax(
                        offset,
                        SyntaxErrorKind::InvalidEscape {
                            escape: self.cursor.char_at(offset + 1).unwrap_or(char::from(c)),
                        },
                    ));
                }
            }
        } else if byte.is_ascii() {
            emit_literal(byte, &mut self.out);
        } else {
            self.out.emit(byte);
            let tail = self.cursor.take(utf8_len(byte) - 1);
            self.out.emit_all(tail);
        }
        Ok(())
    }
}

/// Convert a legacy pattern using default options
pub fn convert_pattern(pattern: &str) -> Result<String> {
    PatternConverter::new().convert(pattern)
}

/// Convert a legacy pattern using default options, with details
pub fn convert_pattern_report(pattern: &str) -> Result<ConversionReport> {
    PatternConverter::new().convert_with_report(pattern)
}
