//! Substitution template conversion
//!
//! Replacement templates are converted in a single permissive pass:
//! `\0` becomes `&`, case-change tokens, numbered backreferences and known
//! escapes pass through, and any other `\X` loses its backslash. Nothing
//! here fails unless strict mode is asked for explicitly.

use crate::emitter::{Emitter, WritingEmitter};
use crate::error::{ConversionError, Result, SyntaxErrorKind};
use crate::escape::{canonicalize_escape, emit_literal};

/// Converts legacy substitution templates to the canonical dialect
#[derive(Debug, Clone, Default)]
pub struct SubstitutionConverter {
    max_len: Option<usize>,
    strict: bool,
}

/// Full outcome of a substitution conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionOutput {
    /// The canonical template
    pub output: String,
    /// Whether the output cap cut the conversion short
    pub truncated: bool,
    /// Offsets of backslashes dropped from unrecognised escapes
    pub dropped: Vec<usize>,
}

impl SubstitutionConverter {
    /// Create an unbounded, permissive converter
    pub fn new() -> Self {
        SubstitutionConverter {
            max_len: None,
            strict: false,
        }
    }

    /// Cap the output at `max` bytes.
    ///
    /// Conversion stops silently before the first token that would not fit.
    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Make [`convert_checked`](Self::convert_checked) reject unknown escapes
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Convert a template, dropping the backslash of unknown escapes
    pub fn convert(&self, template: &str) -> String {
        self.translate(template).output
    }

    /// Convert a template, failing on unknown escapes in strict mode
    pub fn convert_checked(&self, template: &str) -> Result<String> {
        let translated = self.translate(template);
        if self.strict {
            if let Some(&offset) = translated.dropped.first() {
                let escape = template
                    .get(offset + 1..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or('\\');
                return Err(ConversionError::syntax(
                    offset,
                    SyntaxErrorKind::InvalidEscape { escape },
                ));
            }
        }
        Ok(translated.output)
    }

    /// Convert a template and report truncation and dropped escapes
    pub fn translate(&self, template: &str) -> SubstitutionOutput {
        let mut out = WritingEmitter::with_capacity(template.len());
        let mut token = WritingEmitter::with_capacity(8);
        let mut dropped = Vec::new();
        let mut truncated = false;
        let mut chars = template.char_indices();

        while let Some((offset, c)) = chars.next() {
            token.rewind(0);

            if c == '\\' {
                match chars.next() {
                    // a final backslash is literal
                    None => token.emit(b'\\'),
                    Some((_, '0')) => token.emit(b'&'),
                    Some((_, next @ ('u' | 'U' | 'l' | 'L' | '1'..='9'))) => {
                        token.emit(b'\\');
                        emit_char(next, &mut token);
                    }
                    Some((_, next)) if is_known_escape(next) => {
                        token.emit(b'\\');
                        emit_char(next, &mut token);
                    }
                    Some((_, next)) => {
                        log::warn!(
                            "dropping backslash of unknown escape '\\{}' at offset {}",
                            next,
                            offset
                        );
                        dropped.push(offset);
                        emit_char(next, &mut token);
                    }
                }
            } else {
                emit_char(c, &mut token);
            }

            if let Some(max) = self.max_len {
                if out.mark() + token.mark() > max {
                    log::warn!("substitution truncated at {} bytes", out.mark());
                    truncated = true;
                    break;
                }
            }
            out.emit_all(token.as_bytes());
        }

        // tokens are whole characters, so the buffer is always valid UTF-8
        let output = String::from_utf8(out.into_bytes())
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        SubstitutionOutput {
            output,
            truncated,
            dropped,
        }
    }
}

fn is_known_escape(c: char) -> bool {
    u8::try_from(c).is_ok_and(|b| canonicalize_escape(b).is_some())
}

fn emit_char<E: Emitter>(c: char, out: &mut E) {
    if c.is_ascii() {
        emit_literal(c as u8, out);
    } else {
        let mut buf = [0u8; 4];
        out.emit_all(c.encode_utf8(&mut buf).as_bytes());
    }
}

/// Convert a substitution template with no output cap
pub fn convert_substitution(template: &str) -> String {
    SubstitutionConverter::new().convert(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_match_reference() {
        assert_eq!(convert_substitution("\\0 and \\1"), "& and \\1");
        assert_eq!(convert_substitution("&"), "&");
        assert_eq!(convert_substitution("[\\0]"), "[&]");
    }

    #[test]
    fn test_numbered_backrefs() {
        assert_eq!(convert_substitution("\\2-\\1"), "\\2-\\1");
        assert_eq!(convert_substitution("\\9"), "\\9");
    }

    #[test]
    fn test_case_tokens() {
        assert_eq!(convert_substitution("\\u\\1\\L\\2"), "\\u\\1\\L\\2");
        assert_eq!(convert_substitution("\\U"), "\\U");
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(convert_substitution("abc\\"), "abc\\");
        assert_eq!(convert_substitution("\\"), "\\");
    }

    #[test]
    fn test_known_escapes_pass_through() {
        assert_eq!(convert_substitution("a\\nb\\t"), "a\\nb\\t");
        assert_eq!(convert_substitution("\\&\\\\"), "\\&\\\\");
    }

    #[test]
    fn test_unknown_escapes_lose_backslash() {
        assert_eq!(convert_substitution("\\q"), "q");
        assert_eq!(convert_substitution("\\{x\\}"), "{x}");
        assert_eq!(convert_substitution("\\é"), "é");
    }

    #[test]
    fn test_raw_controls_are_escaped() {
        assert_eq!(convert_substitution("a\tb\n"), "a\\tb\\n");
        assert_eq!(convert_substitution("\u{1}"), "\\0001");
        assert_eq!(convert_substitution("\\\t"), "\\t");
    }

    #[test]
    fn test_translate_reports_dropped() {
        let result = SubstitutionConverter::new().translate("a\\qb\\z");
        assert_eq!(result.output, "aqbz");
        assert_eq!(result.dropped, vec![1, 4]);
        assert!(!result.truncated);
    }

    #[test]
    fn test_max_len_truncates_on_token_boundary() {
        let converter = SubstitutionConverter::new().max_len(4);
        let result = converter.translate("abc\\1def");
        assert_eq!(result.output, "abc");
        assert!(result.truncated);

        assert_eq!(converter.convert("ab"), "ab");
        assert_eq!(SubstitutionConverter::new().max_len(0).convert("x"), "");
    }

    #[test]
    fn test_strict_mode() {
        let strict = SubstitutionConverter::new().strict(true);
        assert_eq!(strict.convert_checked("\\0\\1").unwrap(), "&\\1");
        assert_eq!(
            strict.convert_checked("ab\\q").unwrap_err(),
            ConversionError::syntax(2, SyntaxErrorKind::InvalidEscape { escape: 'q' })
        );
        assert_eq!(
            strict.convert_checked("a\\éb").unwrap_err(),
            ConversionError::syntax(1, SyntaxErrorKind::InvalidEscape { escape: 'é' })
        );
        // permissive conversion is unaffected by the strict flag
        assert_eq!(strict.convert("ab\\q"), "abq");
        assert_eq!(
            SubstitutionConverter::new().convert_checked("ab\\q").unwrap(),
            "abq"
        );
    }
}
