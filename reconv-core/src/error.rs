//! Error types for pattern conversion
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by their source: malformed syntax, exceeded
//! limits, or an internal inconsistency between the two conversion passes.

use thiserror::Error;

/// The main error type for pattern conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Malformed grouping, quantifier, escape or class
    #[error("syntax error at position {offset}: {kind}")]
    Syntax {
        /// Byte offset in the pattern where the error was detected
        offset: usize,
        /// The specific kind of syntax error
        kind: SyntaxErrorKind,
    },

    /// A resource bound was exceeded
    #[error("limit exceeded at position {offset}: {kind}")]
    LimitExceeded {
        /// Byte offset in the pattern where the limit was hit
        offset: usize,
        /// Which limit was exceeded
        kind: LimitKind,
    },

    /// The counting and writing passes disagreed
    #[error("internal error: {0}")]
    Internal(String),
}

/// Specific kinds of syntax errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// `(` without a matching `)`
    #[error("missing right parenthesis ')'")]
    MissingRightParen,

    /// `)` without a matching `(`
    #[error("missing left parenthesis '('")]
    MissingLeftParen,

    /// Input left over after a complete pattern
    #[error("junk on end")]
    JunkOnEnd,

    /// A quantifier with no operand, e.g. `+abc`
    #[error("'{quantifier}' follows nothing")]
    QuantifierFollowsNothing {
        /// The offending quantifier
        quantifier: char,
    },

    /// Stacked quantifiers such as `a**` or `a?+`
    #[error("nested quantifiers *, + or ?")]
    NestedQuantifiers,

    /// `+` applied to something that may match the empty string
    #[error("'{quantifier}' operand could be empty")]
    EmptyOperand {
        /// The offending quantifier
        quantifier: char,
    },

    /// `\` followed by a character that is not a known escape
    #[error("'\\{}' is an invalid escape sequence", display_escape(.escape))]
    InvalidEscape {
        /// The character following the backslash
        escape: char,
    },

    /// `\` as the final byte of a pattern
    #[error("trailing '\\' at end of pattern")]
    TrailingBackslash,

    /// `[` without a closing `]`
    #[error("missing right ']'")]
    UnterminatedClass,

    /// A class range whose left endpoint sorts after its right endpoint
    #[error("invalid [] range")]
    InvalidRange,
}

/// Limits that a conversion can exceed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitKind {
    /// More capturing groups than allowed
    #[error("too many '(' groups (limit {limit})")]
    TooManyGroups {
        /// The configured group limit
        limit: usize,
    },

    /// A character class whose body outgrew the accumulator bound
    #[error("character class too complex (limit {limit} bytes)")]
    ClassTooComplex {
        /// The configured byte bound
        limit: usize,
    },
}

impl ConversionError {
    /// Create a syntax error at the given offset
    pub fn syntax(offset: usize, kind: SyntaxErrorKind) -> Self {
        ConversionError::Syntax { offset, kind }
    }

    /// Create a limit error at the given offset
    pub fn limit(offset: usize, kind: LimitKind) -> Self {
        ConversionError::LimitExceeded { offset, kind }
    }

    /// Byte offset where the error was detected, if it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            ConversionError::Syntax { offset, .. } | ConversionError::LimitExceeded { offset, .. } => {
                Some(*offset)
            }
            ConversionError::Internal(_) => None,
        }
    }

    /// The human-readable message without the position prefix
    pub fn message(&self) -> String {
        match self {
            ConversionError::Syntax { kind, .. } => kind.to_string(),
            ConversionError::LimitExceeded { kind, .. } => kind.to_string(),
            ConversionError::Internal(msg) => msg.clone(),
        }
    }

    /// Whether this error is a resource limit rather than bad syntax
    pub fn is_limit(&self) -> bool {
        matches!(self, ConversionError::LimitExceeded { .. })
    }
}

fn display_escape(escape: &char) -> String {
    if escape.is_control() || escape.is_whitespace() {
        format!("x{:02X}", u32::from(*escape))
    } else {
        escape.to_string()
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ConversionError::syntax(2, SyntaxErrorKind::NestedQuantifiers);
        assert_eq!(
            err.to_string(),
            "syntax error at position 2: nested quantifiers *, + or ?"
        );
    }

    #[test]
    fn test_follows_nothing_display() {
        let err = ConversionError::syntax(
            0,
            SyntaxErrorKind::QuantifierFollowsNothing { quantifier: '+' },
        );
        assert_eq!(err.message(), "'+' follows nothing");
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_invalid_escape_display() {
        let err = SyntaxErrorKind::InvalidEscape { escape: 'q' };
        assert_eq!(err.to_string(), "'\\q' is an invalid escape sequence");

        let err = SyntaxErrorKind::InvalidEscape { escape: '\t' };
        assert_eq!(err.to_string(), "'\\x09' is an invalid escape sequence");

        let err = SyntaxErrorKind::InvalidEscape { escape: 'é' };
        assert_eq!(err.to_string(), "'\\é' is an invalid escape sequence");
    }

    #[test]
    fn test_limit_error() {
        let err = ConversionError::limit(120, LimitKind::TooManyGroups { limit: 50 });
        assert!(err.is_limit());
        assert_eq!(err.offset(), Some(120));
        assert_eq!(err.message(), "too many '(' groups (limit 50)");
        assert!(err.to_string().starts_with("limit exceeded at position 120"));
    }

    #[test]
    fn test_internal_error_has_no_offset() {
        let err = ConversionError::Internal("pass mismatch".to_string());
        assert_eq!(err.offset(), None);
        assert!(!err.is_limit());
        assert_eq!(err.to_string(), "internal error: pass mismatch");
    }
}
