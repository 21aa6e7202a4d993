//! Reconv Core Library
//!
//! Converts highlight and search patterns written in the legacy regex
//! dialect (bare braces, `\0` as whole-match reference, raw class ranges)
//! into the canonical dialect understood by the editor's matching engine,
//! and converts substitution templates between the same two dialects.

mod class;
pub mod cursor;
pub mod emitter;
pub mod error;
pub mod escape;
pub mod ffi;
pub mod flags;
pub mod options;
pub mod pattern;
pub mod substitute;

pub use emitter::{CountingEmitter, Emitter, WritingEmitter};
pub use error::{ConversionError, LimitKind, Result, SyntaxErrorKind};
pub use escape::{canonicalize_escape, control_to_escape_letter};
pub use flags::Flags;
pub use options::ConvertOptions;
pub use pattern::{ConversionReport, PatternConverter, convert_pattern, convert_pattern_report};
pub use substitute::{SubstitutionConverter, SubstitutionOutput, convert_substitution};
