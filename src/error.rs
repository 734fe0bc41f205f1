//! Error handling for the JSON parser.
//!
//! Every failure is reported as a single [`JsonError`] value. Errors fall into
//! three categories, exposed through [`JsonError::kind`]:
//!
//! - Lexical errors (codes 1xx), raised by the scanner
//! - Syntax errors (codes 2xx), raised by the parser
//! - Limit errors (codes 3xx), raised when configured [`Limits`] are exceeded
//!
//! Each error carries the byte offset at which it was detected. Numeric codes
//! are stable and used by the conformance corpus.
//!
//! [`Limits`]: crate::json::Limits

use thiserror::Error;

/// Broad category of a [`JsonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed token (bad character, escape, number or keyword)
    Lexical,
    /// Well-formed tokens in a position the grammar does not allow
    Syntax,
    /// Input rejected by a configured limit
    Limit,
}

impl ErrorKind {
    /// Lowercase name used in diagnostics and corpus files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Lexical => "lexical",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Limit => "limit",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors the scanner and parser can produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum JsonError {
    /// A character that cannot start any token (code 100)
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedCharacter {
        /// Offending character
        found: char,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// End of input before the closing quote of a string (code 101)
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Backslash followed by a character that is not a JSON escape (code 102)
    #[error("invalid escape {found:?} at byte {offset}")]
    InvalidEscape {
        /// Offending character
        found: char,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// `\u` not followed by four hexadecimal digits (code 103)
    #[error("invalid unicode escape at byte {offset}")]
    InvalidUnicodeEscape {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// High surrogate not followed by a `\u` escape (code 104)
    #[error("missing low surrogate after high surrogate at byte {offset}")]
    MissingLowSurrogate {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// High surrogate followed by a `\u` escape outside DC00-DFFF (code 105)
    #[error("invalid low surrogate {unit:#06x} at byte {offset}")]
    InvalidLowSurrogate {
        /// The UTF-16 code unit from the escape
        unit: u16,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Low surrogate without a preceding high surrogate (code 106)
    #[error("unexpected low surrogate {unit:#06x} without high surrogate at byte {offset}")]
    UnpairedLowSurrogate {
        /// The UTF-16 code unit from the escape
        unit: u16,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Sign not followed by an integer part (code 107)
    #[error("invalid number at byte {offset}")]
    InvalidNumber {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Decimal point not followed by a digit (code 108)
    #[error("invalid fraction at byte {offset}")]
    InvalidFraction {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Exponent marker not followed by a digit (code 109)
    #[error("invalid exponent at byte {offset}")]
    InvalidExponent {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Misspelled or truncated `true`, `false` or `null` (code 110)
    #[error("invalid literal, expected `{expected}` at byte {offset}")]
    InvalidLiteral {
        /// Keyword the input started to spell
        expected: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Input is not valid UTF-8 (code 111)
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Token that cannot start a value (code 200)
    #[error("invalid JSON value: found {found} at byte {offset}")]
    InvalidValue {
        /// Description of the token that was found
        found: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Object member does not start with a string key (code 201)
    #[error("expected string key, found {found} at byte {offset}")]
    ExpectedKey {
        /// Description of the token that was found
        found: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Object key not followed by a colon (code 202)
    #[error("expected `:`, found {found} at byte {offset}")]
    ExpectedColon {
        /// Description of the token that was found
        found: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Object member not followed by `,` or `}` (code 203)
    #[error("expected `,` or `}}` in object, found {found} at byte {offset}")]
    ExpectedCommaOrBrace {
        /// Description of the token that was found
        found: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Array element not followed by `,` or `]` (code 204)
    #[error("expected `,` or `]` in array, found {found} at byte {offset}")]
    ExpectedCommaOrBracket {
        /// Description of the token that was found
        found: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Number literal whose value is not a finite `f64` (code 205)
    #[error("invalid number {lexeme}: out of range at byte {offset}")]
    NumberOutOfRange {
        /// Number text as written in the input
        lexeme: String,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Anything but end of input after the top-level value (code 206)
    #[error("unexpected trailing content: found {found} at byte {offset}")]
    TrailingContent {
        /// Description of the token that was found
        found: &'static str,
        /// Byte offset where the error was detected
        offset: usize,
    },

    /// Input exceeds `Limits::max_input_size` (code 300)
    #[error("input too large: {size} bytes exceeds limit of {limit}")]
    InputTooLarge {
        /// Input size in bytes
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// Nesting exceeds `Limits::max_nesting_depth` (code 301)
    #[error("nesting too deep: depth {depth} exceeds limit of {limit} at byte {offset}")]
    NestingTooDeep {
        /// Nesting depth reached
        depth: usize,
        /// Configured limit
        limit: usize,
        /// Byte offset where the error was detected
        offset: usize,
    },
}

impl JsonError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.code() {
            100..=199 => ErrorKind::Lexical,
            200..=299 => ErrorKind::Syntax,
            _ => ErrorKind::Limit,
        }
    }

    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            JsonError::UnexpectedCharacter { .. } => 100,
            JsonError::UnterminatedString { .. } => 101,
            JsonError::InvalidEscape { .. } => 102,
            JsonError::InvalidUnicodeEscape { .. } => 103,
            JsonError::MissingLowSurrogate { .. } => 104,
            JsonError::InvalidLowSurrogate { .. } => 105,
            JsonError::UnpairedLowSurrogate { .. } => 106,
            JsonError::InvalidNumber { .. } => 107,
            JsonError::InvalidFraction { .. } => 108,
            JsonError::InvalidExponent { .. } => 109,
            JsonError::InvalidLiteral { .. } => 110,
            JsonError::InvalidUtf8 { .. } => 111,
            JsonError::InvalidValue { .. } => 200,
            JsonError::ExpectedKey { .. } => 201,
            JsonError::ExpectedColon { .. } => 202,
            JsonError::ExpectedCommaOrBrace { .. } => 203,
            JsonError::ExpectedCommaOrBracket { .. } => 204,
            JsonError::NumberOutOfRange { .. } => 205,
            JsonError::TrailingContent { .. } => 206,
            JsonError::InputTooLarge { .. } => 300,
            JsonError::NestingTooDeep { .. } => 301,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            JsonError::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            JsonError::UnterminatedString { .. } => "UnterminatedString",
            JsonError::InvalidEscape { .. } => "InvalidEscape",
            JsonError::InvalidUnicodeEscape { .. } => "InvalidUnicodeEscape",
            JsonError::MissingLowSurrogate { .. } => "MissingLowSurrogate",
            JsonError::InvalidLowSurrogate { .. } => "InvalidLowSurrogate",
            JsonError::UnpairedLowSurrogate { .. } => "UnpairedLowSurrogate",
            JsonError::InvalidNumber { .. } => "InvalidNumber",
            JsonError::InvalidFraction { .. } => "InvalidFraction",
            JsonError::InvalidExponent { .. } => "InvalidExponent",
            JsonError::InvalidLiteral { .. } => "InvalidLiteral",
            JsonError::InvalidUtf8 { .. } => "InvalidUtf8",
            JsonError::InvalidValue { .. } => "InvalidValue",
            JsonError::ExpectedKey { .. } => "ExpectedKey",
            JsonError::ExpectedColon { .. } => "ExpectedColon",
            JsonError::ExpectedCommaOrBrace { .. } => "ExpectedCommaOrBrace",
            JsonError::ExpectedCommaOrBracket { .. } => "ExpectedCommaOrBracket",
            JsonError::NumberOutOfRange { .. } => "NumberOutOfRange",
            JsonError::TrailingContent { .. } => "TrailingContent",
            JsonError::InputTooLarge { .. } => "InputTooLarge",
            JsonError::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    /// Byte offset at which the error was detected, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            JsonError::UnexpectedCharacter { offset, .. }
            | JsonError::UnterminatedString { offset }
            | JsonError::InvalidEscape { offset, .. }
            | JsonError::InvalidUnicodeEscape { offset }
            | JsonError::MissingLowSurrogate { offset }
            | JsonError::InvalidLowSurrogate { offset, .. }
            | JsonError::UnpairedLowSurrogate { offset, .. }
            | JsonError::InvalidNumber { offset }
            | JsonError::InvalidFraction { offset }
            | JsonError::InvalidExponent { offset }
            | JsonError::InvalidLiteral { offset, .. }
            | JsonError::InvalidUtf8 { offset }
            | JsonError::InvalidValue { offset, .. }
            | JsonError::ExpectedKey { offset, .. }
            | JsonError::ExpectedColon { offset, .. }
            | JsonError::ExpectedCommaOrBrace { offset, .. }
            | JsonError::ExpectedCommaOrBracket { offset, .. }
            | JsonError::NumberOutOfRange { offset, .. }
            | JsonError::TrailingContent { offset, .. }
            | JsonError::NestingTooDeep { offset, .. } => Some(*offset),
            JsonError::InputTooLarge { .. } => None,
        }
    }
}

/// Result type for parsing operations.
pub type JsonResult<T> = Result<T, JsonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_code_range() {
        assert_eq!(
            JsonError::UnterminatedString { offset: 0 }.kind(),
            ErrorKind::Lexical
        );
        assert_eq!(
            JsonError::TrailingContent {
                found: "number",
                offset: 2
            }
            .kind(),
            ErrorKind::Syntax
        );
        assert_eq!(
            JsonError::InputTooLarge { size: 10, limit: 5 }.kind(),
            ErrorKind::Limit
        );
    }

    #[test]
    fn test_offset() {
        let err = JsonError::ExpectedColon {
            found: "`,`",
            offset: 7,
        };
        assert_eq!(err.offset(), Some(7));
        assert_eq!(err.code(), 202);
        assert_eq!(err.name(), "ExpectedColon");
        assert_eq!(JsonError::InputTooLarge { size: 10, limit: 5 }.offset(), None);
    }

    #[test]
    fn test_display() {
        let err = JsonError::ExpectedCommaOrBrace {
            found: "`]`",
            offset: 9,
        };
        assert_eq!(
            err.to_string(),
            "expected `,` or `}` in object, found `]` at byte 9"
        );
        let err = JsonError::InvalidLowSurrogate {
            unit: 0x0041,
            offset: 3,
        };
        assert_eq!(err.to_string(), "invalid low surrogate 0x0041 at byte 3");
    }
}
