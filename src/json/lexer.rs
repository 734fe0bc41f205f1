//! JSON lexer/tokenizer.
//!
//! Converts raw JSON input bytes into a stream of tokens for the parser.
//! Tokens are produced on demand, one per [`Lexer::next_token`] call.
//!
//! The lexer keeps only a byte offset and the width of the last consumed
//! code point, which is enough to step back once when a number literal ends.
//! String tokens carry their fully decoded content; number tokens carry the
//! verbatim source text, converted later by the parser.

use super::limits::Limits;
use crate::error::{JsonError, JsonResult};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Colon `:`
    Colon,
    /// Comma `,`
    Comma,
    /// Null literal
    Null,
    /// True literal
    True,
    /// False literal
    False,
    /// String value (unescaped)
    String(String),
    /// Number value (raw source text)
    Number(&'a str),
    /// End of input
    Eof,
}

impl Token<'_> {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::LeftBrace => "`{`",
            Token::RightBrace => "`}`",
            Token::LeftBracket => "`[`",
            Token::RightBracket => "`]`",
            Token::Colon => "`:`",
            Token::Comma => "`,`",
            Token::Null => "`null`",
            Token::True => "`true`",
            Token::False => "`false`",
            Token::String(_) => "string",
            Token::Number(_) => "number",
            Token::Eof => "end of input",
        }
    }
}

/// JSON lexer that tokenizes input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    width: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    ///
    /// Fails if the input exceeds `limits.max_input_size` or is not UTF-8.
    pub fn new(input: &'a [u8], limits: Limits) -> JsonResult<Self> {
        if input.len() > limits.max_input_size {
            return Err(JsonError::InputTooLarge {
                size: input.len(),
                limit: limits.max_input_size,
            });
        }

        let input = std::str::from_utf8(input).map_err(|e| JsonError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;

        Ok(Self {
            input,
            pos: 0,
            width: 0,
            start: 0,
        })
    }

    /// Get the current position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset where the most recently returned token starts.
    pub fn token_start(&self) -> usize {
        self.start
    }

    /// Consume and return the next code point.
    fn bump(&mut self) -> Option<char> {
        match self.peek() {
            Some(c) => {
                self.width = c.len_utf8();
                self.pos += self.width;
                Some(c)
            }
            None => {
                self.width = 0;
                None
            }
        }
    }

    /// Step back over the last consumed code point. Only one step is kept.
    fn backup(&mut self) {
        self.pos -= self.width;
        self.width = 0;
    }

    /// Peek at the next code point without consuming it.
    fn peek(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    /// Skip whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.bump();
        }
    }

    /// Read the next token from the input.
    pub fn next_token(&mut self) -> JsonResult<Token<'a>> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.bump() else {
            return Ok(Token::Eof);
        };

        match c {
            '{' => Ok(Token::LeftBrace),
            '}' => Ok(Token::RightBrace),
            '[' => Ok(Token::LeftBracket),
            ']' => Ok(Token::RightBracket),
            ':' => Ok(Token::Colon),
            ',' => Ok(Token::Comma),
            '"' => self.read_string(),
            't' => self.read_literal("rue", "true", Token::True),
            'f' => self.read_literal("alse", "false", Token::False),
            'n' => self.read_literal("ull", "null", Token::Null),
            '-' | '0'..='9' => {
                self.backup();
                self.read_number()
            }
            found => Err(JsonError::UnexpectedCharacter {
                found,
                offset: self.start,
            }),
        }
    }

    /// Match the remainder of a keyword whose first letter was consumed.
    fn read_literal(
        &mut self,
        rest: &str,
        expected: &'static str,
        token: Token<'a>,
    ) -> JsonResult<Token<'a>> {
        for ch in rest.chars() {
            if self.bump() != Some(ch) {
                return Err(JsonError::InvalidLiteral {
                    expected,
                    offset: self.start,
                });
            }
        }
        Ok(token)
    }

    /// Read a string token, handling escape sequences.
    fn read_string(&mut self) -> JsonResult<Token<'a>> {
        let mut result = String::new();

        loop {
            let offset = self.pos;
            match self.bump() {
                None => {
                    return Err(JsonError::UnterminatedString { offset: self.start });
                }
                Some('"') => return Ok(Token::String(result)),
                Some('\\') => {
                    let escaped = self.read_escape_sequence(offset)?;
                    result.push(escaped);
                }
                Some(c) => result.push(c),
            }
        }
    }

    /// Read an escape sequence after a backslash at `offset`.
    fn read_escape_sequence(&mut self, offset: usize) -> JsonResult<char> {
        match self.bump() {
            None => Err(JsonError::UnterminatedString { offset: self.start }),
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\x08'),
            Some('f') => Ok('\x0C'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => self.read_unicode_escape(offset),
            Some(found) => Err(JsonError::InvalidEscape { found, offset }),
        }
    }

    /// Read a \uXXXX unicode escape sequence, joining surrogate pairs.
    fn read_unicode_escape(&mut self, offset: usize) -> JsonResult<char> {
        let unit = self.read_hex4(offset)?;

        match unit {
            0xD800..=0xDBFF => {
                // A high surrogate must be followed directly by \uXXXX
                let low_offset = self.pos;
                if self.bump() != Some('\\') || self.bump() != Some('u') {
                    return Err(JsonError::MissingLowSurrogate { offset });
                }
                let low = self.read_hex4(low_offset)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(JsonError::InvalidLowSurrogate {
                        unit: low,
                        offset: low_offset,
                    });
                }
                let combined =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(combined).ok_or(JsonError::InvalidUnicodeEscape { offset })
            }
            0xDC00..=0xDFFF => Err(JsonError::UnpairedLowSurrogate { unit, offset }),
            _ => char::from_u32(u32::from(unit)).ok_or(JsonError::InvalidUnicodeEscape { offset }),
        }
    }

    /// Read 4 hex digits and return the value.
    fn read_hex4(&mut self, offset: usize) -> JsonResult<u16> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(JsonError::InvalidUnicodeEscape { offset })?;
            value = (value << 4) | digit as u16;
        }
        Ok(value)
    }

    /// Consume a run of ASCII digits and return the first non-digit.
    fn skip_digits(&mut self) -> Option<char> {
        loop {
            let c = self.bump();
            if !matches!(c, Some('0'..='9')) {
                return c;
            }
        }
    }

    /// Read a number token.
    ///
    /// Grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
    fn read_number(&mut self) -> JsonResult<Token<'a>> {
        let start = self.pos;

        let mut c = self.bump();
        if c == Some('-') {
            c = self.bump();
        }

        // Integer part; a leading zero ends it
        match c {
            Some('0') => c = self.bump(),
            Some('1'..='9') => c = self.skip_digits(),
            _ => return Err(JsonError::InvalidNumber { offset: start }),
        }

        if c == Some('.') {
            if !matches!(self.bump(), Some('0'..='9')) {
                return Err(JsonError::InvalidFraction { offset: start });
            }
            c = self.skip_digits();
        }

        if let Some('e' | 'E') = c {
            c = self.bump();
            if let Some('+' | '-') = c {
                c = self.bump();
            }
            if !matches!(c, Some('0'..='9')) {
                return Err(JsonError::InvalidExponent { offset: start });
            }
            self.skip_digits();
        }

        // The last code point read is not part of the number
        self.backup();

        self.input
            .get(start..self.pos)
            .map(Token::Number)
            .ok_or(JsonError::InvalidNumber { offset: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> JsonResult<Vec<Token<'_>>> {
        let mut lexer = Lexer::new(input.as_bytes(), Limits::lenient())?;
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn lex_err(input: &str) -> JsonError {
        lex(input).unwrap_err()
    }

    #[test]
    fn test_structural_tokens() {
        let tokens = lex("{}[],:").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        let tokens = lex(" \t\r\n[ \n1 ]\r\n").unwrap();
        assert_eq!(
            tokens,
            vec![Token::LeftBracket, Token::Number("1"), Token::RightBracket]
        );
    }

    #[test]
    fn test_only_json_whitespace() {
        // U+00A0 is whitespace in Unicode but not in JSON
        let err = lex_err("\u{a0}1");
        assert_eq!(
            err,
            JsonError::UnexpectedCharacter {
                found: '\u{a0}',
                offset: 0
            }
        );
    }

    #[test]
    fn test_literals() {
        let tokens = lex("null true false").unwrap();
        assert_eq!(tokens, vec![Token::Null, Token::True, Token::False]);
    }

    #[test]
    fn test_bad_literals() {
        assert_eq!(
            lex_err("nul"),
            JsonError::InvalidLiteral {
                expected: "null",
                offset: 0
            }
        );
        assert_eq!(
            lex_err("[tru]"),
            JsonError::InvalidLiteral {
                expected: "true",
                offset: 1
            }
        );
        assert_eq!(lex_err("fals").code(), 110);
    }

    #[test]
    fn test_string() {
        let tokens = lex(r#""hello""#).unwrap();
        assert_eq!(tokens, vec![Token::String("hello".to_string())]);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\nb\tc\"\\\/\b\f\r""#).unwrap();
        assert_eq!(
            tokens,
            vec![Token::String("a\nb\tc\"\\/\x08\x0C\r".to_string())]
        );
    }

    #[test]
    fn test_string_multibyte_passthrough() {
        let tokens = lex("\"olá こんにちは 😀\"").unwrap();
        assert_eq!(tokens, vec![Token::String("olá こんにちは 😀".to_string())]);
    }

    #[test]
    fn test_unicode_escape() {
        let mut lexer = Lexer::new(r#""\u0041\u00DF""#.as_bytes(), Limits::lenient()).unwrap();
        let token = lexer.next_token().unwrap();
        assert_eq!(token, Token::String("Aß".to_string()));
    }

    #[test]
    fn test_surrogate_pair() {
        let tokens = lex(r#""\uD83D\uDE00""#).unwrap();
        assert_eq!(tokens, vec![Token::String("\u{1F600}".to_string())]);
    }

    #[test]
    fn test_surrogate_errors() {
        assert_eq!(
            lex_err(r#""\uD83D""#),
            JsonError::MissingLowSurrogate { offset: 1 }
        );
        assert_eq!(
            lex_err(r#""\uD83Dx""#),
            JsonError::MissingLowSurrogate { offset: 1 }
        );
        assert_eq!(
            lex_err(r#""\uD83D\u0041""#),
            JsonError::InvalidLowSurrogate {
                unit: 0x0041,
                offset: 7
            }
        );
        assert_eq!(
            lex_err(r#""\uDE00\uD83D""#),
            JsonError::UnpairedLowSurrogate {
                unit: 0xDE00,
                offset: 1
            }
        );
    }

    #[test]
    fn test_invalid_unicode_escape() {
        assert_eq!(
            lex_err(r#""\u00G1""#),
            JsonError::InvalidUnicodeEscape { offset: 1 }
        );
        assert_eq!(lex_err(r#""\u00"#).code(), 103);
    }

    #[test]
    fn test_invalid_escape() {
        assert_eq!(
            lex_err(r#""a\qb""#),
            JsonError::InvalidEscape {
                found: 'q',
                offset: 2
            }
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            lex_err(r#"  "abc"#),
            JsonError::UnterminatedString { offset: 2 }
        );
        assert_eq!(
            lex_err(r#""abc\"#),
            JsonError::UnterminatedString { offset: 0 }
        );
    }

    #[test]
    fn test_number() {
        let tokens = lex("42 -123 0 -0 3.25 1e10 1E+2 2.5e-3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number("42"),
                Token::Number("-123"),
                Token::Number("0"),
                Token::Number("-0"),
                Token::Number("3.25"),
                Token::Number("1e10"),
                Token::Number("1E+2"),
                Token::Number("2.5e-3"),
            ]
        );
    }

    #[test]
    fn test_number_boundary() {
        let tokens = lex("[1,-2]").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftBracket,
                Token::Number("1"),
                Token::Comma,
                Token::Number("-2"),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_leading_zero_splits() {
        let tokens = lex("01").unwrap();
        assert_eq!(tokens, vec![Token::Number("0"), Token::Number("1")]);
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(lex_err("-"), JsonError::InvalidNumber { offset: 0 });
        assert_eq!(lex_err("-a"), JsonError::InvalidNumber { offset: 0 });
        assert_eq!(lex_err("1."), JsonError::InvalidFraction { offset: 0 });
        assert_eq!(lex_err(" 1.e5"), JsonError::InvalidFraction { offset: 1 });
        assert_eq!(lex_err("1e"), JsonError::InvalidExponent { offset: 0 });
        assert_eq!(lex_err("1e+"), JsonError::InvalidExponent { offset: 0 });
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            lex_err("[+1]"),
            JsonError::UnexpectedCharacter {
                found: '+',
                offset: 1
            }
        );
        assert_eq!(lex_err(".5").code(), 100);
    }

    #[test]
    fn test_token_start() {
        let mut lexer = Lexer::new(b"  [ \"x\"", Limits::lenient()).unwrap();
        assert_eq!(lexer.next_token().unwrap(), Token::LeftBracket);
        assert_eq!(lexer.token_start(), 2);
        assert_eq!(lexer.next_token().unwrap(), Token::String("x".to_string()));
        assert_eq!(lexer.token_start(), 4);
        assert_eq!(lexer.position(), 7);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert_eq!(lexer.token_start(), 7);
    }

    #[test]
    fn test_invalid_utf8() {
        let invalid = vec![b'"', b'a', 0xFF, 0xFE, b'"'];
        let result = Lexer::new(&invalid, Limits::strict());
        assert_eq!(result.err(), Some(JsonError::InvalidUtf8 { offset: 2 }));
    }

    #[test]
    fn test_input_too_large() {
        let limits = Limits::strict().with_max_input_size(10);
        let result = Lexer::new(b"this is more than 10 bytes", limits);
        assert_eq!(
            result.err(),
            Some(JsonError::InputTooLarge {
                size: 26,
                limit: 10
            })
        );
    }
}
