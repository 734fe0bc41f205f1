//! Recursive descent JSON parser.
//!
//! Pulls tokens lazily from the [`Lexer`] with one token of lookahead and
//! builds a [`JsonValue`] bottom-up. The first error aborts the parse; no
//! partial value is ever returned.
//!
//! Each grammar rule (value, object, array) is one method, so the call
//! stack tracks the nesting depth of the document. The depth counter checked
//! against [`Limits::max_nesting_depth`] keeps hostile input from
//! overflowing the stack.

use super::lexer::{Lexer, Token};
use super::limits::Limits;
use super::types::{JsonValue, Map};
use crate::error::{JsonError, JsonResult};

/// JSON parser over a single input buffer.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Lookahead buffer: a fetched but unconsumed token and its offset
    peeked: Option<(usize, Token<'a>)>,
    limits: Limits,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a [u8], limits: Limits) -> JsonResult<Self> {
        let lexer = Lexer::new(input, limits)?;
        Ok(Self {
            lexer,
            peeked: None,
            limits,
            depth: 0,
        })
    }

    /// Parse exactly one value followed by end of input.
    pub fn parse(&mut self) -> JsonResult<JsonValue> {
        let value = self.parse_value()?;

        // Anything after a complete value is trailing content, even text
        // that does not scan as a token
        let (offset, token) = self.next().map_err(|_| JsonError::TrailingContent {
            found: "invalid token",
            offset: self.lexer.token_start(),
        })?;
        if token != Token::Eof {
            return Err(JsonError::TrailingContent {
                found: token.describe(),
                offset,
            });
        }

        Ok(value)
    }

    /// Scan a fresh token from the lexer, paired with its start offset.
    fn fetch(&mut self) -> JsonResult<(usize, Token<'a>)> {
        let token = self.lexer.next_token()?;
        Ok((self.lexer.token_start(), token))
    }

    /// Look at the next token without consuming it.
    fn peek(&mut self) -> JsonResult<&Token<'a>> {
        let entry = match self.peeked.take() {
            Some(entry) => entry,
            None => self.fetch()?,
        };
        let (_, token) = self.peeked.insert(entry);
        Ok(token)
    }

    /// Consume the next token, from the lookahead buffer if one is there.
    fn next(&mut self) -> JsonResult<(usize, Token<'a>)> {
        match self.peeked.take() {
            Some(entry) => Ok(entry),
            None => self.fetch(),
        }
    }

    /// Consume the next token and require it to equal `expected`.
    fn expect(
        &mut self,
        expected: Token<'a>,
        mismatch: fn(&'static str, usize) -> JsonError,
    ) -> JsonResult<()> {
        let (offset, token) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(mismatch(token.describe(), offset))
        }
    }

    /// Enter one level of nesting at `offset`.
    fn enter(&mut self, offset: usize) -> JsonResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            return Err(JsonError::NestingTooDeep {
                depth: self.depth,
                limit: self.limits.max_nesting_depth,
                offset,
            });
        }
        Ok(())
    }

    /// Parse a single JSON value.
    fn parse_value(&mut self) -> JsonResult<JsonValue> {
        if matches!(self.peek()?, Token::LeftBrace) {
            return self.parse_object();
        }
        if matches!(self.peek()?, Token::LeftBracket) {
            return self.parse_array();
        }

        let (offset, token) = self.next()?;
        match token {
            Token::String(s) => Ok(JsonValue::String(s)),
            Token::Number(lexeme) => parse_number(lexeme, offset),
            Token::True => Ok(JsonValue::Bool(true)),
            Token::False => Ok(JsonValue::Bool(false)),
            Token::Null => Ok(JsonValue::Null),
            other => Err(JsonError::InvalidValue {
                found: other.describe(),
                offset,
            }),
        }
    }

    /// Parse a JSON object.
    fn parse_object(&mut self) -> JsonResult<JsonValue> {
        let (open, _) = self.next()?;
        self.enter(open)?;

        let mut map = Map::new();

        // Empty object
        if matches!(self.peek()?, Token::RightBrace) {
            self.next()?;
            self.depth -= 1;
            return Ok(JsonValue::Object(map));
        }

        loop {
            // A comma always requires another key, so `{"a":1,}` fails here
            let key = match self.next()? {
                (_, Token::String(key)) => key,
                (offset, other) => {
                    return Err(JsonError::ExpectedKey {
                        found: other.describe(),
                        offset,
                    });
                }
            };

            self.expect(Token::Colon, |found, offset| JsonError::ExpectedColon {
                found,
                offset,
            })?;

            let value = self.parse_value()?;
            // Last write wins for duplicate keys
            map.insert(key, value);

            match self.next()? {
                (_, Token::Comma) => continue,
                (_, Token::RightBrace) => break,
                (offset, other) => {
                    return Err(JsonError::ExpectedCommaOrBrace {
                        found: other.describe(),
                        offset,
                    });
                }
            }
        }

        self.depth -= 1;
        Ok(JsonValue::Object(map))
    }

    /// Parse a JSON array.
    fn parse_array(&mut self) -> JsonResult<JsonValue> {
        let (open, _) = self.next()?;
        self.enter(open)?;

        let mut arr = Vec::new();

        // Empty array
        if matches!(self.peek()?, Token::RightBracket) {
            self.next()?;
            self.depth -= 1;
            return Ok(JsonValue::Array(arr));
        }

        loop {
            arr.push(self.parse_value()?);

            match self.next()? {
                (_, Token::Comma) => continue,
                (_, Token::RightBracket) => break,
                (offset, other) => {
                    return Err(JsonError::ExpectedCommaOrBracket {
                        found: other.describe(),
                        offset,
                    });
                }
            }
        }

        self.depth -= 1;
        Ok(JsonValue::Array(arr))
    }
}

/// Convert a number lexeme to a finite `f64`.
fn parse_number(lexeme: &str, offset: usize) -> JsonResult<JsonValue> {
    let out_of_range = || JsonError::NumberOutOfRange {
        lexeme: lexeme.to_string(),
        offset,
    };

    let value: f64 = lexeme.parse().map_err(|_| out_of_range())?;
    if !value.is_finite() {
        return Err(out_of_range());
    }

    Ok(JsonValue::Number(value))
}

/// Parse a JSON document with default limits.
pub fn parse(input: &[u8]) -> JsonResult<JsonValue> {
    parse_with_limits(input, Limits::default())
}

/// Parse a JSON document with custom limits.
pub fn parse_with_limits(input: &[u8], limits: Limits) -> JsonResult<JsonValue> {
    tracing::trace!(len = input.len(), "parsing JSON document");

    let result = Parser::new(input, limits).and_then(|mut parser| parser.parse());
    if let Err(err) = &result {
        tracing::debug!(
            code = err.code(),
            kind = %err.kind(),
            offset = ?err.offset(),
            "JSON parse failed: {err}"
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse_lenient(input: &str) -> JsonResult<JsonValue> {
        parse_with_limits(input.as_bytes(), Limits::lenient())
    }

    #[test]
    fn test_parse_null() {
        let result = parse_lenient("null").unwrap();
        assert_eq!(result, JsonValue::Null);
    }

    #[test]
    fn test_parse_booleans() {
        assert_eq!(parse_lenient("true").unwrap(), JsonValue::Bool(true));
        assert_eq!(parse_lenient("false").unwrap(), JsonValue::Bool(false));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_lenient("42").unwrap(), JsonValue::Number(42.0));
        assert_eq!(parse_lenient("-123").unwrap(), JsonValue::Number(-123.0));
        assert_eq!(parse_lenient("0").unwrap(), JsonValue::Number(0.0));
        assert_eq!(parse_lenient("2.5e-3").unwrap(), JsonValue::Number(0.0025));
        assert_eq!(parse_lenient("1E+2").unwrap(), JsonValue::Number(100.0));
    }

    #[test]
    fn test_integer_and_fraction_are_identical() {
        assert_eq!(parse_lenient("1").unwrap(), parse_lenient("1.0").unwrap());
    }

    #[test]
    fn test_number_out_of_range() {
        let err = parse_lenient("[1e400]").unwrap_err();
        assert_eq!(
            err,
            JsonError::NumberOutOfRange {
                lexeme: "1e400".to_string(),
                offset: 1
            }
        );
        assert_eq!(parse_lenient("-1e400").unwrap_err().code(), 205);
    }

    #[test]
    fn test_number_underflow_is_zero() {
        assert_eq!(parse_lenient("1e-400").unwrap(), JsonValue::Number(0.0));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse_lenient(r#""hello""#).unwrap(),
            JsonValue::String("hello".to_string())
        );
    }

    #[test]
    fn test_parse_array() {
        let result = parse_lenient("[1, 2, 3]").unwrap();
        assert_eq!(
            result,
            JsonValue::Array(vec![
                JsonValue::Number(1.0),
                JsonValue::Number(2.0),
                JsonValue::Number(3.0),
            ])
        );
    }

    #[test]
    fn test_parse_empty_containers() {
        assert_eq!(parse_lenient("[ ]").unwrap(), JsonValue::Array(vec![]));
        assert_eq!(parse_lenient(" { } ").unwrap(), JsonValue::Object(Map::new()));
    }

    #[test]
    fn test_parse_object() {
        let result = parse_lenient(r#"{"a": 1, "b": 2}"#).unwrap();
        let mut expected = Map::new();
        expected.insert("a".to_string(), JsonValue::Number(1.0));
        expected.insert("b".to_string(), JsonValue::Number(2.0));
        assert_eq!(result, JsonValue::Object(expected));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let result = parse_lenient(r#"{"a": 1, "a": 2}"#).unwrap();
        assert_eq!(result.get("a"), Some(&JsonValue::Number(2.0)));
        assert_eq!(result.as_object().map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let limits = Limits::strict().with_max_nesting_depth(2);

        // Depth 2 is allowed
        let result = parse_with_limits(b"[[1]]", limits);
        assert!(result.is_ok());

        // Depth 3 exceeds limit
        let result = parse_with_limits(b"[{\"a\":[1]}]", limits);
        assert_eq!(
            result.unwrap_err(),
            JsonError::NestingTooDeep {
                depth: 3,
                limit: 2,
                offset: 6
            }
        );
    }

    #[test]
    fn test_depth_resets_between_siblings() {
        let limits = Limits::strict().with_max_nesting_depth(2);
        let result = parse_with_limits(b"[[1],[2],{},[[]]]", limits);
        assert!(result.is_err());
        let result = parse_with_limits(b"[[1],[2],{},[]]", limits);
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_depth_limit() {
        let deep = format!("{}{}", "[".repeat(129), "]".repeat(129));
        let err = parse(deep.as_bytes()).unwrap_err();
        assert_eq!(err.code(), 301);
        assert_eq!(err.offset(), Some(128));

        let ok = format!("{}{}", "[".repeat(128), "]".repeat(128));
        assert_eq!(parse(ok.as_bytes()).unwrap().depth(), 128);
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert_eq!(
            parse_lenient("null extra").unwrap_err(),
            JsonError::TrailingContent {
                found: "invalid token",
                offset: 5
            }
        );
        assert_eq!(
            parse_lenient("[] \"abc").unwrap_err(),
            JsonError::TrailingContent {
                found: "invalid token",
                offset: 3
            }
        );
        for input in ["1 x", "{} -", "null nul", "true @", "0 1.", "\"a\" \"\\q\""] {
            let err = parse_lenient(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "input {:?}", input);
            assert_eq!(err.code(), 206, "input {:?}", input);
        }
        assert_eq!(
            parse_lenient("1 2").unwrap_err(),
            JsonError::TrailingContent {
                found: "number",
                offset: 2
            }
        );
        assert_eq!(parse_lenient("{}{}").unwrap_err().code(), 206);
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert_eq!(
            parse_lenient("[1, 2,]").unwrap_err(),
            JsonError::InvalidValue {
                found: "`]`",
                offset: 6
            }
        );
        assert_eq!(
            parse_lenient(r#"{"a":1,}"#).unwrap_err(),
            JsonError::ExpectedKey {
                found: "`}`",
                offset: 7
            }
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            parse_lenient(r#"{"a" 1}"#).unwrap_err(),
            JsonError::ExpectedColon {
                found: "number",
                offset: 5
            }
        );
        assert_eq!(
            parse_lenient(r#"{1:2}"#).unwrap_err(),
            JsonError::ExpectedKey {
                found: "number",
                offset: 1
            }
        );
        assert_eq!(
            parse_lenient(r#"{"a":1 "b":2}"#).unwrap_err(),
            JsonError::ExpectedCommaOrBrace {
                found: "string",
                offset: 7
            }
        );
        assert_eq!(
            parse_lenient("[1 2]").unwrap_err(),
            JsonError::ExpectedCommaOrBracket {
                found: "number",
                offset: 3
            }
        );
        assert_eq!(
            parse_lenient("[1}").unwrap_err().name(),
            "ExpectedCommaOrBracket"
        );
    }

    #[test]
    fn test_invalid_value_positions() {
        assert_eq!(
            parse_lenient("").unwrap_err(),
            JsonError::InvalidValue {
                found: "end of input",
                offset: 0
            }
        );
        assert_eq!(parse_lenient(":").unwrap_err().code(), 200);
        assert_eq!(parse_lenient("[,1]").unwrap_err().code(), 200);
        assert_eq!(parse_lenient(r#"{"a":}"#).unwrap_err().code(), 200);
        assert_eq!(parse_lenient("[").unwrap_err().code(), 200);
    }

    #[test]
    fn test_leading_zero_rejected() {
        assert_eq!(
            parse_lenient("01").unwrap_err(),
            JsonError::TrailingContent {
                found: "number",
                offset: 1
            }
        );
    }

    #[test]
    fn test_nested_structure() {
        let result = parse_lenient(r#"{"arr": [1, {"nested": true}], "num": 42}"#).unwrap();
        assert!(result.is_object());
        let arr = result.get("arr").unwrap();
        assert!(arr.is_array());
        assert_eq!(
            arr.get_index(1).and_then(|v| v.get("nested")),
            Some(&JsonValue::Bool(true))
        );
        assert_eq!(result.get("num").and_then(JsonValue::as_f64), Some(42.0));
    }

    #[test]
    fn test_lexical_error_surfaces_through_parser() {
        let err = parse_lenient(r#"{"a": [1, "x\q"]}"#).unwrap_err();
        assert_eq!(
            err,
            JsonError::InvalidEscape {
                found: 'q',
                offset: 12
            }
        );
    }
}
