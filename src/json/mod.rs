//! JSON parsing.
//!
//! A from-scratch RFC 8259 parser in two stages: a [`lexer`] that turns
//! bytes into tokens, and a recursive descent [`parser`] that turns tokens
//! into a [`JsonValue`] tree.
//!
//! # Architecture
//!
//! - [`types`] - Core JSON value types
//! - [`limits`] - Input size and nesting depth limits
//! - [`lexer`] - Tokenizer with escape and surrogate pair decoding
//! - [`parser`] - Recursive descent parser
//!
//! # Example
//!
//! ```
//! use descent_json::json::{parse, JsonValue};
//!
//! let value = parse(br#"{"a": [1, 2.5], "b": null}"#).unwrap();
//! assert_eq!(value.get("b"), Some(&JsonValue::Null));
//! assert_eq!(value.get("a").and_then(|a| a.get_index(1)), Some(&JsonValue::Number(2.5)));
//! ```

pub mod lexer;
pub mod limits;
pub mod parser;
pub mod types;

// Re-export commonly used items
pub use lexer::{Lexer, Token};
pub use limits::Limits;
pub use parser::{parse, parse_with_limits, Parser};
pub use types::{JsonValue, Map};
