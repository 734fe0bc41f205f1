//! descent-json - a from-scratch JSON parser.
//!
//! Converts RFC 8259 JSON text into a [`JsonValue`] tree without relying on
//! any existing JSON library for the parse itself.
//!
//! # Architecture
//!
//! - [`json`] - Lexer, recursive descent parser, value types and limits
//! - [`error`] - Error type with stable numeric codes
//! - [`conformance`] - Corpus runner checking the parser against test vectors
//!
//! # Concurrency
//!
//! Parsing is a pure function of the input bytes. Each call builds its own
//! lexer and parser; there is no shared state, so independent inputs can be
//! parsed from any number of threads at once.

// Library code must not panic on malformed input.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod conformance;
pub mod error;
pub mod json;

// Re-export commonly used types
pub use error::{ErrorKind, JsonError, JsonResult};
pub use json::{parse, parse_with_limits, JsonValue, Limits};
