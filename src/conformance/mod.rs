//! Corpus-driven conformance testing for the parser.
//!
//! A corpus is a JSON file of test vectors, each pairing raw input text with
//! the expected outcome: either the value the parser must produce or the
//! error code it must fail with. The corpus file itself is read with
//! `serde_json`, which keeps the expectations independent of the parser
//! under test.

pub mod corpus;

pub use corpus::{Corpus, CorpusManifest, CorpusResults, CorpusRunner, TestResult, TestVector};

use thiserror::Error;

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur while loading a corpus.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// Corpus file could not be read
    #[error("failed to read corpus file {path}: {source}")]
    Read {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Corpus file is not a valid corpus document
    #[error("failed to parse corpus JSON: {0}")]
    Format(#[from] serde_json::Error),
}
