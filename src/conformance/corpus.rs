//! Corpus-based conformance testing.
//!
//! Loads test vectors from a corpus file and runs them against the parser.
//!
//! Corpus layout:
//!
//! ```json
//! {
//!   "manifest": { "format_version": "1", "description": "..." },
//!   "vectors": [
//!     { "id": "array_order", "raw": "[1,2,3]", "expected": { "ok": [1, 2, 3] } },
//!     { "id": "trailing_comma", "raw": "[1,]", "expected": { "err": { "code": 200, "kind": "syntax" } } }
//!   ]
//! }
//! ```
//!
//! Expected values are compared structurally: numbers as `f64`, object keys
//! by lookup.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{ConformanceError, ConformanceResult};
use crate::json::{parse_with_limits, JsonValue, Limits};

/// Corpus manifest with metadata.
#[derive(Debug, Deserialize)]
pub struct CorpusManifest {
    /// Format version of the corpus file.
    pub format_version: String,
    /// Free-form description of the corpus.
    #[serde(default)]
    pub description: String,
}

/// A corpus containing test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus metadata.
    pub manifest: CorpusManifest,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// Per-vector overrides of the runner's limits.
#[derive(Debug, Default, Deserialize)]
pub struct VectorLimits {
    /// Override for `Limits::max_nesting_depth`.
    pub max_nesting_depth: Option<usize>,
    /// Override for `Limits::max_input_size`.
    pub max_input_size: Option<usize>,
}

/// A single test vector.
#[derive(Debug, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub id: String,
    /// Raw JSON text handed to the parser.
    pub raw: String,
    /// Expected result: `{"ok": <value>}` or `{"err": {"code": N, "kind": K}}`.
    pub expected: serde_json::Value,
    /// Optional limit overrides for this vector.
    #[serde(default)]
    pub limits: Option<VectorLimits>,
    /// When set, the vector is skipped with this reason.
    #[serde(default)]
    pub skip: Option<String>,
}

/// Result of running a single test vector.
#[derive(Debug)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with mismatch.
    Fail {
        /// Expected result from the corpus.
        expected: String,
        /// Actual result from the parser.
        actual: String,
    },
    /// Test was skipped.
    Skip {
        /// Reason for skipping.
        reason: String,
    },
    /// The vector itself is malformed.
    Error {
        /// Error message.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if this is a failing result.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Results from running the corpus.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that were skipped.
    pub skipped: usize,
    /// Number of tests that errored.
    pub errors: usize,
    /// Detailed results for each test.
    pub details: Vec<(String, TestResult)>,
}

impl CorpusResults {
    /// Create a new empty results container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test result.
    pub fn record(&mut self, id: &str, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.details.push((id.to_string(), result));
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    /// Returns true if all tests passed (no failures or errors).
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Get a summary string of the results.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped, {} errors (total: {})",
            self.passed,
            self.failed,
            self.skipped,
            self.errors,
            self.total()
        )
    }

    /// Get failures only.
    pub fn failures(&self) -> Vec<&(String, TestResult)> {
        self.details.iter().filter(|(_, r)| r.is_fail()).collect()
    }

    /// Get errors only.
    pub fn error_details(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Error { .. }))
            .collect()
    }
}

/// Corpus runner that executes test vectors.
pub struct CorpusRunner {
    corpus: Corpus,
    limits: Limits,
}

impl CorpusRunner {
    /// Load corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> ConformanceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConformanceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Build a runner from corpus JSON text.
    pub fn from_json(content: &str) -> ConformanceResult<Self> {
        let corpus: Corpus = serde_json::from_str(content)?;
        Ok(Self {
            corpus,
            limits: Limits::default(),
        })
    }

    /// Use `limits` as the base for every vector.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the corpus manifest.
    pub fn manifest(&self) -> &CorpusManifest {
        &self.corpus.manifest
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in &self.corpus.vectors {
            let result = self.run_vector(vector);
            if result.is_fail() {
                tracing::warn!(id = %vector.id, ?result, "corpus vector failed");
            } else {
                tracing::debug!(id = %vector.id, ?result, "corpus vector finished");
            }
            results.record(&vector.id, result);
        }

        results
    }

    /// Limits for one vector: the runner's base plus the vector's overrides.
    fn vector_limits(&self, vector: &TestVector) -> Limits {
        let mut limits = self.limits;
        if let Some(overrides) = &vector.limits {
            if let Some(depth) = overrides.max_nesting_depth {
                limits.max_nesting_depth = depth;
            }
            if let Some(size) = overrides.max_input_size {
                limits.max_input_size = size;
            }
        }
        limits
    }

    /// Run a single test vector.
    fn run_vector(&self, vector: &TestVector) -> TestResult {
        if let Some(reason) = &vector.skip {
            return TestResult::Skip {
                reason: reason.clone(),
            };
        }

        let result = parse_with_limits(vector.raw.as_bytes(), self.vector_limits(vector));

        if let Some(ok) = vector.expected.get("ok") {
            match result {
                Ok(value) if value_matches(&value, ok) => TestResult::Pass,
                Ok(value) => TestResult::Fail {
                    expected: ok.to_string(),
                    actual: format!("{:?}", value),
                },
                Err(e) => TestResult::Fail {
                    expected: format!("ok: {}", ok),
                    actual: format!("E{} {}", e.code(), e),
                },
            }
        } else if let Some(err) = vector.expected.get("err") {
            let Some(expected_code) = err.get("code").and_then(|v| v.as_u64()) else {
                return TestResult::Error {
                    message: "Missing 'code' in expected err".to_string(),
                };
            };
            let expected_kind = err.get("kind").and_then(|v| v.as_str());

            match result {
                Ok(value) => TestResult::Fail {
                    expected: format!("E{}", expected_code),
                    actual: format!("ok: {:?}", value),
                },
                Err(e) => {
                    let code_matches = u64::from(e.code()) == expected_code;
                    let kind_matches = expected_kind.map_or(true, |k| k == e.kind().as_str());
                    if code_matches && kind_matches {
                        TestResult::Pass
                    } else {
                        TestResult::Fail {
                            expected: format!(
                                "E{} ({})",
                                expected_code,
                                expected_kind.unwrap_or("any")
                            ),
                            actual: format!("E{} ({})", e.code(), e.kind()),
                        }
                    }
                }
            }
        } else {
            TestResult::Error {
                message: "Invalid expected format".to_string(),
            }
        }
    }
}

/// Structural comparison of a parsed value against a corpus expectation.
pub fn value_matches(actual: &JsonValue, expected: &serde_json::Value) -> bool {
    use serde_json::Value as Expected;

    match (actual, expected) {
        (JsonValue::Null, Expected::Null) => true,
        (JsonValue::Bool(a), Expected::Bool(b)) => a == b,
        (JsonValue::Number(a), Expected::Number(b)) => b.as_f64() == Some(*a),
        (JsonValue::String(a), Expected::String(b)) => a == b,
        (JsonValue::Array(a), Expected::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| value_matches(x, y))
        }
        (JsonValue::Object(a), Expected::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, value)| b.get(key).is_some_and(|e| value_matches(value, e)))
        }
        _ => false,
    }
}
