//! Resource limits for JSON parsing.
//!
//! The grammar itself places no bound on document size or nesting depth.
//! Recursive descent uses one stack frame per nesting level, so deeply nested
//! input would exhaust the call stack before failing. [`Limits`] turns both
//! into clean errors (`InputTooLarge`, `NestingTooDeep`).

/// Configurable parsing limits.
///
/// Presets cover the common cases; individual fields can be overridden with
/// the `with_*` builders or by setting the public fields directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total input size in bytes
    pub max_input_size: usize,
    /// Maximum nesting depth for arrays/objects
    pub max_nesting_depth: usize,
}

impl Limits {
    /// Default limits, safe for untrusted input on a default-sized stack.
    pub const fn strict() -> Self {
        Self {
            max_input_size: 16 * 1024 * 1024, // 16 MiB
            max_nesting_depth: 128,
        }
    }

    /// Larger limits for trusted documents.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 1024 * 1024 * 1024, // 1 GiB
            max_nesting_depth: 1024,
        }
    }

    /// No limits at all.
    ///
    /// Nesting depth is then bounded only by the call stack: pathological
    /// input such as a hundred thousand `[` can overflow it and abort the
    /// process instead of returning an error.
    pub const fn unbounded() -> Self {
        Self {
            max_input_size: usize::MAX,
            max_nesting_depth: usize::MAX,
        }
    }

    /// Override the maximum nesting depth.
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Override the maximum input size.
    pub const fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        assert_eq!(Limits::default(), Limits::strict());
        assert_eq!(Limits::strict().max_nesting_depth, 128);
        assert_eq!(Limits::strict().max_input_size, 16 * 1024 * 1024);
    }

    #[test]
    fn test_lenient_limits() {
        let limits = Limits::lenient();
        assert!(limits.max_nesting_depth > Limits::strict().max_nesting_depth);
        assert!(limits.max_input_size > Limits::strict().max_input_size);
    }

    #[test]
    fn test_builders() {
        let limits = Limits::strict()
            .with_max_nesting_depth(4)
            .with_max_input_size(64);
        assert_eq!(limits.max_nesting_depth, 4);
        assert_eq!(limits.max_input_size, 64);
    }

    #[test]
    fn test_unbounded() {
        let limits = Limits::unbounded();
        assert_eq!(limits.max_nesting_depth, usize::MAX);
        assert_eq!(limits.max_input_size, usize::MAX);
    }
}
