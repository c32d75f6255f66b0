//! Configuration options for encoding and decoding.
//!
//! The binary layout itself has no knobs; these options bound the resources a
//! single call may consume, which matters when decoding untrusted input.
//!
//! ## Examples
//!
//! ```rust
//! use binval::{from_slice_with_options, to_vec, CodecOptions, Value};
//!
//! let bytes = to_vec(&Value::from("hello")).unwrap();
//!
//! let options = CodecOptions::new().with_max_depth(16).with_max_length(1024);
//! let value = from_slice_with_options(&bytes, options).unwrap();
//! assert_eq!(value, Value::from("hello"));
//! ```

/// Default nesting limit for containers.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default limit for a single declared length or count.
pub const DEFAULT_MAX_LENGTH: u64 = 1 << 32;

/// Resource limits for one serialize or deserialize call.
///
/// # Examples
///
/// ```rust
/// use binval::CodecOptions;
///
/// let options = CodecOptions::new();
/// assert_eq!(options.max_depth, 256);
///
/// let strict = CodecOptions::new().with_max_depth(8);
/// assert_eq!(strict.max_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Maximum container nesting. Cycles do not add depth because back-edges
    /// are written as references.
    pub max_depth: usize,
    /// Maximum byte length, unit count or item count a header may declare.
    pub max_length: u64,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl CodecOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum container nesting depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binval::CodecOptions;
    ///
    /// let options = CodecOptions::new().with_max_depth(32);
    /// assert_eq!(options.max_depth, 32);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum declared length or count.
    #[must_use]
    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = max_length;
        self
    }
}
