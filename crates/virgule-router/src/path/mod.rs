//! Path segmentation
//!
//! Pure string processing with no matching logic: a [`Splitter`] turns a raw
//! path into the ordered, non-empty segment sequence the engine consumes.
//! Same input → same output, no side effects.

/// Splits raw paths on a configurable delimiter string.
///
/// Empty segments produced by consecutive, leading, or trailing delimiters
/// are dropped; order is preserved. Paths that split to the same segment
/// sequence are indistinguishable to the engine, so `/a/b`, `a/b`, `//a//b/`
/// all route identically.
///
/// # Examples
///
/// ```
/// use virgule_router::Splitter;
///
/// let splitter = Splitter::new("/");
/// assert_eq!(splitter.split("/foo//bar/"), vec!["foo", "bar"]);
/// assert!(splitter.split("/").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    delimiter: String,
}

impl Splitter {
    /// Creates a splitter for the given delimiter string.
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// The delimiter this splitter was created with.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Splits `path` into its non-empty segments, in order.
    pub fn split<'p>(&self, path: &'p str) -> Vec<&'p str> {
        path.split(self.delimiter.as_str())
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new("/")
    }
}
