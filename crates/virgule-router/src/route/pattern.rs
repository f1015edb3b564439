/// Capture patterns for variable segments
///
/// A variable token may constrain what it matches with a regular expression
/// (`$id:\d+`). The pattern is compiled once, at insertion time, and is
/// implicitly anchored at both ends: it must cover the whole segment, never a
/// substring of it. Named groups inside the pattern become additional capture
/// keys on a successful match.
use regex::Regex;
use thiserror::Error;

/// Raised when a variable token's capture pattern fails to compile.
///
/// Surfaced synchronously from insertion; matching itself never errors.
#[derive(Debug, Error)]
#[error("invalid capture pattern `{pattern}`: {source}")]
pub struct PatternError {
    /// The raw pattern text from the offending token.
    pub pattern: String,
    /// The underlying compile failure.
    #[source]
    pub source: regex::Error,
}

/// An anchored pattern tested against the raw text of a single segment.
#[derive(Debug, Clone)]
pub struct CapturePattern {
    raw: String,
    regex: Regex,
}

impl CapturePattern {
    /// Compiles `pattern`, wrapping it in `^(?:…)$` so a match must cover the
    /// whole segment.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// The pattern text as written in the route template.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests `segment` against the pattern.
    ///
    /// Returns `None` when the segment does not match. On a match, returns the
    /// pattern's named sub-captures (which may be empty) as key/value pairs,
    /// in the order the groups appear in the pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use virgule_router::CapturePattern;
    ///
    /// let pattern = CapturePattern::new(r"test\.(?<ext>pdf|html)").unwrap();
    /// assert!(pattern.captures("other.pdf").is_none());
    ///
    /// let caps = pattern.captures("test.pdf").unwrap();
    /// assert_eq!(caps, vec![("ext".to_string(), "pdf".to_string())]);
    /// ```
    pub fn captures(&self, segment: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(segment)?;
        Some(
            self.regex
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_string(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}
