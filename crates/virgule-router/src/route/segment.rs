/// Segment classification for route-template tokens
///
/// Pure parsing of template tokens into typed segments. All functions are
/// **pure**: same input → same output, no side effects.
use once_cell::sync::Lazy;
use regex::Regex;

/// Token shape of a variable segment: `$name` or `$name:pattern`.
///
/// The name runs up to the first `:`; everything after it is the raw capture
/// pattern, handed to [`CapturePattern`](crate::CapturePattern) verbatim.
static VARIABLE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$([^:]+)(?::(.*))?$").unwrap()
});

/// The role a node plays in the route trie, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// The trie root; never produced by classifying a token.
    Root,
    /// Matches exactly one segment by string equality.
    Literal,
    /// Matches any single segment (optionally constrained by a pattern) and
    /// binds it to a name.
    Variable,
    /// Consumes every remaining segment as one named sequence; terminal only.
    Variadic,
    /// Consumes every remaining segment as positional values; terminal only.
    Wildcard,
}

/// A classified route-template token
///
/// Sum type produced by [`classify_segment`]; each variant carries the data
/// the trie needs to build a node for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentSpec {
    /// Static text, matched by exact equality.
    Literal(String),
    /// `$name` or `$name:pattern` — a single-segment capture.
    Variable {
        /// Capture key the matched segment is bound under.
        name: String,
        /// Raw (un-anchored) pattern text, if the token carried one.
        pattern: Option<String>,
    },
    /// `...$name` — consumes the rest of the path as one named sequence.
    Variadic {
        /// Capture key the remaining segments are bound under.
        name: String,
    },
    /// `*` — consumes the rest of the path as positional values.
    Wildcard,
}

impl SegmentSpec {
    /// The [`SegmentKind`] a node built from this spec will carry.
    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentSpec::Literal(_) => SegmentKind::Literal,
            SegmentSpec::Variable { .. } => SegmentKind::Variable,
            SegmentSpec::Variadic { .. } => SegmentKind::Variadic,
            SegmentSpec::Wildcard => SegmentKind::Wildcard,
        }
    }
}

/// Classifies a route-template token (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Wildcard**: the exact text `*`
/// 2. **Variadic**: a `...$` prefix; the name is everything after it
/// 3. **Variable**: `$name` or `$name:pattern`
/// 4. **Literal**: any other text
///
/// A token that merely starts with `$` but has an empty name (the bare text
/// `$`) does not form a valid variable and falls through to literal.
///
/// # Examples
///
/// ```
/// use virgule_router::{classify_segment, SegmentSpec};
///
/// assert_eq!(classify_segment("users"), SegmentSpec::Literal("users".into()));
/// assert_eq!(classify_segment("*"), SegmentSpec::Wildcard);
/// assert_eq!(
///     classify_segment("$id:\\d+"),
///     SegmentSpec::Variable { name: "id".into(), pattern: Some("\\d+".into()) }
/// );
/// assert_eq!(
///     classify_segment("...$rest"),
///     SegmentSpec::Variadic { name: "rest".into() }
/// );
/// ```
pub fn classify_segment(token: &str) -> SegmentSpec {
    if token == "*" {
        return SegmentSpec::Wildcard;
    }
    if let Some(name) = token.strip_prefix("...$") {
        return SegmentSpec::Variadic {
            name: name.to_string(),
        };
    }
    if let Some(caps) = VARIABLE_TOKEN.captures(token) {
        return SegmentSpec::Variable {
            name: caps[1].to_string(),
            pattern: caps.get(2).map(|m| m.as_str().to_string()),
        };
    }
    SegmentSpec::Literal(token.to_string())
}
