/// The route trie
///
/// A [`RouteNode`] stores one segment of every registered route template and
/// fans out into four child registries, one per segment kind. Nodes are
/// created by [`RouteNode::insert`] and never change kind afterwards. Handlers
/// and middleware are opaque to the trie: it stores and returns them without
/// interpreting them.
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::trace;

use crate::route::matches::Matches;
use crate::route::pattern::{CapturePattern, PatternError};
use crate::route::segment::{classify_segment, SegmentKind, SegmentSpec};

/// One node of the route trie, generic over an opaque handler type `H` and an
/// opaque middleware type `M`.
///
/// A node is a *terminal route* iff a handler is set. Handler and middleware
/// are independent of children: `/admin` can be terminal while `/admin/users`
/// is also terminal below it.
#[derive(Debug, Clone)]
pub struct RouteNode<H, M = H> {
    pub(crate) kind: SegmentKind,
    pub(crate) token: String,
    pub(crate) name: Option<String>,
    pub(crate) pattern: Option<CapturePattern>,
    pub(crate) handler: Option<H>,
    pub(crate) middleware: Vec<M>,
    pub(crate) literals: HashMap<String, RouteNode<H, M>>,
    pub(crate) variables: Vec<RouteNode<H, M>>,
    pub(crate) variadic: Option<Box<RouteNode<H, M>>>,
    pub(crate) wildcard: Option<Box<RouteNode<H, M>>>,
}

impl<H, M> RouteNode<H, M> {
    /// Creates an empty trie root.
    pub fn root() -> Self {
        Self::bare(SegmentKind::Root, String::new(), None, None)
    }

    /// Builds a node for one classified token; compiles the capture pattern
    /// if the token carries one.
    fn from_token(token: &str) -> Result<Self, PatternError> {
        let node = match classify_segment(token) {
            SegmentSpec::Literal(_) => {
                Self::bare(SegmentKind::Literal, token.to_string(), None, None)
            }
            SegmentSpec::Variable { name, pattern } => {
                let compiled = pattern.as_deref().map(CapturePattern::new).transpose()?;
                Self::bare(SegmentKind::Variable, token.to_string(), Some(name), compiled)
            }
            SegmentSpec::Variadic { name } => {
                Self::bare(SegmentKind::Variadic, token.to_string(), Some(name), None)
            }
            SegmentSpec::Wildcard => {
                Self::bare(SegmentKind::Wildcard, token.to_string(), None, None)
            }
        };
        trace!(token, kind = ?node.kind, "created route node");
        Ok(node)
    }

    fn bare(
        kind: SegmentKind,
        token: String,
        name: Option<String>,
        pattern: Option<CapturePattern>,
    ) -> Self {
        Self {
            kind,
            token,
            name,
            pattern,
            handler: None,
            middleware: Vec::new(),
            literals: HashMap::new(),
            variables: Vec::new(),
            variadic: None,
            wildcard: None,
        }
    }

    /// Walks and extends the trie along `segments`, creating nodes as needed,
    /// and returns the node at the end of the path.
    ///
    /// Intermediate nodes are created without handlers; an empty sequence
    /// returns `self` unchanged (so the root itself can be given a handler or
    /// middleware). Insertion is idempotent: re-inserting the same token
    /// sequence resolves to the same node, never a duplicate.
    ///
    /// Per token, an existing child is reused in this order: a literal child
    /// with the same text; a variable child created from the identical token;
    /// the variadic child, if the token denotes a variadic spec; the wildcard
    /// child, if the token is `*`. Otherwise the token is classified and a new
    /// node is placed in the registry matching its kind.
    ///
    /// The only failure is a capture pattern that does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use virgule_router::RouteNode;
    ///
    /// let mut root: RouteNode<&str> = RouteNode::root();
    /// root.insert(&["users", "$id:\\d+"]).unwrap().set_handler("show-user");
    /// ```
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<&mut Self, PatternError> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(self);
        };
        let token = first.as_ref();
        if token.is_empty() {
            return Ok(self);
        }

        match classify_segment(token) {
            SegmentSpec::Literal(text) => {
                let child = match self.literals.entry(text) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(Self::from_token(token)?),
                };
                child.insert(rest)
            }
            SegmentSpec::Variable { .. } => {
                let index = match self.variables.iter().position(|v| v.token == token) {
                    Some(index) => index,
                    None => {
                        self.variables.push(Self::from_token(token)?);
                        self.variables.len() - 1
                    }
                };
                self.variables[index].insert(rest)
            }
            SegmentSpec::Variadic { .. } => {
                let child = match self.variadic.take() {
                    Some(existing) => existing,
                    None => Box::new(Self::from_token(token)?),
                };
                self.variadic.insert(child).insert(rest)
            }
            SegmentSpec::Wildcard => {
                let child = match self.wildcard.take() {
                    Some(existing) => existing,
                    None => Box::new(Self::from_token(token)?),
                };
                self.wildcard.insert(child).insert(rest)
            }
        }
    }

    /// Sets this node's handler, making it a terminal route.
    pub fn set_handler(&mut self, handler: H) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    /// The handler, if this node is a terminal route.
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Replaces this node's middleware list.
    pub fn set_middleware(&mut self, middleware: Vec<M>) -> &mut Self {
        self.middleware = middleware;
        self
    }

    /// The middleware attached to this node, in the order it was given.
    pub fn middleware(&self) -> &[M] {
        &self.middleware
    }

    /// The role this node plays in the trie, fixed at construction.
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The capture key, for variable and variadic nodes.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The template token this node was created from (empty for the root).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Matches `segments` against the trie rooted at this node, producing a
    /// lazy iterator over terminal candidates in priority order: literal
    /// before variables (in registration order) before variadic before
    /// wildcard, depth-first.
    ///
    /// An iterator that yields nothing means no route matched. Every yielded
    /// candidate carries a handler, its captured [`Params`](crate::Params),
    /// and the root-to-leaf middleware chain along its path.
    ///
    /// # Examples
    ///
    /// ```
    /// use virgule_router::RouteNode;
    ///
    /// let mut root: RouteNode<&str> = RouteNode::root();
    /// root.insert(&["users", "$id"]).unwrap().set_handler("show-user");
    ///
    /// let segments = ["users", "42"];
    /// let first = root.matches(&segments).next().unwrap();
    /// assert_eq!(*first.handler(), "show-user");
    /// assert_eq!(first.params().segment("id"), Some("42"));
    /// ```
    pub fn matches<'a>(&'a self, segments: &[&'a str]) -> Matches<'a, H, M> {
        Matches::new(self, segments.to_vec())
    }

    /// Lists the template strings of every handler-bearing route below (and
    /// including) this node, joined with `delimiter`, in match priority
    /// order. A terminal root is listed as the delimiter itself.
    pub fn routes(&self, delimiter: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_routes(delimiter, "", &mut out);
        out
    }

    fn collect_routes(&self, delimiter: &str, prefix: &str, out: &mut Vec<String>) {
        let path = if self.kind == SegmentKind::Root {
            prefix.to_string()
        } else {
            format!("{prefix}{delimiter}{}", self.token)
        };
        if self.handler.is_some() {
            if path.is_empty() {
                out.push(delimiter.to_string());
            } else {
                out.push(path.clone());
            }
        }
        let mut literals: Vec<_> = self.literals.values().collect();
        literals.sort_by(|a, b| a.token.cmp(&b.token));
        for child in literals {
            child.collect_routes(delimiter, &path, out);
        }
        for child in &self.variables {
            child.collect_routes(delimiter, &path, out);
        }
        if let Some(child) = self.variadic.as_deref() {
            child.collect_routes(delimiter, &path, out);
        }
        if let Some(child) = self.wildcard.as_deref() {
            child.collect_routes(delimiter, &path, out);
        }
    }
}

impl<H, M> Default for RouteNode<H, M> {
    fn default() -> Self {
        Self::root()
    }
}
