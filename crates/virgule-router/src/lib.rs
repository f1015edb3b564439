//! # Virgule Router
//!
//! A trie-based path-segment routing library with support for:
//! - Literal segments (`/about`)
//! - Variable segments with optional capture patterns (`/users/$id:\d+`)
//! - Variadic segments (`/docs/...$slug` consumes the rest as a sequence)
//! - Wildcard segments (`/*` consumes the rest as positional values)
//! - Per-node middleware, composed root-to-leaf along the matched path
//!
//! ## Matching Model
//!
//! Matching is a lazy, backtracking, depth-first search: [`Matches`] yields
//! *every* reachable terminal route for a path, in strict priority order
//! (literal > variables in registration order > variadic > wildcard), each
//! with its captured parameters and its middleware chain. Stop iterating
//! whenever you have what you need — nothing runs until you ask for the next
//! candidate, and nothing leaks when you stop asking.
//!
//! Handlers and middleware are opaque: the router stores and returns your
//! values without interpreting them. There is no HTTP here — no methods, no
//! status codes, no I/O — just segments in, candidates out.
//!
//! ## Example
//!
//! ```
//! use virgule_router::Router;
//!
//! let mut router: Router<&str> = Router::new();
//! router.route("/test").unwrap().set_handler("test");
//! router.route("/test/$id:\\d+").unwrap().set_handler("test-id-number");
//! router.route("/test/$id:\\w+").unwrap().set_handler("test-id-word");
//!
//! let first = router.matches("/test/5").next().unwrap();
//! assert_eq!(*first.handler(), "test-id-number");
//! assert_eq!(first.params().segment("id"), Some("5"));
//! ```
//!
//! ## Concurrency
//!
//! Single-threaded by design: build the trie first, match after. No locking
//! is provided; interleaving insertion with in-flight matching is the
//! embedding application's problem to serialize.

use tracing::{debug, trace};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod path;
pub mod route;

// Re-export the public surface at the crate root
pub use path::Splitter;
pub use route::matches::{Matches, ParamValue, Params, RouteMatch};
pub use route::node::RouteNode;
pub use route::pattern::{CapturePattern, PatternError};
pub use route::segment::{classify_segment, SegmentKind, SegmentSpec};

// ============================================================================
// Router Facade
// ============================================================================

/// String-path facade over the segment-level engine.
///
/// Owns the trie root and a [`Splitter`]; callers register and match raw path
/// strings, and the facade defers segmentation to the splitter and everything
/// else to [`RouteNode`]. Generic over an opaque handler type `H` and an
/// opaque middleware type `M` (defaulting to `H`).
#[derive(Debug, Clone)]
pub struct Router<H, M = H> {
    root: RouteNode<H, M>,
    splitter: Splitter,
}

impl<H, M> Router<H, M> {
    /// Creates a router splitting on `/`.
    pub fn new() -> Self {
        Self::with_delimiter("/")
    }

    /// Creates a router splitting on an arbitrary delimiter string.
    ///
    /// # Examples
    ///
    /// ```
    /// use virgule_router::Router;
    ///
    /// let mut router: Router<&str> = Router::with_delimiter(" ");
    /// router.route("make build").unwrap().set_handler("build");
    /// assert!(router.matches("make build").next().is_some());
    /// ```
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            root: RouteNode::root(),
            splitter: Splitter::new(delimiter),
        }
    }

    /// Registers `path`, creating trie nodes as needed, and returns the node
    /// at the end of it — attach a handler and middleware there. Re-routing
    /// the same path returns the same node.
    ///
    /// Fails only when a variable token carries a capture pattern that does
    /// not compile.
    pub fn route(&mut self, path: &str) -> Result<&mut RouteNode<H, M>, PatternError> {
        debug!(path, "registering route template");
        let segments = self.splitter.split(path);
        self.root.insert(&segments)
    }

    /// Matches `path` against the registered routes, lazily, in priority
    /// order. An iterator that yields nothing means no route matched.
    pub fn matches<'a>(&'a self, path: &'a str) -> Matches<'a, H, M> {
        trace!(path, "match request");
        let segments = self.splitter.split(path);
        Matches::new(&self.root, segments)
    }

    /// The trie root, for callers that work at the segment level.
    pub fn root(&self) -> &RouteNode<H, M> {
        &self.root
    }

    /// Mutable access to the trie root, for segment-level insertion.
    pub fn root_mut(&mut self) -> &mut RouteNode<H, M> {
        &mut self.root
    }

    /// Lists the template strings of every registered route, joined with this
    /// router's delimiter, in match priority order.
    pub fn routes(&self) -> Vec<String> {
        self.root.routes(self.splitter.delimiter())
    }
}

impl<H, M> Default for Router<H, M> {
    fn default() -> Self {
        Self::new()
    }
}
