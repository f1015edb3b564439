/// The matching engine
///
/// [`Matches`] is a lazy iterator over the terminal candidates a segment
/// sequence can reach in the trie, produced by an explicit depth-first
/// backtracking stack. Candidates surface in strict priority order: at every
/// node, the literal child is tried before the variable children (in
/// registration order), then the variadic child, then the wildcard child.
///
/// Bindings and the middleware chain live in working buffers owned by the
/// iterator. Every descent records exactly what it added — including the
/// previous value of any shadowed key — and the frame restores it when it
/// pops, so bindings never leak between sibling candidates and abandoning the
/// iterator early releases everything with it. Each yielded [`RouteMatch`]
/// carries a snapshot, valid for as long as the caller holds it.
use std::collections::HashMap;

use crate::route::node::RouteNode;

/// A value captured from the matched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single segment, bound by a variable or a named sub-capture.
    Segment(String),
    /// The remaining segment sequence, bound by a variadic.
    Rest(Vec<String>),
}

impl ParamValue {
    /// The single segment, if this value was bound by a variable.
    pub fn as_segment(&self) -> Option<&str> {
        match self {
            ParamValue::Segment(value) => Some(value),
            ParamValue::Rest(_) => None,
        }
    }

    /// The segment sequence, if this value was bound by a variadic.
    pub fn as_rest(&self) -> Option<&[String]> {
        match self {
            ParamValue::Segment(_) => None,
            ParamValue::Rest(values) => Some(values),
        }
    }
}

/// The bindings captured for one candidate: named entries from variables,
/// sub-captures, and variadics, plus positional entries from a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pub(crate) named: HashMap<String, ParamValue>,
    pub(crate) positional: Vec<String>,
}

impl Params {
    fn new() -> Self {
        Self::default()
    }

    /// Looks up a named binding.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.named.get(name)
    }

    /// Looks up a named binding as a single segment.
    pub fn segment(&self, name: &str) -> Option<&str> {
        self.named.get(name).and_then(ParamValue::as_segment)
    }

    /// Looks up a named binding as a segment sequence.
    pub fn rest(&self, name: &str) -> Option<&[String]> {
        self.named.get(name).and_then(ParamValue::as_rest)
    }

    /// The positional bindings a wildcard consumed, in path order.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Iterates the named bindings (order is unspecified).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of named bindings.
    pub fn len(&self) -> usize {
        self.named.len()
    }

    /// True when there are no bindings of either kind.
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }
}

/// One candidate produced by the matching engine: a terminal node, its
/// handler, the bindings captured along the path, and the middleware chain in
/// root-to-leaf order.
#[derive(Debug)]
pub struct RouteMatch<'a, H, M = H> {
    node: &'a RouteNode<H, M>,
    handler: &'a H,
    params: Params,
    middleware: Vec<&'a M>,
}

impl<'a, H, M> RouteMatch<'a, H, M> {
    /// The matched terminal node.
    pub fn node(&self) -> &'a RouteNode<H, M> {
        self.node
    }

    /// The matched handler.
    pub fn handler(&self) -> &'a H {
        self.handler
    }

    /// The bindings captured for this candidate.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The middleware chain along this candidate's path, entry node first,
    /// matched node last.
    pub fn middleware(&self) -> &[&'a M] {
        &self.middleware
    }
}

/// Which branch of a node the search tries next. Branch order is the
/// priority order of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// All segments consumed at this node: the node itself is the candidate.
    Terminal,
    Literal,
    Variables,
    Variadic,
    Wildcard,
    Done,
}

/// One resumption point of the backtracking search: a node, how much of the
/// path precedes it, the branch in progress, and the scope bookkeeping needed
/// to retract this frame's additions when it pops.
#[derive(Debug)]
struct Frame<'a, H, M> {
    node: &'a RouteNode<H, M>,
    depth: usize,
    stage: Stage,
    next_variable: usize,
    saved: Vec<(String, Option<ParamValue>)>,
    middleware_mark: usize,
    positional_mark: usize,
}

/// What the current frame decided to do; executed once the frame borrow is
/// released.
enum Step<'a, H, M> {
    Descend {
        child: &'a RouteNode<H, M>,
        depth: usize,
        bindings: Vec<(String, ParamValue)>,
        positional: Vec<String>,
    },
    Emit(&'a RouteNode<H, M>),
    Retreat,
    Continue,
}

/// Lazy iterator over the candidates for one match request.
///
/// Created by [`RouteNode::matches`] or
/// [`Router::matches`](crate::Router::matches). Each call produces a fresh,
/// independent search; dropping the iterator abandons the search and its
/// working state with it.
#[derive(Debug)]
pub struct Matches<'a, H, M = H> {
    segments: Vec<&'a str>,
    stack: Vec<Frame<'a, H, M>>,
    params: Params,
    middleware: Vec<&'a M>,
}

impl<'a, H, M> Matches<'a, H, M> {
    pub(crate) fn new(entry: &'a RouteNode<H, M>, segments: Vec<&'a str>) -> Self {
        let mut matches = Matches {
            stack: Vec::new(),
            params: Params::new(),
            middleware: entry.middleware.iter().collect(),
            segments,
        };
        matches.stack.push(Frame {
            node: entry,
            depth: 0,
            stage: matches.entry_stage(0),
            next_variable: 0,
            saved: Vec::new(),
            middleware_mark: 0,
            positional_mark: 0,
        });
        matches
    }

    fn entry_stage(&self, depth: usize) -> Stage {
        if depth == self.segments.len() {
            Stage::Terminal
        } else {
            Stage::Literal
        }
    }

    /// Pushes a child frame, applying its scope: bindings (remembering any
    /// shadowed values), positional entries, and the child's middleware.
    fn descend(
        &mut self,
        child: &'a RouteNode<H, M>,
        depth: usize,
        bindings: Vec<(String, ParamValue)>,
        positional: Vec<String>,
    ) {
        let middleware_mark = self.middleware.len();
        let positional_mark = self.params.positional.len();
        let mut saved = Vec::with_capacity(bindings.len());
        for (key, value) in bindings {
            let previous = self.params.named.insert(key.clone(), value);
            saved.push((key, previous));
        }
        self.params.positional.extend(positional);
        self.middleware.extend(child.middleware.iter());
        self.stack.push(Frame {
            node: child,
            depth,
            stage: self.entry_stage(depth),
            next_variable: 0,
            saved,
            middleware_mark,
            positional_mark,
        });
    }

    /// Pops the top frame and retracts exactly what its descent added,
    /// restoring shadowed values in reverse insertion order.
    fn retreat(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.middleware.truncate(frame.middleware_mark);
            self.params.positional.truncate(frame.positional_mark);
            for (key, previous) in frame.saved.into_iter().rev() {
                match previous {
                    Some(value) => {
                        self.params.named.insert(key, value);
                    }
                    None => {
                        self.params.named.remove(&key);
                    }
                }
            }
        }
    }

    /// Advances the top frame by one step and reports what to do next.
    fn step(&mut self) -> Option<Step<'a, H, M>> {
        let segments = &self.segments;
        let frame = self.stack.last_mut()?;
        let step = match frame.stage {
            Stage::Terminal => {
                frame.stage = Stage::Done;
                if frame.node.handler.is_some() {
                    Step::Emit(frame.node)
                } else {
                    Step::Continue
                }
            }
            Stage::Literal => {
                frame.stage = Stage::Variables;
                match frame.node.literals.get(segments[frame.depth]) {
                    Some(child) => Step::Descend {
                        child,
                        depth: frame.depth + 1,
                        bindings: Vec::new(),
                        positional: Vec::new(),
                    },
                    None => Step::Continue,
                }
            }
            Stage::Variables => {
                let segment = segments[frame.depth];
                let mut step = Step::Continue;
                while frame.next_variable < frame.node.variables.len() {
                    let child = &frame.node.variables[frame.next_variable];
                    frame.next_variable += 1;
                    let captured = match &child.pattern {
                        None => Some(Vec::new()),
                        Some(pattern) => pattern.captures(segment),
                    };
                    if let Some(sub_captures) = captured {
                        let mut bindings = Vec::with_capacity(1 + sub_captures.len());
                        if let Some(name) = &child.name {
                            bindings
                                .push((name.clone(), ParamValue::Segment(segment.to_string())));
                        }
                        bindings.extend(
                            sub_captures
                                .into_iter()
                                .map(|(key, value)| (key, ParamValue::Segment(value))),
                        );
                        step = Step::Descend {
                            child,
                            depth: frame.depth + 1,
                            bindings,
                            positional: Vec::new(),
                        };
                        break;
                    }
                }
                if matches!(step, Step::Continue) {
                    frame.stage = Stage::Variadic;
                }
                step
            }
            Stage::Variadic => {
                frame.stage = Stage::Wildcard;
                match frame.node.variadic.as_deref() {
                    Some(child) if child.handler.is_some() => {
                        let rest: Vec<String> = segments[frame.depth..]
                            .iter()
                            .map(|segment| segment.to_string())
                            .collect();
                        let bindings = child
                            .name
                            .clone()
                            .map(|name| (name, ParamValue::Rest(rest)))
                            .into_iter()
                            .collect();
                        Step::Descend {
                            child,
                            depth: segments.len(),
                            bindings,
                            positional: Vec::new(),
                        }
                    }
                    _ => Step::Continue,
                }
            }
            Stage::Wildcard => {
                frame.stage = Stage::Done;
                match frame.node.wildcard.as_deref() {
                    Some(child) if child.handler.is_some() => {
                        let positional: Vec<String> = segments[frame.depth..]
                            .iter()
                            .map(|segment| segment.to_string())
                            .collect();
                        Step::Descend {
                            child,
                            depth: segments.len(),
                            bindings: Vec::new(),
                            positional,
                        }
                    }
                    _ => Step::Continue,
                }
            }
            Stage::Done => Step::Retreat,
        };
        Some(step)
    }
}

impl<'a, H, M> Iterator for Matches<'a, H, M> {
    type Item = RouteMatch<'a, H, M>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step()? {
                Step::Descend {
                    child,
                    depth,
                    bindings,
                    positional,
                } => self.descend(child, depth, bindings, positional),
                Step::Emit(node) => {
                    if let Some(handler) = node.handler.as_ref() {
                        return Some(RouteMatch {
                            node,
                            handler,
                            params: self.params.clone(),
                            middleware: self.middleware.clone(),
                        });
                    }
                }
                Step::Retreat => self.retreat(),
                Step::Continue => {}
            }
        }
    }
}
