//! Engine-level tests for the trie and its candidate sequences
//!
//! These drive `RouteNode` with pre-segmented paths, where the facade tests
//! exercise string splitting. The focus here is the matching laws: branch
//! priority, binding scope across a multi-candidate sequence, middleware
//! chain order, and the uniform handler filter.

use pretty_assertions::assert_eq;
use virgule_router::{RouteMatch, RouteNode};

fn middleware_names(m: &RouteMatch<'_, &'static str>) -> Vec<&'static str> {
    m.middleware().iter().map(|mw| **mw).collect()
}

#[test]
fn test_priority_order_across_all_branch_kinds() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["x"]).unwrap().set_handler("literal");
    root.insert(&["$v"]).unwrap().set_handler("variable");
    root.insert(&["...$r"]).unwrap().set_handler("variadic");
    root.insert(&["*"]).unwrap().set_handler("wildcard");

    let segments = ["x"];
    let order: Vec<&str> = root.matches(&segments).map(|m| *m.handler()).collect();
    assert_eq!(order, ["literal", "variable", "variadic", "wildcard"]);
}

#[test]
fn test_variables_match_in_registration_order() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["$id:\\d+"]).unwrap().set_handler("number");
    root.insert(&["$id:\\w+"]).unwrap().set_handler("word");

    // "5" satisfies both patterns; candidates come in registration order,
    // each carrying its own binding.
    let segments = ["5"];
    let mut matches = root.matches(&segments);

    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "number");
    assert_eq!(m.params().segment("id"), Some("5"));

    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "word");
    assert_eq!(m.params().segment("id"), Some("5"));

    assert!(matches.next().is_none());
}

#[test]
fn test_bindings_do_not_leak_between_candidates() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["$alpha:[a-z]+"]).unwrap().set_handler("alpha");
    root.insert(&["$word:\\w+"]).unwrap().set_handler("word");

    let segments = ["abc"];
    let mut matches = root.matches(&segments);

    let m = matches.next().unwrap();
    assert_eq!(m.params().segment("alpha"), Some("abc"));
    assert!(m.params().get("word").is_none());

    let m = matches.next().unwrap();
    assert_eq!(m.params().segment("word"), Some("abc"));
    assert!(m.params().get("alpha").is_none());
}

#[test]
fn test_sub_captures_are_scoped_to_their_candidate() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["$file:(?<stem>[a-z]+)\\.(?<ext>[a-z]+)"])
        .unwrap()
        .set_handler("file");
    root.insert(&["$any:.+"]).unwrap().set_handler("any");

    let segments = ["readme.txt"];
    let mut matches = root.matches(&segments);

    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "file");
    assert_eq!(m.params().segment("file"), Some("readme.txt"));
    assert_eq!(m.params().segment("stem"), Some("readme"));
    assert_eq!(m.params().segment("ext"), Some("txt"));

    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "any");
    assert_eq!(m.params().segment("any"), Some("readme.txt"));
    assert!(m.params().get("stem").is_none());
    assert!(m.params().get("ext").is_none());
}

#[test]
fn test_nested_variables_sharing_name_deeper_wins() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["$a", "$a"]).unwrap().set_handler("inner");
    root.insert(&["$a", "...$r"]).unwrap().set_handler("outer");

    let segments = ["one", "two"];
    let mut matches = root.matches(&segments);

    // Both levels bind `a`; the deeper binding wins for its candidate.
    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "inner");
    assert_eq!(m.params().segment("a"), Some("two"));

    // Once the inner scope unwinds, the shadowed outer value is visible again.
    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "outer");
    assert_eq!(m.params().segment("a"), Some("one"));
    assert_eq!(m.params().rest("r"), Some(&["two".to_string()][..]));
}

#[test]
fn test_only_handler_bearing_candidates_are_yielded() {
    // The engine yields handler-bearing candidates only — uniformly, in
    // every branch. A registered template without a handler is reachable
    // structurally but never surfaces as a candidate.
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["x", "$id"]).unwrap();

    let segments = ["x", "5"];
    assert!(root.matches(&segments).next().is_none());
}

#[test]
fn test_handlerless_nodes_are_passed_through() {
    // A handler-less variable node on the way to a terminal child does not
    // block the deeper candidate.
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["$id", "leaf"]).unwrap().set_handler("leaf");

    let segments = ["42", "leaf"];
    let m = root.matches(&segments).next().unwrap();
    assert_eq!(*m.handler(), "leaf");
    assert_eq!(m.params().segment("id"), Some("42"));
}

#[test]
fn test_deeper_variadic_before_root_variadic() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["test"]).unwrap().set_handler("test");
    root.insert(&["test", "...$all"]).unwrap().set_handler("test-all");
    root.insert(&["...$all"]).unwrap().set_handler("root-all");

    let segments = ["test", "first", "second"];
    let mut matches = root.matches(&segments);

    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "test-all");
    assert_eq!(
        m.params().rest("all"),
        Some(&["first".to_string(), "second".to_string()][..])
    );

    let m = matches.next().unwrap();
    assert_eq!(*m.handler(), "root-all");
    assert_eq!(
        m.params().rest("all"),
        Some(&["test".to_string(), "first".to_string(), "second".to_string()][..])
    );
}

#[test]
fn test_variadic_requires_at_least_one_segment() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["test"]).unwrap().set_handler("test");
    root.insert(&["test", "...$all"]).unwrap().set_handler("test-all");

    // With nothing left to consume, the variadic branch never runs.
    let segments = ["test"];
    let handlers: Vec<&str> = root.matches(&segments).map(|m| *m.handler()).collect();
    assert_eq!(handlers, ["test"]);
}

#[test]
fn test_empty_segments_match_a_terminal_root() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.set_handler("root");

    let m = root.matches(&[]).next().unwrap();
    assert_eq!(*m.handler(), "root");
    assert!(m.params().is_empty());
    assert!(m.middleware().is_empty());
}

#[test]
fn test_empty_segments_without_root_handler_match_nothing() {
    let root: RouteNode<&str> = RouteNode::root();
    assert!(root.matches(&[]).next().is_none());
}

#[test]
fn test_middleware_chain_spans_every_branch_kind() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.set_middleware(vec!["entry"]);
    root.insert(&["api"]).unwrap().set_middleware(vec!["api"]);
    root.insert(&["api", "$v"])
        .unwrap()
        .set_middleware(vec!["variable"]);
    root.insert(&["api", "$v", "...$rest"])
        .unwrap()
        .set_handler("tail")
        .set_middleware(vec!["tail"]);

    let segments = ["api", "x", "a", "b"];
    let m = root.matches(&segments).next().unwrap();
    assert_eq!(middleware_names(&m), ["entry", "api", "variable", "tail"]);
    assert_eq!(m.params().segment("v"), Some("x"));
    assert_eq!(
        m.params().rest("rest"),
        Some(&["a".to_string(), "b".to_string()][..])
    );
}

#[test]
fn test_wildcard_middleware_and_positional_bindings() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["files"]).unwrap().set_middleware(vec!["files"]);
    root.insert(&["files", "*"])
        .unwrap()
        .set_handler("blob")
        .set_middleware(vec!["blob"]);

    let segments = ["files", "images", "logo.png"];
    let m = root.matches(&segments).next().unwrap();
    assert_eq!(*m.handler(), "blob");
    assert_eq!(middleware_names(&m), ["files", "blob"]);
    assert_eq!(m.params().positional(), ["images", "logo.png"]);
}

#[test]
fn test_candidates_outlive_the_iterator() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["$id"]).unwrap().set_handler("id");

    let segments = ["42"];
    let m = {
        let mut matches = root.matches(&segments);
        matches.next().unwrap()
        // iterator dropped here, mid-search
    };
    assert_eq!(m.params().segment("id"), Some("42"));
}

#[test]
fn test_each_match_call_is_an_independent_search() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["x"]).unwrap().set_handler("literal");
    root.insert(&["$v"]).unwrap().set_handler("variable");
    root.insert(&["*"]).unwrap().set_handler("wildcard");

    let segments = ["x"];

    // Abandon a search partway through...
    let mut partial = root.matches(&segments);
    partial.next();
    partial.next();
    drop(partial);

    // ...and a fresh one still starts from the top, unpolluted.
    let order: Vec<&str> = root.matches(&segments).map(|m| *m.handler()).collect();
    assert_eq!(order, ["literal", "variable", "wildcard"]);

    let first = root.matches(&segments).next().unwrap();
    assert!(first.params().is_empty());
    assert!(first.middleware().is_empty());
}

#[test]
fn test_exhausted_iterator_stays_exhausted() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["x"]).unwrap().set_handler("literal");

    let segments = ["x"];
    let mut matches = root.matches(&segments);
    assert!(matches.next().is_some());
    assert!(matches.next().is_none());
    assert!(matches.next().is_none());
}

#[test]
fn test_matching_from_a_subtree_node() {
    let mut root: RouteNode<&str> = RouteNode::root();
    root.insert(&["api", "users", "$id"]).unwrap().set_handler("user");
    root.insert(&["api"]).unwrap().set_middleware(vec!["api"]);

    // Matching can start at any node; the entry node's own middleware seeds
    // the chain.
    let api = root.insert(&["api"]).unwrap();
    let segments = ["users", "7"];
    let m = api.matches(&segments).next().unwrap();
    assert_eq!(*m.handler(), "user");
    assert_eq!(m.params().segment("id"), Some("7"));
    assert_eq!(middleware_names(&m), ["api"]);
}
