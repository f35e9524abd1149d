use rebound_bytecode::{Node, Program, RestartKind, SyntaxFlags};

use super::fixed_width;
use crate::test_utils::{expect_valid, expect_valid_with, listing};

fn first_chars(program: &Program) -> String {
    (0..=255u8)
        .filter(|&b| program.start_map().contains(b))
        .map(char::from)
        .collect()
}

/// Width of the whole program minus its final `Match`.
fn width(pattern: &str) -> Option<u32> {
    let program = expect_valid(pattern);
    let bytes = program.bytes();
    fixed_width(bytes, 0, bytes.len() as u32 - 8)
}

fn find_node<'a>(program: &'a Program, pred: impl Fn(&Node<'a>) -> bool) -> Node<'a> {
    program
        .nodes()
        .map(|(_, node)| node)
        .find(|node| pred(node))
        .expect("node should exist")
}

#[test]
fn start_maps() {
    assert_eq!(first_chars(&expect_valid("ab|cd")), "ac");
    assert_eq!(first_chars(&expect_valid("a?b")), "ab");
    assert_eq!(first_chars(&expect_valid("[x-z]q")), "xyz");
    assert_eq!(first_chars(&expect_valid("(a)?(?(1)b|c)d")), "abc");
    assert_eq!(first_chars(&expect_valid("(?=ab)a")), "a");
    assert_eq!(first_chars(&expect_valid("(?!x)y")), "y");
    assert_eq!(first_chars(&expect_valid_with("k", SyntaxFlags::ICASE)), "Kk");
}

#[test]
fn wildcards_fill_the_start_map() {
    assert!(expect_valid(".b").start_map().is_full());
    assert!(expect_valid("a*").start_map().is_full());
    assert!(expect_valid("(a)\\1").start_map().contains(b'a'));
}

#[test]
fn nullability() {
    assert!(expect_valid("a*").can_be_null());
    assert!(expect_valid("(a|)").can_be_null());
    assert!(expect_valid("(?:)").can_be_null());
    assert!(!expect_valid("a+").can_be_null());
    assert!(!expect_valid("a?b").can_be_null());
    assert!(!expect_valid("[ab]{2,}").can_be_null());
}

#[test]
fn restart_kinds() {
    let restart = |p: &str| expect_valid(p).restart();
    assert_eq!(restart("^a"), RestartKind::Line);
    assert_eq!(restart("\\Aa"), RestartKind::Buffer);
    assert_eq!(restart("(?-m)^a"), RestartKind::Buffer);
    assert_eq!(restart("\\Ga"), RestartKind::Continue);
    assert_eq!(restart("\\<a"), RestartKind::Word);
    assert_eq!(restart("a|b"), RestartKind::Any);
    assert_eq!(restart("(?i)ab"), RestartKind::Any);
    assert_eq!(restart("a*b"), RestartKind::Any);
}

#[test]
fn literal_prefix_skips_groups() {
    let program = expect_valid("(abc)d");
    assert_eq!(program.restart(), RestartKind::Literal);
    assert_eq!(program.literal_prefix(), Some("abc"));

    let program = expect_valid("(?:(?>xy))z");
    assert_eq!(program.literal_prefix(), Some("xy"));

    assert_eq!(expect_valid("a+").literal_prefix(), None);
}

#[test]
fn leading_wildcard() {
    assert!(listing(&expect_valid(".*foo")).contains(" leading"));
    assert!(!listing(&expect_valid(".*?foo")).contains(" leading"));
    assert!(!listing(&expect_valid("(.)*foo")).contains(" leading"));
    assert!(!listing(&expect_valid(".*(a)\\1")).contains(" leading"));
}

#[test]
fn alternative_maps() {
    let program = expect_valid("ab|cd");
    let Node::Alt {
        take,
        skip,
        take_null,
        skip_null,
        ..
    } = program.node(0)
    else {
        panic!("expected alt");
    };
    assert!(take.contains(b'a') && !take.contains(b'c'));
    assert!(skip.contains(b'c') && !skip.contains(b'a'));
    assert!(!take_null && !skip_null);

    let program = expect_valid("(?:a|)b");
    let Node::Alt { skip, .. } = find_node(&program, |n| matches!(n, Node::Alt { .. })) else {
        unreachable!()
    };
    assert!(skip.contains(b'b'));

    assert!(listing(&expect_valid("a|")).contains("alt 0112 skip-null"));
}

#[test]
fn repeat_maps() {
    let program = expect_valid("x*y");
    let Node::Repeat(r) = program.node(0) else {
        panic!("expected repeat");
    };
    assert!(r.take.contains(b'x') && !r.take.contains(b'y'));
    assert!(r.skip.contains(b'y') && !r.skip.contains(b'x'));
    assert!(!r.take_null && !r.skip_null);

    let program = expect_valid("x*");
    let Node::Repeat(r) = program.node(0) else {
        panic!("expected repeat");
    };
    assert!(r.skip_null);
}

#[test]
fn fixed_widths() {
    assert_eq!(width("ab.[xy]"), Some(4));
    assert_eq!(width("a{3}b"), Some(4));
    assert_eq!(width("(?:ab|cd)e"), Some(3));
    assert_eq!(width("(?=xyz)a"), Some(1));
    assert_eq!(width("\\d\\w"), Some(2));
    assert_eq!(width("a+"), None);
    assert_eq!(width("ab|c"), None);
    assert_eq!(width("(a)\\1"), None);
}

#[test]
fn nested_repeat_exit_allows_next_iteration() {
    let program = expect_valid("(?:ab?)*c");
    let inner = program
        .nodes()
        .filter_map(|(_, n)| match n {
            Node::Repeat(r) => Some(r),
            _ => None,
        })
        .nth(1)
        .expect("inner repeat");
    assert!(inner.skip.contains(b'a') && inner.skip.contains(b'c'));
    assert!(!inner.skip.contains(b'b'));
}
