use rebound_bytecode::{GroupKind, Node, NodeTag, RestartKind, SyntaxFlags};

use crate::error::ErrorKind;
use crate::test_utils::{expect_invalid, expect_invalid_with, expect_valid, expect_valid_with, listing};

fn tags(pattern: &str) -> Vec<NodeTag> {
    expect_valid(pattern).nodes().map(|(_, n)| n.tag()).collect()
}

fn error_at(pattern: &str) -> (ErrorKind, usize) {
    let e = expect_invalid(pattern);
    (e.kind, e.offset)
}

#[test]
fn greedy_star() {
    let program = expect_valid("a*b");
    insta::assert_snapshot!(listing(&program), @r#"
    0000 repeat r0 {0,inf} greedy exit=0120
    0088 lit "a"
    0104 jump 0000
    0120 lit "b"
    0136 match
    "#);
    assert_eq!(program.repeat_count(), 1);
}

#[test]
fn quantifier_splits_literal_run() {
    assert_eq!(
        tags("abc+"),
        vec![
            NodeTag::Literal,
            NodeTag::Repeat,
            NodeTag::Literal,
            NodeTag::Jump,
            NodeTag::Match,
        ]
    );
}

#[test]
fn alternation() {
    let program = expect_valid("ab|cd");
    insta::assert_snapshot!(listing(&program), @r#"
    0000 alt 0112
    0080 lit "ab"
    0096 jump 0128
    0112 lit "cd"
    0128 match
    "#);
}

#[test]
fn three_way_alternation_chains() {
    assert_eq!(
        tags("a|b|c"),
        vec![
            NodeTag::Alt,
            NodeTag::Literal,
            NodeTag::Jump,
            NodeTag::Alt,
            NodeTag::Literal,
            NodeTag::Jump,
            NodeTag::Literal,
            NodeTag::Match,
        ]
    );
}

#[test]
fn capture_group() {
    let program = expect_valid("(a)");
    insta::assert_snapshot!(listing(&program), @r#"
    0000 open capture #1 end=0040
    0024 lit "a"
    0040 close capture #1
    0056 match
    "#);
    assert_eq!(program.mark_count(), 1);
    assert_eq!(program.group_start(1), Some(0));
}

#[test]
fn lazy_and_possessive() {
    let lazy = listing(&expect_valid("a+?"));
    assert!(lazy.contains("repeat r0 {1,inf} lazy exit=0120"), "{lazy}");

    let program = expect_valid("a++");
    insta::assert_snapshot!(listing(&program), @r#"
    0000 open atomic #-1 end=0144
    0024 repeat r0 {1,inf} greedy exit=0144
    0112 lit "a"
    0128 jump 0024
    0144 close atomic #-1
    0160 match
    "#);
}

#[test]
fn intervals() {
    let out = listing(&expect_valid("a{2,5}"));
    assert!(out.contains("{2,5} greedy"), "{out}");
    let out = listing(&expect_valid("a{3}"));
    assert!(out.contains("{3,3} greedy"), "{out}");
    let out = listing(&expect_valid("a{2,}"));
    assert!(out.contains("{2,inf} greedy"), "{out}");
    let out = listing(&expect_valid("a{,4}"));
    assert!(out.contains("{0,4} greedy"), "{out}");
}

#[test]
fn perl_brace_without_interval_is_literal() {
    assert_eq!(tags("a{x}"), vec![NodeTag::Literal, NodeTag::Match]);
    let out = listing(&expect_valid("a{2"));
    assert!(out.contains(r#"lit "a{2""#), "{out}");
}

#[test]
fn inline_case_modifiers() {
    insta::assert_snapshot!(listing(&expect_valid("(?i)ab")), @r#"
    0000 icase on
    0008 lit "ab" /i
    0024 match
    "#);
    insta::assert_snapshot!(listing(&expect_valid("a(?i:b)c")), @r#"
    0000 lit "a"
    0016 open group #0 end=0064
    0040 icase on
    0048 lit "b" /i
    0064 close group #0
    0080 icase off
    0088 lit "c"
    0104 match
    "#);
}

#[test]
fn icase_flag_folds_literals() {
    let program = expect_valid_with("AbC", SyntaxFlags::ICASE);
    assert_eq!(
        program.node(0),
        Node::Literal {
            text: "abc",
            icase: true
        }
    );
}

#[test]
fn lookbehind_gets_backstep() {
    insta::assert_snapshot!(listing(&expect_valid("(?<=ab)c")), @r#"
    0000 open behind #-1 end=0056
    0024 backstep 2
    0040 lit "ab"
    0056 close behind #-1
    0072 lit "c"
    0088 match
    "#);
    let out = listing(&expect_valid("(?<!x|y|w)q"));
    assert!(!out.is_empty());
}

#[test]
fn lookbehind_widths() {
    assert!(listing(&expect_valid("(?<=ab|cd)x")).contains("backstep 2"));
    assert!(listing(&expect_valid("(?<=a{3})b")).contains("backstep 3"));
    assert!(listing(&expect_valid(r"(?<=\d[a-z].)b")).contains("backstep 3"));
    assert!(listing(&expect_valid(r"(?<=a(?=b)c)d")).contains("backstep 2"));
    assert_eq!(error_at("(?<=a+)b"), (ErrorKind::BadPattern, 0));
    assert_eq!(error_at("x(?<=a|bc)"), (ErrorKind::BadPattern, 1));
    assert_eq!(error_at(r"(a)(?<=\1)"), (ErrorKind::BadPattern, 3));
}

#[test]
fn group_kinds() {
    let program = expect_valid("(?:a)(?=b)(?!c)(?>d)(?<!e)");
    let kinds: Vec<_> = program
        .nodes()
        .filter_map(|(_, n)| match n {
            Node::StartMark { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            GroupKind::NonCapture,
            GroupKind::LookAhead,
            GroupKind::NegLookAhead,
            GroupKind::Atomic,
            GroupKind::NegLookBehind,
        ]
    );
    assert_eq!(program.mark_count(), 0);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(tags("a(?#note)b"), vec![NodeTag::Literal, NodeTag::Match]);
}

#[test]
fn free_spacing() {
    insta::assert_snapshot!(listing(&expect_valid("(?x) a b # trailing\n c")), @r#"
    0000 lit "abc"
    0016 match
    "#);
    let program = expect_valid_with("a b", SyntaxFlags::EXTENDED);
    assert_eq!(
        program.node(0),
        Node::Literal {
            text: "ab",
            icase: false
        }
    );
}

#[test]
fn named_groups() {
    let program = expect_valid("(?<x>a)|(?'x'b)|(?P<y>c)");
    assert_eq!(program.mark_count(), 3);
    assert_eq!(program.names().lookup("x"), &[1, 2]);
    assert_eq!(program.names().lookup("y"), &[3]);
}

#[test]
fn named_backreferences() {
    for pattern in [
        r"(?<n>a)\k<n>",
        r"(?<n>a)\k'n'",
        r"(?<n>a)\k{n}",
        r"(?<n>a)\g{n}",
        r"(?<n>a)(?P=n)",
    ] {
        let program = expect_valid(pattern);
        assert!(program.has_backrefs(), "{pattern}");
        assert!(
            program
                .nodes()
                .any(|(_, n)| matches!(n, Node::Backref { named: true, .. })),
            "{pattern}"
        );
    }
}

#[test]
fn numbered_backreferences() {
    let out = listing(&expect_valid(r"(a)(b)\2\g1\g{-2}\g-1"));
    assert!(out.contains("backref #2"), "{out}");
    assert!(out.contains("backref #1"), "{out}");
    assert_eq!(error_at(r"\1(a)"), (ErrorKind::Backref, 0));
    assert_eq!(error_at(r"(a)\k<b>"), (ErrorKind::Backref, 3));
    assert_eq!(error_at(r"(a)\g{-2}"), (ErrorKind::Backref, 3));
}

#[test]
fn multi_digit_backref_needs_enough_groups() {
    // Only one group, so `\10` is group 1 followed by a literal zero.
    let out = listing(&expect_valid(r"(a)\10"));
    assert!(out.contains("backref #1"), "{out}");
    assert!(out.contains(r#"lit "0""#), "{out}");
}

#[test]
fn recursion() {
    let out = listing(&expect_valid("(a(?1)?b)"));
    assert!(out.contains("recurse #1 -> 0000"), "{out}");

    let program = expect_valid("a(?R)?");
    assert!(program.has_recursion());
    assert!(listing(&program).contains("recurse #0 -> 0000"));

    let out = listing(&expect_valid("x(a)(?-1)"));
    assert!(out.contains("recurse #1 -> 0016"), "{out}");
    let out = listing(&expect_valid("(?+1)(a)"));
    assert!(out.contains("recurse #1"), "{out}");
    let out = listing(&expect_valid("(?<p>a)(?&p)(?P>p)"));
    assert_eq!(out.matches("recurse #1 -> 0000").count(), 2, "{out}");

    assert_eq!(error_at("(?&nope)"), (ErrorKind::Backref, 0));
    assert_eq!(error_at("(?2)(a)"), (ErrorKind::Backref, 0));
}

#[test]
fn conditionals() {
    let program = expect_valid("(a)?(?(1)b|c)");
    assert!(program.nodes().any(|(_, n)| matches!(
        n,
        Node::Conditional {
            kind: rebound_bytecode::CondKind::Group,
            value: 1,
            ..
        }
    )));
    expect_valid("(?<n>a)?(?(<n>)b|c)");
    expect_valid("(?<n>a)?(?('n')b)");
    expect_valid("(?(R)a|b)");
    expect_valid("(?(R1)a|b)(x)");
    expect_valid("(?(DEFINE)(?<d>[0-9]))(?&d)");

    let program = expect_valid("(?(?=a)ab|cd)");
    let cond_no = program.nodes().find_map(|(_, n)| match n {
        Node::StartMark {
            kind: GroupKind::LookAhead,
            cond_no,
            ..
        } => cond_no,
        _ => None,
    });
    assert!(cond_no.is_some());

    assert_eq!(error_at("(?(1)a|b|c)(x)"), (ErrorKind::BadPattern, 8));
    assert_eq!(error_at("(?(2)a)(x)"), (ErrorKind::Backref, 0));
    assert_eq!(error_at("(?(<zz>)a)"), (ErrorKind::Backref, 0));
    assert_eq!(error_at("(?(DEFINE)a|b)"), (ErrorKind::BadPattern, 11));
}

#[test]
fn verbs() {
    let program = expect_valid("a(*PRUNE)b(*SKIP)(*COMMIT)");
    assert!(program.has_verbs());
    let out = listing(&expect_valid("(?:a(*THEN)b|c)"));
    assert!(out.contains("(*THEN) scope=1"), "{out}");
    let out = listing(&expect_valid("a(*THEN)b"));
    assert!(out.contains("(*THEN)\n"), "{out}");
    assert!(!expect_valid("a(*FAIL)|(*F)|(*ACCEPT)").has_verbs());
    assert_eq!(error_at("(*NOPE)"), (ErrorKind::PerlExtension, 0));
}

#[test]
fn escapes() {
    let out = listing(&expect_valid(r"\x41\x{263A}\cA\012\t\Q.*\E"));
    assert!(out.contains(r#"lit "A☺\u{1}\n\t.*""#), "{out}");
    assert_eq!(
        tags(r"\b\B\<\>\A\z\Z\G\`\'"),
        vec![
            NodeTag::WordBoundary,
            NodeTag::NotWordBoundary,
            NodeTag::WordStart,
            NodeTag::WordEnd,
            NodeTag::BufferStart,
            NodeTag::BufferEnd,
            NodeTag::SoftBufferEnd,
            NodeTag::ContinueMatch,
            NodeTag::BufferStart,
            NodeTag::BufferEnd,
            NodeTag::Match,
        ]
    );
    assert_eq!(tags(r"\X\N"), vec![NodeTag::Combining, NodeTag::Wild, NodeTag::Match]);
    assert_eq!(error_at("ab\\"), (ErrorKind::Escape, 2));
    assert_eq!(error_at(r"\x{zz}"), (ErrorKind::Escape, 0));
}

#[test]
fn class_escapes() {
    let out = listing(&expect_valid(r"\d\W\p{Lu}\P{alpha}"));
    assert!(out.contains("wide-set [0 singles, 0 ranges, 0 equivs, ClassMask(digit)]"), "{out}");
    assert!(out.contains("ClassMask(word)"), "{out}");
    assert!(out.contains("ClassMask(upper)"), "{out}");
    assert!(out.contains("ClassMask(alpha)"), "{out}");
    assert_eq!(error_at(r"\p{Bogus}"), (ErrorKind::Ctype, 0));
}

#[test]
fn narrow_and_wide_sets() {
    let out = listing(&expect_valid("[a-c]"));
    assert!(out.contains("set [3]"), "{out}");
    let out = listing(&expect_valid("[^a-cx]"));
    assert!(out.contains("set ^[4]"), "{out}");
    let out = listing(&expect_valid("[]a]"));
    assert!(out.contains("set [2]"), "{out}");
    let out = listing(&expect_valid("[a-]"));
    assert!(out.contains("set [2]"), "{out}");
    let out = listing(&expect_valid("[[:digit:]_]"));
    assert!(out.contains("wide-set [1 singles, 0 ranges, 0 equivs, ClassMask(digit)]"), "{out}");
    let out = listing(&expect_valid("[α-ω]"));
    assert!(out.contains("wide-set [0 singles, 1 ranges"), "{out}");
    let out = listing(&expect_valid("[[=e=]]"));
    assert!(out.contains("1 equivs"), "{out}");
    let out = listing(&expect_valid("[[.hyphen.]]"));
    assert!(out.contains("set [1]"), "{out}");
}

#[test]
fn icase_sets_cover_both_cases() {
    let out = listing(&expect_valid_with("[a-c]", SyntaxFlags::ICASE));
    assert!(out.contains("set [6] /i"), "{out}");
}

#[test]
fn set_errors() {
    assert_eq!(error_at("[abc"), (ErrorKind::Brack, 0));
    assert_eq!(error_at("x[z-a]"), (ErrorKind::Range, 2));
    assert_eq!(error_at("[[:foo:]]"), (ErrorKind::Ctype, 1));
    assert_eq!(error_at("[[.nope.]]"), (ErrorKind::Collate, 1));
    assert_eq!(error_at(r"[a-\d]"), (ErrorKind::Range, 1));
    assert_eq!(error_at("[[:alpha:]"), (ErrorKind::Brack, 0));
}

#[test]
fn structural_errors() {
    assert_eq!(error_at("ab(c"), (ErrorKind::Paren, 2));
    assert_eq!(error_at("a)"), (ErrorKind::Paren, 1));
    assert_eq!(error_at("*a"), (ErrorKind::BadRepeat, 0));
    assert_eq!(error_at("a**"), (ErrorKind::BadRepeat, 2));
    assert_eq!(error_at(r"\b+"), (ErrorKind::BadRepeat, 2));
    assert_eq!(error_at("a{3,2}"), (ErrorKind::BadBrace, 1));
    assert_eq!(error_at("a{99999999999}"), (ErrorKind::BadBrace, 1));
    assert_eq!(error_at("(?Q)"), (ErrorKind::PerlExtension, 0));
    assert_eq!(error_at("(?#open"), (ErrorKind::PerlExtension, 0));
}

#[test]
fn posix_extended() {
    let ere = SyntaxFlags::EXTENDED_POSIX;
    let e = expect_invalid_with("a||b", ere);
    assert_eq!((e.kind, e.offset), (ErrorKind::Empty, 2));
    let e = expect_invalid_with("()", ere);
    assert_eq!((e.kind, e.offset), (ErrorKind::Empty, 1));
    let e = expect_invalid_with("a{2", ere);
    assert_eq!((e.kind, e.offset), (ErrorKind::Brace, 1));
    let e = expect_invalid_with("a{x}", ere);
    assert_eq!((e.kind, e.offset), (ErrorKind::BadBrace, 1));

    // No back-references: a digit escape is the digit itself.
    let program = expect_valid_with(r"(a)\1", ere);
    assert!(!program.has_backrefs());
    assert!(listing(&program).contains(r#"lit "1""#));
    assert!(program.is_posix());
}

#[test]
fn posix_basic() {
    let bre = SyntaxFlags::BASIC;
    let program = expect_valid_with(r"\(ab\)*\1", bre);
    assert_eq!(program.mark_count(), 1);
    assert!(program.has_backrefs());

    let out = listing(&expect_valid_with("*a(b)+", bre));
    assert!(out.contains(r#"lit "*a(b)+""#), "{out}");

    let out = listing(&expect_valid_with(r"a\{2,3\}", bre));
    assert!(out.contains("{2,3} greedy"), "{out}");

    assert_eq!(
        expect_valid_with("^*x$", bre)
            .nodes()
            .map(|(_, n)| n.tag())
            .collect::<Vec<_>>(),
        vec![
            NodeTag::StartLine,
            NodeTag::Literal,
            NodeTag::EndLine,
            NodeTag::Match
        ]
    );
    let out = listing(&expect_valid_with("a^b$c", bre));
    assert!(out.contains(r#"lit "a^b$c""#), "{out}");

    let e = expect_invalid_with(r"\(a", bre);
    assert_eq!((e.kind, e.offset), (ErrorKind::Paren, 0));
    let e = expect_invalid_with(r"a\{1", bre);
    assert_eq!((e.kind, e.offset), (ErrorKind::Brace, 1));
}

#[test]
fn literal_syntax() {
    let program = expect_valid_with("a.b(*", SyntaxFlags::LITERAL);
    insta::assert_snapshot!(listing(&program), @r#"
    0000 lit "a.b(*"
    0016 match
    "#);
}

#[test]
fn nosubs_disables_capture() {
    let program = expect_valid_with("(a)(?<n>b)", SyntaxFlags::NOSUBS);
    assert_eq!(program.mark_count(), 0);
    assert!(program.names().is_empty());
}

#[test]
fn dot_modes_and_anchors() {
    let out = listing(&expect_valid("(?s).(?-s).^$"));
    assert!(out.contains("any MatchesNewline"), "{out}");
    assert!(out.contains("any NoNewline"), "{out}");
    let out = listing(&expect_valid("(?-m)^$"));
    assert!(out.contains("bol single"), "{out}");
    assert!(out.contains("eol single"), "{out}");
    assert_eq!(expect_valid("^a").restart(), RestartKind::Line);
}

#[test]
fn nesting_limit() {
    use std::sync::Arc;

    use rebound_core::DefaultTraits;

    use crate::{CompileLimits, compile};

    let pattern = format!("{}a{}", "(".repeat(5), ")".repeat(5));
    let limits = CompileLimits::new().max_depth(3);
    let e = compile(
        &pattern,
        SyntaxFlags::PERL,
        Arc::new(DefaultTraits::new()),
        limits,
    )
    .unwrap_err();
    assert_eq!(e.kind, ErrorKind::Complexity);

    let limits = CompileLimits::new().max_size(64);
    let e = compile(
        &"abcdefgh".repeat(40).chars().map(|c| format!("{c}|")).collect::<String>(),
        SyntaxFlags::PERL,
        Arc::new(DefaultTraits::new()),
        limits,
    )
    .unwrap_err();
    assert_eq!(e.kind, ErrorKind::Size);
}
