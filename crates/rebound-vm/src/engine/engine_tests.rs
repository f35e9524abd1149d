use rebound_bytecode::{MatchFlags, SyntaxFlags};

use crate::VM;
use crate::test_utils::{find, find_with, program_with, render, span};

#[test]
fn greedy_and_lazy_star() {
    assert_eq!(find("a.*b", "axbxb"), r#""axbxb""#);
    assert_eq!(find("a.*?b", "axbxb"), r#""axb""#);
}

#[test]
fn bounded_repeats() {
    assert_eq!(find("a{2,3}", "aaaa"), r#""aaa""#);
    assert_eq!(find("a{2,3}?", "aaaa"), r#""aa""#);
    assert_eq!(find("a{2}", "a"), "no match");
    assert_eq!(find("a{2,}", "aaaaa"), r#""aaaaa""#);
}

#[test]
fn capture_keeps_last_iteration() {
    assert_eq!(find("(a|b)+", "abba"), r#""abba" "a""#);
}

#[test]
fn unmatched_group() {
    assert_eq!(find("(a)|b", "b"), r#""b" -"#);
}

#[test]
fn alternation_is_leftmost_first() {
    assert_eq!(find("a|ab", "ab"), r#""a""#);
    assert_eq!(find("ab|a", "ab"), r#""ab""#);
}

#[test]
fn posix_flag_prefers_longest() {
    assert_eq!(find_with("a|ab|aba", "aba", MatchFlags::POSIX), r#""aba""#);
}

#[test]
fn posix_syntax_prefers_longest_overall() {
    let program = program_with("(a|ab)(c|bcd)", SyntaxFlags::EXTENDED_POSIX);
    let found = VM::builder(&program, "abcd").build().search(0);
    assert_eq!(render(&found), r#""abcd" "a" "bcd""#);
}

#[test]
fn line_anchors() {
    assert_eq!(span("^b", "a\nb"), Some((2, 3)));
    assert_eq!(span("a$", "a\nb"), Some((0, 1)));
    assert_eq!(span("(?-m)^b", "a\nb"), None);
    assert_eq!(span("(?-m)a$", "a\nb"), None);
    assert_eq!(find_with("^b", "a\nb", MatchFlags::SINGLE_LINE), "no match");
}

#[test]
fn line_anchors_around_crlf() {
    assert_eq!(span("^b", "a\r\nb"), Some((3, 4)));
    assert_eq!(span("a$", "a\r\nb"), Some((0, 1)));
    assert_eq!(span("^$", "a\r\nb"), None);
}

#[test]
fn buffer_anchors() {
    assert_eq!(span(r"\Aa", "ba"), None);
    assert_eq!(span(r"a\z", "a\n"), None);
    assert_eq!(span(r"a\Z", "a\n"), Some((0, 1)));
    assert_eq!(span(r"a\z", "ba"), Some((1, 2)));
}

#[test]
fn not_bol_and_not_eol() {
    assert_eq!(find_with("^a", "a", MatchFlags::NOT_BOL), "no match");
    assert_eq!(find_with("a$", "a", MatchFlags::NOT_EOL), "no match");
    assert_eq!(find_with(r"\Aa", "a", MatchFlags::NOT_BOB), "no match");
}

#[test]
fn word_boundaries() {
    assert_eq!(span(r"\bfoo\b", "a foo bar"), Some((2, 5)));
    assert_eq!(span(r"\bfoo\b", "afoo"), None);
    assert_eq!(span(r"\Bo", "foo"), Some((1, 2)));
    assert_eq!(span(r"\<b", "ab b"), Some((3, 4)));
    assert_eq!(span(r"a\>", "ab a"), Some((3, 4)));
}

#[test]
fn dot_and_newlines() {
    assert_eq!(find("a.b", "a\nb"), "\"a\\nb\"");
    assert_eq!(find_with("a.b", "a\nb", MatchFlags::NOT_DOT_NEWLINE), "no match");
    assert_eq!(find("(?-s)a.b", "a\nb"), "no match");
    assert_eq!(find_with("a.b", "a\0b", MatchFlags::NOT_DOT_NULL), "no match");
}

#[test]
fn leading_wildcard_restarts_past_reach() {
    assert_eq!(
        find_with(".*foo", "xx\nyyfoo", MatchFlags::NOT_DOT_NEWLINE),
        r#""yyfoo""#
    );
    assert_eq!(find(".*foo", "xx\nyyfoo"), "\"xx\\nyyfoo\"");
}

#[test]
fn lookahead() {
    assert_eq!(span("foo(?=bar)", "foobaz foobar"), Some((7, 10)));
    assert_eq!(span("foo(?!bar)", "foobar foobaz"), Some((7, 10)));
}

#[test]
fn lookbehind() {
    assert_eq!(span(r"(?<=x)\d+", "y1 x42"), Some((4, 6)));
    assert_eq!(span(r"(?<!-)\b\d+", "-5 7"), Some((3, 4)));
    assert_eq!(span(r"(?<=ab|cd)e", "abe"), Some((2, 3)));
}

#[test]
fn lookbehind_stops_at_search_start() {
    let program = crate::test_utils::program(r"(?<=a)b");
    let found = VM::builder(&program, "ab").build().search(1);
    assert_eq!(render(&found), "no match");

    let found = VM::builder(&program, "ab")
        .flags(MatchFlags::PREV_AVAIL)
        .build()
        .search(1);
    assert_eq!(render(&found), r#""b""#);
}

#[test]
fn backreferences() {
    assert_eq!(find(r"(a|b)\1", "abb"), r#""bb" "b""#);
    assert_eq!(find(r"(?i)(a)\1", "aA"), r#""aA" "a""#);
    assert_eq!(find(r"(a)\1", "aA"), "no match");
    assert_eq!(find(r"(a)?\1b", "b"), "no match");
}

#[test]
fn named_backreference() {
    assert_eq!(span(r#"(?<q>['"]).*?\k<q>"#, r#"say "hi" ok"#), Some((4, 8)));
}

#[test]
fn whole_pattern_recursion() {
    assert_eq!(span(r"\((?:[^()]|(?R))*\)", "x(a(b)c)y"), Some((1, 8)));
    assert_eq!(find("a(?R)?b", "aaabbb"), r#""aaabbb""#);
    assert_eq!(find("a(?R)?b", "aaabb"), r#""aabb""#);
}

#[test]
fn group_recursion() {
    assert_eq!(
        find(r"(?<p>\((?:[^()]|(?&p))*\))", "x(a(b)c)y"),
        r#""(a(b)c)" "(a(b)c)""#
    );
}

#[test]
fn recursion_restores_captures() {
    assert_eq!(find("(a|b)(?1)", "ab"), r#""ab" "a""#);
}

#[test]
fn group_conditional() {
    let pattern = "^(<)?a(?(1)>)$";
    assert_eq!(find(pattern, "<a>"), r#""<a>" "<""#);
    assert_eq!(find(pattern, "a"), r#""a" -"#);
    assert_eq!(find(pattern, "<a"), "no match");
    assert_eq!(find(pattern, "a>"), "no match");
}

#[test]
fn assertion_conditional() {
    let pattern = r"(?(?=\d)\d{3}|[a-z]+)";
    assert_eq!(find(pattern, "12345"), r#""123""#);
    assert_eq!(find(pattern, "abc1"), r#""abc""#);
}

#[test]
fn define_block() {
    let pattern = r"(?(DEFINE)(?<byte>\d{1,3}))(?&byte)\.(?&byte)";
    assert_eq!(find(pattern, "ip 10.200"), r#""10.200" -"#);
}

#[test]
fn atomic_groups() {
    assert_eq!(find("(?>a+)b", "aaab"), r#""aaab""#);
    assert_eq!(find("(?>a+)ab", "aaab"), "no match");
    assert_eq!(find("a++ab", "aaab"), "no match");
    assert_eq!(find("a+ab", "aaab"), r#""aaab""#);
}

#[test]
fn commit() {
    assert_eq!(span("a+b", "aaac aaab"), Some((5, 9)));
    assert_eq!(span("a+(*COMMIT)b", "aaac aaab"), None);
}

#[test]
fn prune() {
    assert_eq!(find("a+bc|a+bd", "aabd"), r#""aabd""#);
    assert_eq!(find("a+(*PRUNE)bc|a+bd", "aabd"), "no match");
}

#[test]
fn skip() {
    assert_eq!(span("a+bc|abd", "aaabd"), Some((2, 5)));
    assert_eq!(span("a+(*SKIP)bc|abd", "aaabd"), None);
}

#[test]
fn then_moves_to_next_alternative() {
    assert_eq!(find("a(*THEN)bc|abd", "abd"), r#""abd""#);
    assert_eq!(find("a(*PRUNE)bc|abd", "abd"), "no match");
}

#[test]
fn then_in_last_alternative_fails_the_group() {
    assert_eq!(find("(?:x|a(*THEN)b)|ac", "ac"), r#""ac""#);
}

#[test]
fn accept_and_fail() {
    assert_eq!(find("a(*ACCEPT)b", "ac"), r#""a""#);
    assert_eq!(find("(a(*ACCEPT)b)c", "ac"), r#""a" "a""#);
    assert_eq!(span("a(*FAIL)|b", "ab"), Some((1, 2)));
}

#[test]
fn case_insensitive() {
    assert_eq!(span("(?i)hello", "Say HeLLo"), Some((4, 9)));
    assert_eq!(span("(?i)[a-c]+", "xxAbC"), Some((2, 5)));
    assert_eq!(span("a(?i)b", "aB"), Some((0, 2)));
    assert_eq!(span("a(?i)b", "AB"), None);
}

#[test]
fn icase_syntax_flag() {
    let program = program_with("straße", SyntaxFlags::ICASE);
    let found = VM::builder(&program, "STRAßE").build().search(0);
    assert_eq!(render(&found), r#""STRAßE""#);
}

#[test]
fn combining_sequence() {
    assert_eq!(span(r"\X", "e\u{301}x"), Some((0, 3)));
}

#[test]
fn not_null() {
    assert_eq!(find("a*", "bbb"), r#""""#);
    assert_eq!(find_with("a*", "bbb", MatchFlags::NOT_NULL), "no match");
}

#[test]
fn nosubs_flag_drops_groups() {
    assert_eq!(find_with("(a)(b)", "ab", MatchFlags::NOSUBS), r#""ab" - -"#);
}

#[test]
fn exponential_pattern_exhausts_fuel() {
    assert_eq!(find(r"(a*)*b", &"a".repeat(30)), "error: complexity");
}

#[test]
fn explicit_fuel_limit() {
    let program = crate::test_utils::program("(a|b)(c|d)e");
    let found = VM::builder(&program, "ade").exec_fuel(3).build().search(0);
    assert_eq!(render(&found), "error: complexity");
}

#[test]
fn checkpoint_limit() {
    let program = crate::test_utils::program("a*");
    let limits = crate::FuelLimits::new().checkpoint_limit(3);
    let found = VM::builder(&program, "aaaaaa").limits(limits).build().search(0);
    assert_eq!(render(&found), "error: stack");
}

#[test]
fn recursion_limit() {
    let program = crate::test_utils::program("a(?R)?b");
    let found = VM::builder(&program, "aaaaabbbbb")
        .recursion_limit(2)
        .build()
        .search(0);
    assert_eq!(render(&found), "error: stack");
}
