use indoc::indoc;
use rebound_core::Colors;

use crate::test_utils::program;
use crate::{PrintTracer, VM, Verbosity};

fn trace(pattern: &str, text: &str, verbosity: Verbosity) -> String {
    let program = program(pattern);
    let mut tracer = PrintTracer::new(text, verbosity, Colors::OFF);
    VM::builder(&program, text)
        .build()
        .search_with(0, &mut tracer)
        .expect("search should not fail");
    tracer.lines().join("\n")
}

#[test]
fn default_shows_backtracks_and_match() {
    assert_eq!(
        trace("a*ab", "aab", Verbosity::Default),
        indoc! {r#"
            attempt @0
              ↺ 0120    1
              ✓ match 0..3 "aab""#}
    );
}

#[test]
fn attempts_are_separated() {
    let out = trace("b", "ab", Verbosity::Default);
    assert_eq!(out, "attempt @1\n  ✓ match 1..2 \"b\"");

    let out = trace("x|ab", "aab", Verbosity::Default);
    assert!(out.starts_with("attempt @0\n\nattempt @1\n"), "{out}");
}

#[test]
fn verbose_lists_nodes() {
    let out = trace("ab", "ab", Verbosity::Verbose);
    assert_eq!(
        out,
        indoc! {r#"
            attempt @0
              0000    0  lit "ab"
              0016    2  match
              ✓ match 0..2 "ab""#}
    );
}

#[test]
fn very_verbose_adds_checkpoints_and_preview() {
    let out = trace("a*", "aa", Verbosity::VeryVerbose);
    assert!(out.contains("checkpoint 0120"), "{out}");
    assert!(out.contains(r#"  "aa""#), "{out}");
}

#[test]
fn captures_and_recursion() {
    let out = trace("(a)(?1)", "aa", Verbosity::Default);
    assert!(out.contains(r##"#1 = "a""##), "{out}");
    assert!(out.contains("→ #1 "), "{out}");
    assert!(out.contains("← #1"), "{out}");
}

#[test]
fn verbs_are_reported() {
    let out = trace("a(*PRUNE)b", "ac", Verbosity::Default);
    assert!(out.contains("(*PRUNE) @1"), "{out}");
}
