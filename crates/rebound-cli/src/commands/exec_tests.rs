use rebound_lib::{Error, MatchFlags, Regex, RuntimeError, SyntaxFlags};

use super::exec::{ExecOutput, execute};
use super::run_common::SearchInput;

fn search(pattern: &str) -> SearchInput {
    SearchInput {
        pattern: pattern.to_owned(),
        text_path: None,
        text: None,
        syntax: SyntaxFlags::PERL,
        flags: MatchFlags::NONE,
        start: 0,
        fuel: None,
    }
}

fn exec_json(pattern: &str, text: &str, start: usize, all: bool) -> String {
    let mut input = search(pattern);
    input.start = start;
    let regex = Regex::new(pattern).unwrap();
    let output = execute(&regex, text, &input, all).unwrap();
    serde_json::to_string(&output).unwrap()
}

#[test]
fn first_match_with_unmatched_group() {
    let json = exec_json(r"(\d)(x)?", "a1 b2", 0, false);
    insta::assert_snapshot!(json, @r#"{"start":1,"end":2,"text":"1","groups":[{"start":1,"end":2,"text":"1"},{"start":1,"end":2,"text":"1"},null]}"#);
}

#[test]
fn first_match_honors_start() {
    let json = exec_json(r"\d", "a1 b2", 2, false);
    insta::assert_snapshot!(json, @r#"{"start":4,"end":5,"text":"2","groups":[{"start":4,"end":5,"text":"2"}]}"#);
}

#[test]
fn named_groups_are_listed() {
    let json = exec_json(r"(?<n>\d)", "x7", 0, false);
    insta::assert_snapshot!(json, @r#"{"start":1,"end":2,"text":"7","groups":[{"start":1,"end":2,"text":"7"},{"start":1,"end":2,"text":"7"}],"names":{"n":1}}"#);
}

#[test]
fn all_matches() {
    let json = exec_json(r"\d+", "1 22 333", 0, true);
    insta::assert_snapshot!(json, @r#"[{"start":0,"end":1,"text":"1","groups":[{"start":0,"end":1,"text":"1"}]},{"start":2,"end":4,"text":"22","groups":[{"start":2,"end":4,"text":"22"}]},{"start":5,"end":8,"text":"333","groups":[{"start":5,"end":8,"text":"333"}]}]"#);
}

#[test]
fn all_matches_skip_before_start() {
    let json = exec_json(r"\d", "1 2 3", 1, true);
    insta::assert_snapshot!(json, @r#"[{"start":2,"end":3,"text":"2","groups":[{"start":2,"end":3,"text":"2"}]},{"start":4,"end":5,"text":"3","groups":[{"start":4,"end":5,"text":"3"}]}]"#);
}

#[test]
fn no_match_is_empty() {
    let regex = Regex::new("z").unwrap();
    let input = search("z");

    let first = execute(&regex, "abc", &input, false).unwrap();
    assert!(first.is_empty());
    assert_eq!(serde_json::to_string(&first).unwrap(), "null");

    let all = execute(&regex, "abc", &input, true).unwrap();
    assert!(all.is_empty());
    assert_eq!(serde_json::to_string(&all).unwrap(), "[]");
}

#[test]
fn partial_match_is_flagged() {
    let regex = Regex::new("hello").unwrap();
    let mut input = search("hello");
    input.flags = MatchFlags::PARTIAL;

    let ExecOutput::First(Some(record)) = execute(&regex, "oh hel", &input, false).unwrap() else {
        panic!("expected a partial match");
    };
    assert!(record.partial);
    assert_eq!(record.text, "hel");
}

#[test]
fn runtime_errors_propagate() {
    let regex = Regex::new(r"(a*)*b").unwrap();
    let text = "a".repeat(30);
    let err = execute(&regex, &text, &search(r"(a*)*b"), false).unwrap_err();
    assert_eq!(err, Error::Runtime(RuntimeError::Complexity));
}
