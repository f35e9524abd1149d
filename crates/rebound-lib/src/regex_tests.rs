use std::sync::Arc;
use std::thread;

use indoc::indoc;

use crate::{Colors, Error, ErrorKind, FuelLimits, MatchFlags, Regex, RuntimeError};

fn texts(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text)
        .unwrap()
        .map(|m| m.unwrap().as_str().to_owned())
        .collect()
}

#[test]
fn search_and_groups() {
    let re = Regex::new(r"(\w+)@(\w+)\.com").unwrap();
    let m = re.search("mail bob@example.com now").unwrap().unwrap();
    assert_eq!(m.as_str(), "bob@example.com");
    assert_eq!(m.str(1), "bob");
    assert_eq!(m.str(2), "example");
    assert_eq!(re.mark_count(), 2);
}

#[test]
fn is_match() {
    let re = Regex::new(r"\d{3}").unwrap();
    assert!(re.is_match("abc123").unwrap());
    assert!(!re.is_match("abc12").unwrap());
}

#[test]
fn unmatched_paren_is_reported_at_the_paren() {
    let err = Regex::new("ab(c").unwrap_err();
    let Error::Compile(e) = &err else {
        panic!("expected a compile error, got {err:?}");
    };
    assert_eq!(e.kind, ErrorKind::Paren);
    assert_eq!(e.offset, 2);
    assert_eq!(err.code(), "paren");
}

#[test]
fn no_except_keeps_invalid_expression() {
    let re = Regex::builder("a[b").no_except(true).build().unwrap();
    assert!(!re.is_valid());
    assert_eq!(re.status().map(|e| e.kind), Some(ErrorKind::Brack));
    assert_eq!(re.search("ab").unwrap_err(), Error::InvalidPattern);
    assert_eq!(re.is_match("ab").unwrap_err(), Error::InvalidPattern);
    assert!(re.split("ab").is_err());
    assert_eq!(re.mark_count(), 0);
    assert_eq!(Error::InvalidPattern.code(), "bad_pattern");
}

#[test]
fn global_iteration() {
    let re = Regex::new("a*").unwrap();
    assert_eq!(texts(&re, "aaa"), vec!["aaa"]);

    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(texts(&re, "1 22 333"), vec!["1", "22", "333"]);
}

#[test]
fn split() {
    let re = Regex::new(",").unwrap();
    let parts: Vec<String> = re
        .split("a,b,,c")
        .unwrap()
        .map(|t| t.unwrap().to_string())
        .collect();
    assert_eq!(parts, vec!["a", "b", "", "c"]);
}

#[test]
fn tokens_with_groups() {
    let re = Regex::new(r"(\w)=(\d)").unwrap();
    let parts: Vec<String> = re
        .tokens("a=1,b=2", &[2])
        .unwrap()
        .map(|t| t.unwrap().to_string())
        .collect();
    assert_eq!(parts, vec!["1", "2"]);
}

#[test]
fn duplicate_names() {
    let re = Regex::new("(?<x>a)|(?<x>b)").unwrap();
    let m = re.search("b").unwrap().unwrap();
    assert_eq!(m.name("x").unwrap().as_str(), "b");
    assert_eq!(re.names(), vec![("x", 1), ("x", 2)]);
}

#[test]
fn builder_options() {
    let re = Regex::builder("HELLO").icase(true).build().unwrap();
    assert!(re.is_match("say hello").unwrap());

    let re = Regex::builder("a.c").literal().build().unwrap();
    assert!(!re.is_match("abc").unwrap());
    assert!(re.is_match("xa.c").unwrap());

    let re = Regex::builder(r"a b  # comment").free_spacing(true).build().unwrap();
    assert_eq!(re.search("xab").unwrap().unwrap().as_str(), "ab");

    let re = Regex::builder(r"\(a\)\1").basic().build().unwrap();
    assert_eq!(re.search("aa").unwrap().unwrap().as_str(), "aa");
}

#[test]
fn posix_syntax_is_leftmost_longest() {
    let re = Regex::builder("a|ab|aba").extended_posix().build().unwrap();
    assert_eq!(re.search("aba").unwrap().unwrap().as_str(), "aba");

    let re = Regex::new("a|ab|aba").unwrap();
    assert_eq!(re.search("aba").unwrap().unwrap().as_str(), "a");
    let m = re.search_at("aba", 0, MatchFlags::POSIX).unwrap().unwrap();
    assert_eq!(m.as_str(), "aba");
}

#[test]
fn match_whole() {
    let re = Regex::new(r"\d+").unwrap();
    assert!(re.match_whole("123").unwrap().is_some());
    assert!(re.match_whole("123a").unwrap().is_none());
}

#[test]
fn partial_match() {
    let re = Regex::new("hello world").unwrap();
    let m = re
        .search_at("say hello wo", 0, MatchFlags::PARTIAL)
        .unwrap()
        .unwrap();
    assert!(m.is_partial());
    assert_eq!(m.as_str(), "hello wo");
}

#[test]
fn pathological_pattern_errors() {
    let re = Regex::new(r"(a*)*b").unwrap();
    let err = re.search(&"a".repeat(40)).unwrap_err();
    assert_eq!(err, Error::Runtime(RuntimeError::Complexity));
    assert_eq!(err.to_string(), "Complexity requirements exceeded.");
}

#[test]
fn fuel_limits_are_applied() {
    let re = Regex::builder("(a|b)(c|d)e")
        .fuel_limits(FuelLimits::new().exec_fuel(3))
        .build()
        .unwrap();
    assert_eq!(
        re.search("ade").unwrap_err(),
        Error::Runtime(RuntimeError::Complexity)
    );
}

#[test]
fn deterministic_across_compilations() {
    let text = "x(a(b)c)y ab aab";
    let pattern = r"\((?:[^()]|(?R))*\)|a+b";
    let first: Vec<_> = texts(&Regex::new(pattern).unwrap(), text);
    let second: Vec<_> = texts(&Regex::new(pattern).unwrap(), text);
    assert_eq!(first, second);
    assert_eq!(first, vec!["(a(b)c)", "ab", "aab"]);
}

#[test]
fn shared_across_threads() {
    let re = Arc::new(Regex::new(r"\d+").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let re = Arc::clone(&re);
            thread::spawn(move || {
                let text = format!("item {i}{i}");
                re.search(&text).unwrap().unwrap().as_str().to_owned()
            })
        })
        .collect();
    let found: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(found, vec!["00", "11", "22", "33"]);
}

#[test]
fn dump_lists_nodes() {
    let re = Regex::new("ab").unwrap();
    let out = re.dump(Colors::OFF).unwrap();
    assert!(out.starts_with(indoc! {r#"
        [program]
        pattern = "ab"
        marks = 0
    "#}), "{out}");
    assert!(out.contains(r#"lit "ab""#), "{out}");
}

#[test]
fn record_json() {
    let re = Regex::new(r"(?<n>\d)").unwrap();
    let m = re.search("x7").unwrap().unwrap();
    let json = serde_json::to_value(m.to_record()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "start": 1,
            "end": 2,
            "text": "7",
            "groups": [
                { "start": 1, "end": 2, "text": "7" },
                { "start": 1, "end": 2, "text": "7" },
            ],
            "names": { "n": 1 },
        })
    );
}
