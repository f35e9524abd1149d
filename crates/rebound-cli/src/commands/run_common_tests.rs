use std::io::Write;
use std::path::Path;

use rebound_lib::{Error, ErrorKind, SyntaxFlags};
use tempfile::NamedTempFile;

use super::run_common::{Input, InputError, compile, load_input};

fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn inline_text_wins_over_file() {
    let input = load_input(Some("abc"), Some(Path::new("missing.txt"))).unwrap();
    assert_eq!(input.as_str().unwrap(), "abc");
}

#[test]
fn file_is_memory_mapped() {
    let file = temp_file(b"one\ntwo\n");
    let input = load_input(None, Some(file.path())).unwrap();

    assert!(matches!(input, Input::Mapped { .. }));
    assert_eq!(input.as_str().unwrap(), "one\ntwo\n");
}

#[test]
fn empty_file_is_empty_text() {
    let file = temp_file(b"");
    let input = load_input(None, Some(file.path())).unwrap();

    assert!(matches!(input, Input::Owned(_)));
    assert_eq!(input.as_str().unwrap(), "");
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.txt");
    let Err(err) = load_input(None, Some(&path)) else {
        panic!("expected an error");
    };

    assert!(matches!(err, InputError::Io { .. }));
    let msg = err.to_string();
    assert!(msg.starts_with("failed to read '"), "{msg}");
    assert!(msg.contains("nope.txt"), "{msg}");
}

#[test]
fn invalid_utf8_is_rejected() {
    let file = temp_file(&[b'a', 0xff, b'b']);
    let input = load_input(None, Some(file.path())).unwrap();
    let err = input.as_str().unwrap_err();

    assert!(matches!(err, InputError::Utf8 { .. }));
    assert!(err.to_string().ends_with("is not valid UTF-8"));
}

#[test]
fn text_is_required() {
    let Err(err) = load_input(None, None) else {
        panic!("expected an error");
    };
    assert!(matches!(err, InputError::Missing));
}

#[test]
fn compile_applies_syntax_and_fuel() {
    let regex = compile("HELLO", SyntaxFlags::ICASE, Some(1000)).unwrap();
    assert!(regex.is_match("say hello").unwrap());
    assert_eq!(regex.fuel_limits().get_exec_fuel(), Some(1000));

    let regex = compile("a+", SyntaxFlags::PERL, None).unwrap();
    assert_eq!(regex.fuel_limits().get_exec_fuel(), None);
}

#[test]
fn compile_reports_pattern_errors() {
    let Err(Error::Compile(e)) = compile("ab(c", SyntaxFlags::PERL, None) else {
        panic!("expected a compile error");
    };
    assert_eq!(e.kind, ErrorKind::Paren);
    assert_eq!(e.offset, 2);
}
