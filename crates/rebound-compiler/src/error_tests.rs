use crate::error::{CompileError, ErrorKind};

#[test]
fn default_messages() {
    assert_eq!(ErrorKind::Paren.default_message(), "Unmatched ( or \\(.");
    assert_eq!(ErrorKind::Brack.default_message(), "Unmatched [ or [^.");
    assert_eq!(ErrorKind::BadBrace.code(), "bad_brace");
    assert_eq!(ErrorKind::PerlExtension.to_string(), "perl_extension");
}

#[test]
fn display_includes_offset() {
    let e = CompileError::new(ErrorKind::Paren, 3);
    assert_eq!(e.to_string(), "Unmatched ( or \\(. (at offset 3)");
}

#[test]
fn serializes_kind_as_snake_case() {
    let e = CompileError::new(ErrorKind::BadRepeat, 0);
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "bad_repeat",
            "offset": 0,
            "message": "Invalid preceding regular expression.",
        })
    );
}

#[test]
fn render_points_at_offset() {
    let e = CompileError::new(ErrorKind::Paren, 2);
    let out = e.render("ab(c", false);
    assert!(out.contains("error: Unmatched ( or \\(."), "{out}");
    assert!(out.contains("ab(c"), "{out}");
    assert!(out.contains("^ paren"), "{out}");
}

#[test]
fn render_clamps_past_the_end() {
    let e = CompileError::new(ErrorKind::Escape, 9);
    let out = e.render("ab\\", false);
    assert!(out.contains("^ escape"), "{out}");

    let e = CompileError::new(ErrorKind::Empty, 0);
    let out = e.render("", false);
    assert!(out.contains("error: Empty expression."), "{out}");
}

#[test]
fn custom_message() {
    let e = CompileError::with_message(ErrorKind::Ctype, 1, "Unknown character class \"foo\".");
    assert_eq!(e.kind, ErrorKind::Ctype);
    assert_eq!(e.message, "Unknown character class \"foo\".");
}
