use crate::{CharTraits, ClassMask, DefaultTraits, EscapeType, SyntaxType, is_separator};

#[test]
fn class_names_resolve() {
    let t = DefaultTraits::new();
    assert_eq!(t.lookup_classname("alpha"), Some(ClassMask::ALPHA));
    assert_eq!(t.lookup_classname("w"), Some(ClassMask::WORD));
    assert_eq!(t.lookup_classname("d"), Some(ClassMask::DIGIT));
    assert_eq!(t.lookup_classname("graph"), Some(ClassMask::GRAPH));
    assert_eq!(t.lookup_classname("DIGIT"), Some(ClassMask::DIGIT));
    assert_eq!(t.lookup_classname("nope"), None);
}

#[test]
fn class_membership() {
    let t = DefaultTraits::new();
    assert!(t.is_class('a', ClassMask::ALPHA));
    assert!(t.is_class('_', ClassMask::WORD));
    assert!(!t.is_class('-', ClassMask::WORD));
    assert!(t.is_class('7', ClassMask::ALNUM));
    assert!(t.is_class('\t', ClassMask::BLANK));
    assert!(!t.is_class('\n', ClassMask::BLANK));
    assert!(t.is_class('\n', ClassMask::SPACE));
    assert!(t.is_class('!', ClassMask::PUNCT));
    assert!(t.is_class('F', ClassMask::XDIGIT));
    assert!(!t.is_class('g', ClassMask::XDIGIT));
    assert!(t.is_class('\u{2028}', ClassMask::VERTICAL));
    assert!(t.is_class('é', ClassMask::LOWER));
}

#[test]
fn case_folding() {
    let t = DefaultTraits::new();
    assert_eq!(t.translate('A', true), 'a');
    assert_eq!(t.translate('A', false), 'A');
    assert_eq!(t.translate('É', true), 'é');

    let variants = t.case_variants('k');
    assert!(variants.contains(&'k'));
    assert!(variants.contains(&'K'));
}

#[test]
fn equivalence_keys_strip_diacritics() {
    let t = DefaultTraits::new();
    assert_eq!(t.transform_primary('e'), t.transform_primary('é'));
    assert_eq!(t.transform_primary('E'), t.transform_primary('ë'));
    assert_ne!(t.transform_primary('e'), t.transform_primary('a'));
}

#[test]
fn collating_names() {
    let t = DefaultTraits::new();
    assert_eq!(t.lookup_collatename("space"), Some(' '));
    assert_eq!(t.lookup_collatename("hyphen"), Some('-'));
    assert_eq!(t.lookup_collatename("x"), Some('x'));
    assert_eq!(t.lookup_collatename("bogus"), None);
}

#[test]
fn syntax_and_escape_roles() {
    let t = DefaultTraits::new();
    assert_eq!(t.syntax_type('('), SyntaxType::OpenMark);
    assert_eq!(t.syntax_type('7'), SyntaxType::Digit);
    assert_eq!(t.syntax_type('x'), SyntaxType::Char);
    assert_eq!(t.escape_syntax_type('w'), EscapeType::Class);
    assert_eq!(t.escape_syntax_type('D'), EscapeType::NotClass);
    assert_eq!(t.escape_syntax_type('n'), EscapeType::Control('\n'));
    assert_eq!(t.escape_syntax_type('3'), EscapeType::Backref);
    assert_eq!(t.escape_syntax_type('.'), EscapeType::Identity);
}

#[test]
fn digit_values_by_radix() {
    let t = DefaultTraits::new();
    assert_eq!(t.digit_value('7', 8), Some(7));
    assert_eq!(t.digit_value('8', 8), None);
    assert_eq!(t.digit_value('f', 16), Some(15));
}

#[test]
fn separators_and_combining() {
    assert!(is_separator('\n'));
    assert!(is_separator('\u{2029}'));
    assert!(!is_separator(' '));

    let t = DefaultTraits::new();
    assert!(t.is_combining('\u{0301}'));
    assert!(!t.is_combining('a'));
}

#[test]
fn class_mask_debug() {
    assert_eq!(format!("{:?}", ClassMask::ALNUM), "ClassMask(alpha|digit)");
    assert_eq!(format!("{:?}", ClassMask::NONE), "ClassMask(none)");
}

#[test]
fn locale_name() {
    assert_eq!(DefaultTraits::new().locale(), "C");
    assert_eq!(DefaultTraits::with_locale("de_DE").locale(), "de_DE");
}
