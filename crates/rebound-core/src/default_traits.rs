//! Locale-neutral traits built on the standard library's Unicode tables.

use crate::traits::{CharTraits, ClassMask, EscapeType, SyntaxType};

/// Default [`CharTraits`] for Unicode text.
///
/// Case folding uses simple (single character) lowercase mapping.
/// Equivalence classes strip Latin-1 diacritics, so `[[=e=]]` matches `é`.
#[derive(Clone, Debug)]
pub struct DefaultTraits {
    locale: String,
}

impl Default for DefaultTraits {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultTraits {
    pub fn new() -> Self {
        Self {
            locale: "C".to_owned(),
        }
    }

    /// Same behavior, reported under a different locale name.
    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

const CLASS_NAMES: &[(&str, ClassMask)] = &[
    ("alnum", ClassMask::ALNUM),
    ("alpha", ClassMask::ALPHA),
    ("blank", ClassMask::BLANK),
    ("cntrl", ClassMask::CNTRL),
    ("d", ClassMask::DIGIT),
    ("digit", ClassMask::DIGIT),
    ("graph", ClassMask::GRAPH),
    ("h", ClassMask::BLANK),
    ("horizontal", ClassMask::BLANK),
    ("l", ClassMask::LOWER),
    ("lower", ClassMask::LOWER),
    ("print", ClassMask::PRINT),
    ("punct", ClassMask::PUNCT),
    ("s", ClassMask::SPACE),
    ("space", ClassMask::SPACE),
    ("u", ClassMask::UPPER),
    ("upper", ClassMask::UPPER),
    ("v", ClassMask::VERTICAL),
    ("vertical", ClassMask::VERTICAL),
    ("w", ClassMask::WORD),
    ("word", ClassMask::WORD),
    ("xdigit", ClassMask::XDIGIT),
];

const COLLATE_NAMES: &[(&str, char)] = &[
    ("NUL", '\0'),
    ("alert", '\x07'),
    ("ampersand", '&'),
    ("apostrophe", '\''),
    ("asterisk", '*'),
    ("backslash", '\\'),
    ("backspace", '\x08'),
    ("carriage-return", '\r'),
    ("circumflex", '^'),
    ("circumflex-accent", '^'),
    ("colon", ':'),
    ("comma", ','),
    ("commercial-at", '@'),
    ("dollar-sign", '$'),
    ("eight", '8'),
    ("equals-sign", '='),
    ("exclamation-mark", '!'),
    ("five", '5'),
    ("form-feed", '\x0C'),
    ("four", '4'),
    ("full-stop", '.'),
    ("grave-accent", '`'),
    ("greater-than-sign", '>'),
    ("hyphen", '-'),
    ("hyphen-minus", '-'),
    ("left-brace", '{'),
    ("left-curly-bracket", '{'),
    ("left-parenthesis", '('),
    ("left-square-bracket", '['),
    ("less-than-sign", '<'),
    ("low-line", '_'),
    ("newline", '\n'),
    ("nine", '9'),
    ("number-sign", '#'),
    ("one", '1'),
    ("percent-sign", '%'),
    ("period", '.'),
    ("plus-sign", '+'),
    ("question-mark", '?'),
    ("quotation-mark", '"'),
    ("reverse-solidus", '\\'),
    ("right-brace", '}'),
    ("right-curly-bracket", '}'),
    ("right-parenthesis", ')'),
    ("right-square-bracket", ']'),
    ("semicolon", ';'),
    ("seven", '7'),
    ("six", '6'),
    ("slash", '/'),
    ("solidus", '/'),
    ("space", ' '),
    ("tab", '\t'),
    ("three", '3'),
    ("tilde", '~'),
    ("two", '2'),
    ("underscore", '_'),
    ("vertical-line", '|'),
    ("vertical-tab", '\x0B'),
    ("zero", '0'),
];

fn is_blank(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

fn is_vertical(c: char) -> bool {
    matches!(c, '\n' | '\x0B' | '\x0C' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || (!c.is_ascii() && c.is_numeric())
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0483}'..='\u{0489}'
            | '\u{0591}'..='\u{05BD}'
            | '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0900}'..='\u{0903}'
            | '\u{093A}'..='\u{094F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Latin-1 letters with diacritics map to their base letter.
fn strip_diacritic(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}

fn simple_lower(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

impl CharTraits for DefaultTraits {
    fn syntax_type(&self, c: char) -> SyntaxType {
        match c {
            '(' => SyntaxType::OpenMark,
            ')' => SyntaxType::CloseMark,
            '$' => SyntaxType::Dollar,
            '^' => SyntaxType::Caret,
            '.' => SyntaxType::Dot,
            '*' => SyntaxType::Star,
            '+' => SyntaxType::Plus,
            '?' => SyntaxType::Question,
            '[' => SyntaxType::OpenSet,
            ']' => SyntaxType::CloseSet,
            '|' => SyntaxType::Or,
            '\\' => SyntaxType::Escape,
            '-' => SyntaxType::Dash,
            '{' => SyntaxType::OpenBrace,
            '}' => SyntaxType::CloseBrace,
            '0'..='9' => SyntaxType::Digit,
            ',' => SyntaxType::Comma,
            '=' => SyntaxType::Equal,
            ':' => SyntaxType::Colon,
            '#' => SyntaxType::Hash,
            '\n' => SyntaxType::Newline,
            '!' => SyntaxType::Not,
            _ => SyntaxType::Char,
        }
    }

    fn escape_syntax_type(&self, c: char) -> EscapeType {
        match c {
            'w' | 'd' | 's' | 'h' | 'l' | 'u' => EscapeType::Class,
            'W' | 'D' | 'S' | 'H' | 'L' | 'U' => EscapeType::NotClass,
            'b' => EscapeType::WordBoundary,
            'B' => EscapeType::NotWordBoundary,
            '<' => EscapeType::WordStart,
            '>' => EscapeType::WordEnd,
            'A' | '`' => EscapeType::BufferStart,
            'z' | '\'' => EscapeType::BufferEnd,
            'Z' => EscapeType::SoftBufferEnd,
            'G' => EscapeType::ContinueMatch,
            'a' => EscapeType::Control('\x07'),
            'e' => EscapeType::Control('\x1B'),
            'f' => EscapeType::Control('\x0C'),
            'n' => EscapeType::Control('\n'),
            'r' => EscapeType::Control('\r'),
            't' => EscapeType::Control('\t'),
            'v' => EscapeType::Control('\x0B'),
            'x' => EscapeType::Hex,
            'c' => EscapeType::AsciiControl,
            '0' => EscapeType::Octal,
            '1'..='9' => EscapeType::Backref,
            'Q' => EscapeType::QuoteStart,
            'E' => EscapeType::QuoteEnd,
            'k' => EscapeType::NamedBackref,
            'g' => EscapeType::ExtendedBackref,
            'p' => EscapeType::Property,
            'P' => EscapeType::NotProperty,
            'X' => EscapeType::Combining,
            'N' => EscapeType::NotNewline,
            _ => EscapeType::Identity,
        }
    }

    fn translate(&self, c: char, icase: bool) -> char {
        if icase { simple_lower(c) } else { c }
    }

    fn is_class(&self, c: char, mask: ClassMask) -> bool {
        (mask.intersects(ClassMask::ALPHA) && c.is_alphabetic())
            || (mask.intersects(ClassMask::WORD)
                && (c.is_alphanumeric() || c == '_' || is_combining_mark(c)))
            || (mask.intersects(ClassMask::LOWER) && c.is_lowercase())
            || (mask.intersects(ClassMask::UPPER) && c.is_uppercase())
            || (mask.intersects(ClassMask::DIGIT) && is_digit(c))
            || (mask.intersects(ClassMask::XDIGIT) && c.is_ascii_hexdigit())
            || (mask.intersects(ClassMask::BLANK) && is_blank(c))
            || (mask.intersects(ClassMask::SPACE) && c.is_whitespace())
            || (mask.intersects(ClassMask::PRINT) && !c.is_control())
            || (mask.intersects(ClassMask::CNTRL) && c.is_control())
            || (mask.intersects(ClassMask::PUNCT)
                && !c.is_alphanumeric()
                && !c.is_whitespace()
                && !c.is_control()
                && !is_combining_mark(c))
            || (mask.intersects(ClassMask::VERTICAL) && is_vertical(c))
    }

    fn lookup_classname(&self, name: &str) -> Option<ClassMask> {
        CLASS_NAMES
            .binary_search_by(|(n, _)| (*n).cmp(name))
            .ok()
            .map(|i| CLASS_NAMES[i].1)
            .or_else(|| {
                let lowered = name.to_ascii_lowercase();
                (lowered != name).then(|| self.lookup_classname(&lowered)).flatten()
            })
    }

    fn lookup_collatename(&self, name: &str) -> Option<char> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(c);
        }
        COLLATE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
    }

    fn transform_primary(&self, c: char) -> u32 {
        strip_diacritic(simple_lower(c)) as u32
    }

    fn is_combining(&self, c: char) -> bool {
        is_combining_mark(c)
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}
