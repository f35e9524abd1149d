//! The character trait interface.
//!
//! A [`CharTraits`] object answers every character-level question the
//! compiler and matcher ask: syntax roles, escape meanings, case folding,
//! class membership, digit values, collation and equivalence keys.
//! It must be thread-safe: one compiled program (and its traits) is shared
//! by every matcher that runs it.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Role a character plays in pattern syntax when it appears unescaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxType {
    Char,
    OpenMark,
    CloseMark,
    Dollar,
    Caret,
    Dot,
    Star,
    Plus,
    Question,
    OpenSet,
    CloseSet,
    Or,
    Escape,
    Dash,
    OpenBrace,
    CloseBrace,
    Digit,
    Comma,
    Equal,
    Colon,
    Hash,
    Newline,
    Not,
}

/// Meaning of a character that follows a backslash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EscapeType {
    /// The escaped character stands for itself.
    Identity,
    /// A class escape such as `\w`; the class is looked up by the lowercase letter.
    Class,
    /// Negated class escape such as `\W`.
    NotClass,
    WordBoundary,
    NotWordBoundary,
    WordStart,
    WordEnd,
    BufferStart,
    BufferEnd,
    SoftBufferEnd,
    /// `\G`: the position where the previous match ended.
    ContinueMatch,
    /// Single control character such as `\n`, carrying its value.
    Control(char),
    Hex,
    AsciiControl,
    Octal,
    Backref,
    QuoteStart,
    QuoteEnd,
    NamedBackref,
    ExtendedBackref,
    Property,
    NotProperty,
    Combining,
    NotNewline,
}

/// Set of character classes understood by a [`CharTraits`] implementation.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ClassMask(u32);

impl ClassMask {
    pub const NONE: Self = Self(0);
    pub const ALPHA: Self = Self(1 << 0);
    pub const WORD: Self = Self(1 << 1);
    pub const LOWER: Self = Self(1 << 2);
    pub const UPPER: Self = Self(1 << 3);
    pub const DIGIT: Self = Self(1 << 4);
    pub const XDIGIT: Self = Self(1 << 5);
    pub const BLANK: Self = Self(1 << 6);
    pub const SPACE: Self = Self(1 << 7);
    pub const PRINT: Self = Self(1 << 8);
    pub const CNTRL: Self = Self(1 << 9);
    pub const PUNCT: Self = Self(1 << 10);
    pub const VERTICAL: Self = Self(1 << 11);
    pub const ALNUM: Self = Self(Self::ALPHA.0 | Self::DIGIT.0);
    pub const GRAPH: Self = Self(Self::ALNUM.0 | Self::PUNCT.0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Class masks that survive case-insensitive compilation: `[[:lower:]]`
    /// and `[[:upper:]]` both widen to letters of either case.
    pub const fn case_folded(self) -> Self {
        if self.intersects(Self(Self::LOWER.0 | Self::UPPER.0)) {
            Self(self.0 | Self::LOWER.0 | Self::UPPER.0)
        } else {
            self
        }
    }
}

impl BitOr for ClassMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ClassMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ClassMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for ClassMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Debug for ClassMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ClassMask, &str); 12] = [
            (ClassMask::ALPHA, "alpha"),
            (ClassMask::WORD, "word"),
            (ClassMask::LOWER, "lower"),
            (ClassMask::UPPER, "upper"),
            (ClassMask::DIGIT, "digit"),
            (ClassMask::XDIGIT, "xdigit"),
            (ClassMask::BLANK, "blank"),
            (ClassMask::SPACE, "space"),
            (ClassMask::PRINT, "print"),
            (ClassMask::CNTRL, "cntrl"),
            (ClassMask::PUNCT, "punct"),
            (ClassMask::VERTICAL, "vertical"),
        ];
        let mut parts = NAMES
            .iter()
            .filter(|(mask, _)| self.intersects(*mask))
            .map(|(_, name)| *name);
        let Some(first) = parts.next() else {
            return f.write_str("ClassMask(none)");
        };
        write!(f, "ClassMask({first}")?;
        for part in parts {
            write!(f, "|{part}")?;
        }
        f.write_str(")")
    }
}

/// Line separators recognized by `^`, `$`, `\Z` and the line restart strategy.
pub fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0C' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Character-level services consumed by the compiler and the matcher.
pub trait CharTraits: Send + Sync + fmt::Debug {
    /// Syntax role of an unescaped character.
    fn syntax_type(&self, c: char) -> SyntaxType;

    /// Meaning of `c` when it follows a backslash.
    fn escape_syntax_type(&self, c: char) -> EscapeType;

    /// Canonical form used for comparison; folds case when `icase` is set.
    fn translate(&self, c: char, icase: bool) -> char;

    /// Every character that folds to the same canonical form as `c`, `c` included.
    fn case_variants(&self, c: char) -> Vec<char> {
        let folded = self.translate(c, true);
        let mut out = vec![c];
        for candidate in folded.to_uppercase().chain(folded.to_lowercase()).chain([folded]) {
            if !out.contains(&candidate) && self.translate(candidate, true) == folded {
                out.push(candidate);
            }
        }
        out
    }

    fn is_class(&self, c: char, mask: ClassMask) -> bool;

    /// Resolves a class name (`alpha`, `w`, `digit`, ...) to its mask.
    fn lookup_classname(&self, name: &str) -> Option<ClassMask>;

    /// Resolves a collating element name (`space`, `hyphen`, a single character).
    fn lookup_collatename(&self, name: &str) -> Option<char>;

    /// Sort key for range comparisons inside brackets under collation.
    fn transform(&self, c: char) -> u32 {
        c as u32
    }

    /// Primary sort key: characters with equal keys form an equivalence class.
    fn transform_primary(&self, c: char) -> u32;

    fn digit_value(&self, c: char, radix: u32) -> Option<u32> {
        c.to_digit(radix)
    }

    /// Combining marks extend the preceding character for `\X`.
    fn is_combining(&self, c: char) -> bool;

    fn is_separator(&self, c: char) -> bool {
        is_separator(c)
    }

    fn is_word(&self, c: char) -> bool {
        self.is_class(c, ClassMask::WORD)
    }

    fn locale(&self) -> &str;
}
