//! Compile-time and match-time flag sets.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Sub};

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($repr:ty) {
            $( $(#[$fmeta:meta])* const $flag:ident = $value:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name($repr);

        impl $name {
            pub const NONE: Self = Self(0);
            $( $(#[$fmeta])* pub const $flag: Self = Self($value); )*

            pub const fn bits(self) -> $repr {
                self.0
            }

            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            pub const fn without(self, other: Self) -> Self {
                Self(self.0 & !other.0)
            }

            pub fn set(&mut self, other: Self, on: bool) {
                if on {
                    self.0 |= other.0;
                } else {
                    self.0 &= !other.0;
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                self.without(rhs)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut first = true;
                write!(f, "{}(", stringify!($name))?;
                $(
                    if $value != 0 && self.contains(Self::$flag) {
                        if !first {
                            f.write_str(" | ")?;
                        }
                        f.write_str(stringify!($flag))?;
                        first = false;
                    }
                )*
                if first {
                    f.write_str("NONE")?;
                }
                f.write_str(")")
            }
        }
    };
}

flag_set! {
    /// Flags fixed when a pattern is compiled.
    pub struct SyntaxFlags(u32) {
        /// Perl-like syntax (the default family).
        const PERL = 0;
        /// POSIX basic syntax: `\(`, `\)`, `\{`, `\}`.
        const BASIC = 1 << 0;
        /// POSIX extended syntax.
        const EXTENDED_POSIX = 1 << 1;
        /// Every pattern character is a literal.
        const LITERAL = 1 << 2;
        const ICASE = 1 << 3;
        /// Free-spacing: unescaped whitespace is ignored and `#` starts a comment.
        const EXTENDED = 1 << 4;
        /// Groups do not capture.
        const NOSUBS = 1 << 5;
        /// Bracket ranges compare collation keys instead of code points.
        const COLLATE = 1 << 6;
        /// Report compile errors through `status()` instead of failing.
        const NO_EXCEPT = 1 << 7;
        /// `.` does not match line separators (`(?-s)` at the top level).
        const NO_MOD_S = 1 << 8;
        /// `^` and `$` only match at buffer ends (`(?-m)` at the top level).
        const NO_MOD_M = 1 << 9;
    }
}

impl SyntaxFlags {
    const FAMILY: Self = Self(Self::BASIC.0 | Self::EXTENDED_POSIX.0 | Self::LITERAL.0);

    pub fn is_perl(self) -> bool {
        !self.intersects(Self::FAMILY)
    }

    /// Non-Perl syntaxes pick the leftmost-longest match.
    pub fn is_posix(self) -> bool {
        self.intersects(Self(Self::BASIC.0 | Self::EXTENDED_POSIX.0))
    }
}

flag_set! {
    /// Flags that change the semantics of a single search.
    pub struct MatchFlags(u32) {
        /// The start of input is not the beginning of a line.
        const NOT_BOL = 1 << 0;
        /// The end of input is not the end of a line.
        const NOT_EOL = 1 << 1;
        /// The start of input is not the beginning of the buffer.
        const NOT_BOB = 1 << 2;
        /// The end of input is not the end of the buffer.
        const NOT_EOB = 1 << 3;
        /// The start of input is not a word start.
        const NOT_BOW = 1 << 4;
        /// The end of input is not a word end.
        const NOT_EOW = 1 << 5;
        const NOT_DOT_NEWLINE = 1 << 6;
        const NOT_DOT_NULL = 1 << 7;
        /// Characters before the search start are valid lookbehind context.
        const PREV_AVAIL = 1 << 8;
        /// Any match will do: skip leftmost-longest refinement.
        const ANY = 1 << 9;
        /// Reject empty matches.
        const NOT_NULL = 1 << 10;
        /// Reject an empty match at the search start.
        const NOT_INITIAL_NULL = 1 << 11;
        /// Only try a match at the search start.
        const CONTINUOUS = 1 << 12;
        const PARTIAL = 1 << 13;
        /// Leftmost-longest selection regardless of syntax.
        const POSIX = 1 << 14;
        const NOSUBS = 1 << 15;
        /// `^` and `$` only match at buffer ends.
        const SINGLE_LINE = 1 << 16;
    }
}

/// Role of a start/end mark pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GroupKind {
    Capture = 0,
    NonCapture = 1,
    Atomic = 2,
    LookAhead = 3,
    NegLookAhead = 4,
    LookBehind = 5,
    NegLookBehind = 6,
}

impl GroupKind {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Capture,
            1 => Self::NonCapture,
            2 => Self::Atomic,
            3 => Self::LookAhead,
            4 => Self::NegLookAhead,
            5 => Self::LookBehind,
            6 => Self::NegLookBehind,
            _ => panic!("invalid group kind: {v}"),
        }
    }

    pub fn is_assertion(self) -> bool {
        matches!(
            self,
            Self::LookAhead | Self::NegLookAhead | Self::LookBehind | Self::NegLookBehind
        )
    }

    pub fn is_negated(self) -> bool {
        matches!(self, Self::NegLookAhead | Self::NegLookBehind)
    }

    pub fn is_behind(self) -> bool {
        matches!(self, Self::LookBehind | Self::NegLookBehind)
    }
}

/// Newline policy of a `.` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WildMode {
    /// Follows the `NOT_DOT_NEWLINE` match flag.
    Default = 0,
    /// `(?s)`: always matches separators.
    MatchesNewline = 1,
    /// `(?-s)` or `\N`: never matches separators.
    NoNewline = 2,
}

impl WildMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Default,
            1 => Self::MatchesNewline,
            2 => Self::NoNewline,
            _ => panic!("invalid wild mode: {v}"),
        }
    }
}

/// Condition tested by a `(?(cond)yes|no)` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CondKind {
    /// `(?(N)...)`: group N participated.
    Group = 0,
    /// `(?(<name>)...)`: any group with this name hash participated.
    Named = 1,
    /// `(?(R)...)`: inside any recursion.
    Recursion = 2,
    /// `(?(RN)...)`: the innermost recursion entered group N.
    RecursionGroup = 3,
    /// `(?(R&name)...)`.
    RecursionNamed = 4,
    /// `(?(DEFINE)...)`: never true, body only reachable by recursion.
    Define = 5,
    /// `(?(?=...)...)`: the following assertion picks the branch.
    Assertion = 6,
}

impl CondKind {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Group,
            1 => Self::Named,
            2 => Self::Recursion,
            3 => Self::RecursionGroup,
            4 => Self::RecursionNamed,
            5 => Self::Define,
            6 => Self::Assertion,
            _ => panic!("invalid condition kind: {v}"),
        }
    }
}

/// How the searcher picks candidate start positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RestartKind {
    /// Every position whose first character is in the start map.
    #[default]
    Any,
    /// Positions where a word starts.
    Word,
    /// Line starts only.
    Line,
    /// The buffer start only.
    Buffer,
    /// The search start only (`\G`).
    Continue,
    /// Occurrences of a fixed literal prefix.
    Literal,
}
