//! Quantifiers: `* + ? {m,n}`, lazy and possessive suffixes.

use rebound_bytecode::node::field;
use rebound_bytecode::{ByteMap, GroupKind, INFINITE, Node, Repeat, UNLINKED};

use super::{Atom, PResult, Parser};
use crate::error::ErrorKind;

/// Outcome of reading an interval body.
enum Bounds {
    Valid(u32, u32),
    /// Not an interval at all (Perl treats the brace as a literal).
    Malformed,
    Unclosed,
    TooLarge,
}

impl Parser<'_> {
    /// Applies a quantifier read at `op` to the preceding atom.
    pub(super) fn parse_repeat(&mut self, op: usize, min: u32, max: u32) -> PResult<()> {
        let mut greedy = true;
        let mut possessive = false;
        if self.is_perl() {
            if self.eat('?') {
                greedy = false;
            } else if self.eat('+') {
                possessive = true;
            }
        }
        self.apply_repeat(op, min, max, greedy, possessive)
    }

    pub(super) fn apply_repeat(
        &mut self,
        op: usize,
        min: u32,
        max: u32,
        greedy: bool,
        possessive: bool,
    ) -> PResult<()> {
        if min > max {
            return Err(self.error(ErrorKind::BadBrace, op));
        }
        let Some(atom) = self.take_atom() else {
            return Err(self.error(ErrorKind::BadRepeat, op));
        };
        self.flush_literal();

        if min != 1 || max != 1 {
            let id = self.repeat_count;
            self.repeat_count += 1;
            self.insert(
                atom,
                &Node::Repeat(Repeat {
                    alt: UNLINKED,
                    min,
                    max,
                    id,
                    take: ByteMap::empty(),
                    skip: ByteMap::empty(),
                    take_null: false,
                    skip_null: false,
                    greedy,
                    leading: false,
                }),
            );
            self.emit.append(&Node::Jump { target: atom });
            let exit = self.emit.len();
            self.emit.patch(atom, field::ALT, exit);
        }
        if possessive {
            self.wrap_atomic(atom);
        }
        self.last_atom = Atom::None;
        Ok(())
    }

    /// Encloses everything from `at` to the end in an atomic group.
    fn wrap_atomic(&mut self, at: u32) {
        self.insert(
            at,
            &Node::StartMark {
                kind: GroupKind::Atomic,
                index: -1,
                end: UNLINKED,
                cond_no: None,
            },
        );
        let end = self.emit.append(&Node::EndMark {
            kind: GroupKind::Atomic,
            index: -1,
        });
        self.emit.patch(at, field::MARK_END, end);
    }

    /// `{` in Perl or POSIX extended syntax.
    pub(super) fn parse_brace(&mut self, at: usize) -> PResult<()> {
        self.pos = at + 1;
        match self.read_bounds("}") {
            Bounds::Valid(min, max) => self.parse_repeat(at, min, max),
            Bounds::TooLarge => Err(self.error(ErrorKind::BadBrace, at)),
            Bounds::Malformed | Bounds::Unclosed if self.is_perl() => {
                self.pos = at + 1;
                self.push_literal('{');
                Ok(())
            }
            Bounds::Malformed => Err(self.error(ErrorKind::BadBrace, at)),
            Bounds::Unclosed => Err(self.error(ErrorKind::Brace, at)),
        }
    }

    /// `\{m,n\}` in basic syntax; the cursor is past `\{`.
    pub(super) fn parse_basic_brace(&mut self, at: usize) -> PResult<()> {
        match self.read_bounds("\\}") {
            Bounds::Valid(min, max) => self.apply_repeat(at, min, max, true, false),
            Bounds::Malformed | Bounds::TooLarge => Err(self.error(ErrorKind::BadBrace, at)),
            Bounds::Unclosed => Err(self.error(ErrorKind::Brace, at)),
        }
    }

    /// Reads `n`, `n,`, `n,m` or `,m` followed by `close`.
    fn read_bounds(&mut self, close: &str) -> Bounds {
        let start = self.pos;
        let Some(len) = self.rest().find(close) else {
            return Bounds::Unclosed;
        };
        let body = &self.pattern[start..start + len];
        let bounds = parse_interval(body, self.is_perl());
        if let Bounds::Valid(..) = bounds {
            self.pos = start + len + close.len();
        }
        bounds
    }
}

fn parse_interval(body: &str, open_min: bool) -> Bounds {
    let (lo, hi) = match body.split_once(',') {
        Some(parts) => parts,
        None => {
            return match parse_count(body) {
                Count::Value(n) => Bounds::Valid(n, n),
                Count::Invalid => Bounds::Malformed,
                Count::Overflow => Bounds::TooLarge,
            };
        }
    };
    if lo.is_empty() && (hi.is_empty() || !open_min) {
        return Bounds::Malformed;
    }
    let min = if lo.is_empty() {
        Count::Value(0)
    } else {
        parse_count(lo)
    };
    let max = if hi.is_empty() {
        Count::Value(INFINITE)
    } else {
        parse_count(hi)
    };
    match (min, max) {
        (Count::Value(min), Count::Value(max)) => Bounds::Valid(min, max),
        (Count::Invalid, _) | (_, Count::Invalid) => Bounds::Malformed,
        _ => Bounds::TooLarge,
    }
}

enum Count {
    Value(u32),
    Invalid,
    Overflow,
}

fn parse_count(s: &str) -> Count {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Count::Invalid;
    }
    match s.parse::<u32>() {
        Ok(n) if n != INFINITE => Count::Value(n),
        _ => Count::Overflow,
    }
}
