//! Bracket expressions.

use rebound_bytecode::node::encode_long_set;
use rebound_bytecode::{CharMap, CharSetSpec, Node, SyntaxFlags};
use rebound_core::{ClassMask, EscapeType};

use super::{Atom, PResult, Parser};
use crate::error::{CompileError, ErrorKind};

enum SetItem {
    Char(char),
    Class { mask: ClassMask, negated: bool },
    Equiv(u32),
}

impl Parser<'_> {
    /// Parses `[...]`; the cursor is on the opening bracket.
    pub(super) fn parse_set(&mut self) -> PResult<()> {
        let open = self.pos;
        self.pos += 1;
        let negated = self.eat('^');
        let collate = self.flags.contains(SyntaxFlags::COLLATE);
        let mut spec = CharSetSpec::default();
        let mut first = true;

        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(ErrorKind::Brack, open));
            };
            if c == ']' && !first {
                self.pos += 1;
                break;
            }
            first = false;

            let item_start = self.pos;
            let item = self.parse_set_item(open)?;
            let is_range = matches!(item, SetItem::Char(_))
                && self.peek() == Some('-')
                && !matches!(self.peek_at(1), Some(']') | None);

            match item {
                SetItem::Char(lo) if is_range => {
                    self.pos += 1;
                    let SetItem::Char(hi) = self.parse_set_item(open)? else {
                        return Err(self.error(ErrorKind::Range, item_start));
                    };
                    let (lo, hi) = if collate {
                        (self.traits.transform(lo), self.traits.transform(hi))
                    } else {
                        (lo as u32, hi as u32)
                    };
                    if lo > hi {
                        return Err(self.error(ErrorKind::Range, item_start));
                    }
                    spec.ranges.push((lo, hi));
                }
                SetItem::Char(c) => {
                    spec.singles.push(self.traits.translate(c, self.modes.icase));
                }
                SetItem::Class {
                    mask,
                    negated: false,
                } => spec.class |= mask,
                SetItem::Class {
                    mask,
                    negated: true,
                } => spec.not_class |= mask,
                SetItem::Equiv(key) => spec.equivs.push(key),
            }
        }

        self.emit_set(&spec, negated, collate);
        Ok(())
    }

    fn parse_set_item(&mut self, open: usize) -> PResult<SetItem> {
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Err(self.error(ErrorKind::Brack, open));
        };
        match c {
            '[' if matches!(self.peek(), Some(':' | '=' | '.')) => self.parse_bracket_name(open, start),
            '\\' if self.is_perl() => {
                let Some(d) = self.bump() else {
                    return Err(self.error(ErrorKind::Escape, start));
                };
                match self.traits.escape_syntax_type(d) {
                    EscapeType::Class | EscapeType::NotClass => Ok(SetItem::Class {
                        mask: self.escape_class(d, start)?,
                        negated: self.traits.escape_syntax_type(d) == EscapeType::NotClass,
                    }),
                    EscapeType::Property | EscapeType::NotProperty => {
                        let (mask, negated) = self.parse_property(d, start)?;
                        Ok(SetItem::Class { mask, negated })
                    }
                    EscapeType::WordBoundary => Ok(SetItem::Char('\u{8}')),
                    _ => Ok(SetItem::Char(self.escape_char(d, start)?)),
                }
            }
            _ => Ok(SetItem::Char(c)),
        }
    }

    /// `[:name:]`, `[=c=]` or `[.name.]`; the cursor is past the `[`.
    fn parse_bracket_name(&mut self, open: usize, start: usize) -> PResult<SetItem> {
        let Some(kind) = self.bump() else {
            return Err(self.error(ErrorKind::Brack, open));
        };
        let close = [kind, ']'].iter().collect::<String>();
        let Some(len) = self.rest().find(close.as_str()) else {
            return Err(self.error(ErrorKind::Brack, open));
        };
        let name = &self.rest()[..len];
        self.pos += len + close.len();

        match kind {
            ':' => {
                let (name, negated) = match name.strip_prefix('^') {
                    Some(inner) => (inner, true),
                    None => (name, false),
                };
                let mask = self.traits.lookup_classname(name).ok_or_else(|| {
                    CompileError::with_message(
                        ErrorKind::Ctype,
                        start,
                        format!("Unknown character class {name:?}."),
                    )
                })?;
                Ok(SetItem::Class { mask, negated })
            }
            '=' => {
                let c = self.collating_element(name, start)?;
                Ok(SetItem::Equiv(self.traits.transform_primary(c)))
            }
            _ => Ok(SetItem::Char(self.collating_element(name, start)?)),
        }
    }

    fn collating_element(&self, name: &str, start: usize) -> PResult<char> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(c);
        }
        self.traits
            .lookup_collatename(name)
            .ok_or_else(|| self.error(ErrorKind::Collate, start))
    }

    /// Emits a narrow bitmap set when every member lies below 256,
    /// otherwise a wide set.
    fn emit_set(&mut self, spec: &CharSetSpec, negated: bool, collate: bool) {
        let icase = self.modes.icase;
        let bytes = encode_long_set(spec, false, icase, collate);
        let narrow = !collate
            && spec.class.is_empty()
            && spec.not_class.is_empty()
            && spec.equivs.is_empty()
            && spec.singles.iter().all(|&c| self.fits_narrow(c, icase))
            && spec.ranges.iter().all(|&(_, hi)| hi < 256)
            && (!icase
                || spec
                    .ranges
                    .iter()
                    .flat_map(|&(lo, hi)| lo..=hi)
                    .filter_map(char::from_u32)
                    .all(|c| self.fits_narrow(c, icase)));

        let map = match Node::decode(&bytes, 0) {
            Node::LongSet(set) if narrow => {
                let mut map = CharMap::EMPTY;
                for b in 0..=255u8 {
                    if set.contains(char::from(b), self.traits) {
                        map.insert(b);
                    }
                }
                Some(map)
            }
            _ => None,
        };

        self.flush_literal();
        let at = match map {
            Some(map) => self.emit.append(&Node::Set {
                map: map.view(),
                negated,
                icase,
            }),
            None => {
                let bytes = encode_long_set(spec, negated, icase, collate);
                self.emit.append_encoded(&bytes)
            }
        };
        self.last_atom = Atom::At(at);
    }

    fn fits_narrow(&self, c: char, icase: bool) -> bool {
        (c as u32) < 256
            && (!icase
                || self
                    .traits
                    .case_variants(c)
                    .into_iter()
                    .all(|v| (v as u32) < 256))
    }
}
