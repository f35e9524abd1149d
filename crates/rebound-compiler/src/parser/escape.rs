//! Backslash escapes outside brackets.

use rebound_bytecode::{CharSetSpec, Node, WildMode, node::encode_long_set};
use rebound_core::{ClassMask, EscapeType};

use super::{PResult, Parser};
use crate::error::{CompileError, ErrorKind};

impl<'p> Parser<'p> {
    /// Parses an escape; the cursor is on the backslash.
    pub(super) fn parse_escape(&mut self) -> PResult<()> {
        let start = self.pos;
        self.pos += 1;
        let Some(c) = self.bump() else {
            return Err(self.error(ErrorKind::Escape, start));
        };

        match self.traits.escape_syntax_type(c) {
            EscapeType::Class | EscapeType::NotClass => {
                let class = self.escape_class(c, start)?;
                let negated = self.traits.escape_syntax_type(c) == EscapeType::NotClass;
                self.append_class(class, negated);
            }
            EscapeType::WordBoundary => {
                self.append_assertion(&Node::WordBoundary);
            }
            EscapeType::NotWordBoundary => {
                self.append_assertion(&Node::NotWordBoundary);
            }
            EscapeType::WordStart => {
                self.append_assertion(&Node::WordStart);
            }
            EscapeType::WordEnd => {
                self.append_assertion(&Node::WordEnd);
            }
            EscapeType::BufferStart => {
                self.append_assertion(&Node::BufferStart);
            }
            EscapeType::BufferEnd => {
                self.append_assertion(&Node::BufferEnd);
            }
            EscapeType::SoftBufferEnd => {
                self.append_assertion(&Node::SoftBufferEnd);
            }
            EscapeType::ContinueMatch => {
                self.append_assertion(&Node::ContinueMatch);
            }
            EscapeType::Combining => {
                self.append_atom(&Node::Combining);
            }
            EscapeType::NotNewline => {
                self.append_atom(&Node::Wild {
                    mode: WildMode::NoNewline,
                });
            }
            EscapeType::Backref if self.is_posix_extended() => self.push_literal(c),
            EscapeType::Backref => {
                let index = self.read_backref_number(c);
                self.append_backref(index, start)?;
            }
            EscapeType::NamedBackref => {
                let name = self.read_delimited_name(start)?;
                self.append_named_backref(name, start)?;
            }
            EscapeType::ExtendedBackref => self.parse_g_escape(start)?,
            EscapeType::QuoteStart => self.parse_quoted(),
            EscapeType::QuoteEnd => {}
            EscapeType::Property | EscapeType::NotProperty => {
                let (class, negated) = self.parse_property(c, start)?;
                self.append_class(class, negated);
            }
            _ => {
                let ch = self.escape_char(c, start)?;
                self.push_literal(ch);
            }
        }
        Ok(())
    }

    /// Character value of an escape that stands for a single character.
    /// `c` has already been consumed.
    pub(super) fn escape_char(&mut self, c: char, start: usize) -> PResult<char> {
        match self.traits.escape_syntax_type(c) {
            EscapeType::Control(ch) => Ok(ch),
            EscapeType::Hex => self.parse_hex(start),
            EscapeType::AsciiControl => match self.bump() {
                Some(x) if x.is_ascii() => Ok(char::from(x as u8 % 32)),
                _ => Err(self.error(ErrorKind::Escape, start)),
            },
            EscapeType::Octal => Ok(self.parse_octal()),
            _ => Ok(c),
        }
    }

    pub(super) fn escape_class(&self, c: char, start: usize) -> PResult<ClassMask> {
        let name = c.to_ascii_lowercase().to_string();
        self.traits
            .lookup_classname(&name)
            .ok_or_else(|| self.error(ErrorKind::Ctype, start))
    }

    fn append_class(&mut self, class: ClassMask, negated: bool) {
        let spec = CharSetSpec {
            class: if negated { ClassMask::NONE } else { class },
            not_class: if negated { class } else { ClassMask::NONE },
            ..CharSetSpec::default()
        };
        let bytes = encode_long_set(&spec, false, self.modes.icase, false);
        self.flush_literal();
        let at = self.emit.append_encoded(&bytes);
        self.last_atom = super::Atom::At(at);
    }

    /// `\xHH` or `\x{H...}`; the cursor is past the `x`.
    fn parse_hex(&mut self, start: usize) -> PResult<char> {
        let value = if self.eat('{') {
            let digits: String = self
                .rest()
                .chars()
                .take_while(|c| c.is_ascii_hexdigit())
                .collect();
            self.pos += digits.len();
            if digits.is_empty() || !self.eat('}') {
                return Err(self.error(ErrorKind::Escape, start));
            }
            u32::from_str_radix(&digits, 16).map_err(|_| self.error(ErrorKind::Escape, start))?
        } else {
            let mut value = 0;
            for _ in 0..2 {
                let Some(d) = self.peek().and_then(|c| self.traits.digit_value(c, 16)) else {
                    break;
                };
                self.pos += 1;
                value = value * 16 + d;
            }
            value
        };
        char::from_u32(value).ok_or_else(|| self.error(ErrorKind::Escape, start))
    }

    /// `\0` followed by up to two more octal digits.
    fn parse_octal(&mut self) -> char {
        let mut value = 0u32;
        for _ in 0..2 {
            let Some(d) = self.peek().and_then(|c| self.traits.digit_value(c, 8)) else {
                break;
            };
            self.pos += 1;
            value = value * 8 + d;
        }
        char::from_u32(value).unwrap_or('\0')
    }

    /// Longest digit run naming an existing group (at least one digit).
    fn read_backref_number(&mut self, first: char) -> u32 {
        let mut value = self.traits.digit_value(first, 10).unwrap_or(0);
        if self.flags.contains(rebound_bytecode::SyntaxFlags::BASIC) {
            return value;
        }
        while let Some(d) = self.peek().and_then(|c| self.traits.digit_value(c, 10)) {
            let next = value * 10 + d;
            if next > self.mark_count {
                break;
            }
            value = next;
            self.pos += 1;
        }
        value
    }

    /// Name in `<...>`, `'...'` or `{...}`.
    fn read_delimited_name(&mut self, start: usize) -> PResult<&'p str> {
        let close = match self.bump() {
            Some('<') => '>',
            Some('\'') => '\'',
            Some('{') => '}',
            _ => return Err(self.error(ErrorKind::Backref, start)),
        };
        let name_start = self.pos;
        let Some(len) = self.rest().find(close) else {
            return Err(self.error(ErrorKind::Backref, start));
        };
        self.pos += len + close.len_utf8();
        let name = &self.rest_from(name_start)[..len];
        if !is_group_name(name) {
            return Err(self.error(ErrorKind::Backref, start));
        }
        Ok(name)
    }

    /// `\gN`, `\g-N`, `\g{N}`, `\g{-N}` and `\g{name}`.
    fn parse_g_escape(&mut self, start: usize) -> PResult<()> {
        let body = if self.eat('{') {
            let Some(len) = self.rest().find('}') else {
                return Err(self.error(ErrorKind::Backref, start));
            };
            let body = &self.rest()[..len];
            self.pos += len + 1;
            body
        } else {
            let body_start = self.pos;
            self.eat('-');
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            &self.rest_from(body_start)[..self.pos - body_start]
        };

        if let Some(rel) = body.strip_prefix('-') {
            let n: u32 = rel.parse().map_err(|_| self.error(ErrorKind::Backref, start))?;
            let index = (self.mark_count + 1)
                .checked_sub(n)
                .filter(|_| n > 0)
                .ok_or_else(|| self.error(ErrorKind::Backref, start))?;
            self.append_backref(index, start)
        } else if let Ok(n) = body.parse::<u32>() {
            self.append_backref(n, start)
        } else if is_group_name(body) {
            self.append_named_backref(body, start)
        } else {
            Err(self.error(ErrorKind::Backref, start))
        }
    }

    /// `\Q...\E`; the cursor is past `\Q`.
    fn parse_quoted(&mut self) {
        let rest = self.rest();
        let (text, skip) = match rest.find("\\E") {
            Some(end) => (&rest[..end], end + 2),
            None => (rest, rest.len()),
        };
        self.pos += skip;
        for c in text.chars() {
            self.push_literal(c);
        }
    }

    /// `\p{Name}`, `\p{^Name}`, `\pL` and their `\P` negations.
    pub(super) fn parse_property(&mut self, c: char, start: usize) -> PResult<(ClassMask, bool)> {
        let mut negated = self.traits.escape_syntax_type(c) == EscapeType::NotProperty;
        let name = if self.eat('{') {
            let Some(len) = self.rest().find('}') else {
                return Err(self.error(ErrorKind::Escape, start));
            };
            let mut name = &self.rest()[..len];
            self.pos += len + 1;
            if let Some(inner) = name.strip_prefix('^') {
                negated = !negated;
                name = inner;
            }
            name
        } else {
            let Some(ch) = self.peek() else {
                return Err(self.error(ErrorKind::Escape, start));
            };
            let name = &self.rest()[..ch.len_utf8()];
            self.pos += ch.len_utf8();
            name
        };
        let class = property_alias(name)
            .or_else(|| self.traits.lookup_classname(name))
            .ok_or_else(|| {
                CompileError::with_message(
                    ErrorKind::Ctype,
                    start,
                    format!("Unknown character property {name:?}."),
                )
            })?;
        Ok((class, negated))
    }
}

/// General-category shorthands mapped onto the class masks.
fn property_alias(name: &str) -> Option<ClassMask> {
    let class = match name {
        "L" | "Letter" => ClassMask::ALPHA,
        "Lu" | "Uppercase_Letter" => ClassMask::UPPER,
        "Ll" | "Lowercase_Letter" => ClassMask::LOWER,
        "N" | "Nd" | "Number" => ClassMask::DIGIT,
        "P" | "Punctuation" => ClassMask::PUNCT,
        "Z" | "Zs" | "Separator" => ClassMask::SPACE,
        "Cc" | "Control" => ClassMask::CNTRL,
        _ => return None,
    };
    Some(class)
}

pub(super) fn is_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
