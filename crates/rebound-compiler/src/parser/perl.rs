//! Perl extensions: `(?...)` groups and `(*VERB)`s.

use logos::Logos;
use rebound_bytecode::{CondKind, GroupKind, Node, UNLINKED, WildMode, hash_name};

use super::escape::is_group_name;
use super::{FrameKind, PResult, Parser, RefTarget, THEN_PENDING};
use crate::error::{CompileError, ErrorKind};

/// Whatever follows an opening parenthesis in Perl syntax.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum GroupIntro<'src> {
    #[token("?:")]
    NonCapture,

    #[token("?=")]
    LookAhead,

    #[token("?!")]
    NegLookAhead,

    #[token("?<=")]
    LookBehind,

    #[token("?<!")]
    NegLookBehind,

    #[token("?>")]
    Atomic,

    #[token("?#")]
    Comment,

    #[token("?(")]
    Conditional,

    #[token("?R)")]
    RecurseWhole,

    #[regex(r"\?<[A-Za-z_][A-Za-z0-9_]*>", |lex| inner(lex.slice(), 2))]
    #[regex(r"\?'[A-Za-z_][A-Za-z0-9_]*'", |lex| inner(lex.slice(), 2))]
    #[regex(r"\?P<[A-Za-z_][A-Za-z0-9_]*>", |lex| inner(lex.slice(), 3))]
    Named(&'src str),

    #[regex(r"\?P=[A-Za-z_][A-Za-z0-9_]*\)", |lex| inner(lex.slice(), 3))]
    NamedBackref(&'src str),

    #[regex(r"\?P>[A-Za-z_][A-Za-z0-9_]*\)", |lex| inner(lex.slice(), 3))]
    #[regex(r"\?&[A-Za-z_][A-Za-z0-9_]*\)", |lex| inner(lex.slice(), 2))]
    RecurseNamed(&'src str),

    #[regex(r"\?[+-]?[0-9]+\)", |lex| inner(lex.slice(), 1))]
    RecurseNumber(&'src str),

    // At least one letter or a dash, so `?:` stays a plain group.
    #[regex(r"\?([imsx]+(-[imsx]*)?|-[imsx]*)[:)]", |lex| &lex.slice()[1..])]
    Modifiers(&'src str),

    #[regex(r"\*[A-Z]+\)", |lex| inner(lex.slice(), 1))]
    Verb(&'src str),
}

/// Strips `head` leading bytes and the closing delimiter.
fn inner(s: &str, head: usize) -> &str {
    &s[head..s.len() - 1]
}

impl Parser<'_> {
    /// Dispatches on the text after `(`; `open` is the parenthesis offset.
    pub(super) fn parse_perl_extension(&mut self, open: usize) -> PResult<()> {
        let mut lexer = GroupIntro::lexer(self.rest());
        let Some(Ok(intro)) = lexer.next() else {
            return Err(self.error(ErrorKind::PerlExtension, open));
        };
        self.pos += lexer.span().end;

        match intro {
            GroupIntro::NonCapture => self.open_group(GroupKind::NonCapture, open),
            GroupIntro::LookAhead => self.open_group(GroupKind::LookAhead, open),
            GroupIntro::NegLookAhead => self.open_group(GroupKind::NegLookAhead, open),
            GroupIntro::LookBehind => self.open_group(GroupKind::LookBehind, open),
            GroupIntro::NegLookBehind => self.open_group(GroupKind::NegLookBehind, open),
            GroupIntro::Atomic => self.open_group(GroupKind::Atomic, open),
            GroupIntro::Comment => match self.rest().find(')') {
                Some(len) => {
                    self.pos += len + 1;
                    Ok(())
                }
                None => Err(self.error(ErrorKind::PerlExtension, open)),
            },
            GroupIntro::Conditional => self.parse_condition(open),
            GroupIntro::RecurseWhole => self.add_recursion(RefTarget::Group(0), open),
            GroupIntro::Named(name) => self.open_named_group(name, open),
            GroupIntro::NamedBackref(name) => self.append_named_backref(name, open),
            GroupIntro::RecurseNamed(name) => {
                self.add_recursion(RefTarget::Name(name.to_owned()), open)
            }
            GroupIntro::RecurseNumber(number) => {
                let group = self.recursion_group(number, open)?;
                self.add_recursion(RefTarget::Group(group), open)
            }
            GroupIntro::Modifiers(spec) => self.parse_modifiers(spec, open),
            GroupIntro::Verb(verb) => self.parse_verb(verb, open),
        }
    }

    /// Absolute group of `N`, `+N` or `-N`.
    fn recursion_group(&self, number: &str, open: usize) -> PResult<u32> {
        let bad = || self.error(ErrorKind::PerlExtension, open);
        if let Some(rel) = number.strip_prefix('+') {
            let n: u32 = rel.parse().map_err(|_| bad())?;
            if n == 0 {
                return Err(bad());
            }
            Ok(self.mark_count + n)
        } else if let Some(rel) = number.strip_prefix('-') {
            let n: u32 = rel.parse().map_err(|_| bad())?;
            (self.mark_count + 1)
                .checked_sub(n)
                .filter(|&g| n > 0 && g > 0)
                .ok_or_else(|| self.error(ErrorKind::Backref, open))
        } else {
            number.parse().map_err(|_| bad())
        }
    }

    /// `(?imsx-imsx)` or `(?imsx-imsx:...)`; `spec` ends with `)` or `:`.
    fn parse_modifiers(&mut self, spec: &str, open: usize) -> PResult<()> {
        let scoped = spec.ends_with(':');
        if scoped {
            self.open_group(GroupKind::NonCapture, open)?;
        } else {
            self.flush_literal();
        }
        let body = &spec[..spec.len() - 1];
        let (on, off) = body.split_once('-').unwrap_or((body, ""));
        for (letters, enable) in [(on, true), (off, false)] {
            for m in letters.chars() {
                match m {
                    'i' => self.set_icase(enable),
                    's' => {
                        self.modes.wild = if enable {
                            WildMode::MatchesNewline
                        } else {
                            WildMode::NoNewline
                        }
                    }
                    'm' => self.modes.single_line = !enable,
                    'x' => self.modes.free_spacing = enable,
                    _ => return Err(self.error(ErrorKind::PerlExtension, open)),
                }
            }
        }
        Ok(())
    }

    fn parse_verb(&mut self, verb: &str, open: usize) -> PResult<()> {
        let node = match verb {
            "PRUNE" => Node::Prune,
            "SKIP" => Node::Skip,
            "COMMIT" => Node::Commit,
            "THEN" => Node::Then {
                scope: THEN_PENDING,
            },
            "FAIL" | "F" => Node::Fail,
            "ACCEPT" => Node::Accept,
            _ => {
                return Err(CompileError::with_message(
                    ErrorKind::PerlExtension,
                    open,
                    format!("Unknown verb (*{verb})."),
                ));
            }
        };
        if !matches!(node, Node::Fail | Node::Accept) {
            self.has_verbs = true;
        }
        self.append_assertion(&node);
        Ok(())
    }

    /// Condition of `(?(...)yes|no)`; the cursor is past `(?(`.
    fn parse_condition(&mut self, open: usize) -> PResult<()> {
        let rest = self.rest();
        let assertion = [
            ("?=", GroupKind::LookAhead),
            ("?!", GroupKind::NegLookAhead),
            ("?<=", GroupKind::LookBehind),
            ("?<!", GroupKind::NegLookBehind),
        ]
        .into_iter()
        .find(|(intro, _)| rest.starts_with(intro));

        if let Some((intro, kind)) = assertion {
            let assert_open = self.pos - 1;
            self.pos += intro.len();
            self.open_conditional(CondKind::Assertion, 0, open)?;
            let mark = self.append(&Node::StartMark {
                kind,
                index: -1,
                end: UNLINKED,
                cond_no: Some(UNLINKED),
            });
            self.open_frame(FrameKind::Group(kind), -1, assert_open, mark)?;
            if let Some(frame) = self.frames.last_mut() {
                frame.is_condition = true;
            }
            let depth = self.frames.len();
            if let Some(cond) = self.frames.get_mut(depth - 2) {
                cond.cond_assert = Some(mark);
            }
            return Ok(());
        }

        let Some(len) = rest.find(')') else {
            return Err(self.error(ErrorKind::PerlExtension, open));
        };
        let cond = &rest[..len];
        self.pos += len + 1;

        let (kind, value) = if cond == "DEFINE" {
            (CondKind::Define, 0)
        } else if cond == "R" {
            (CondKind::Recursion, 0)
        } else if let Some(name) = cond.strip_prefix("R&") {
            if !is_group_name(name) {
                return Err(self.error(ErrorKind::PerlExtension, open));
            }
            self.name_refs.push((name.to_owned(), open));
            (CondKind::RecursionNamed, hash_name(name))
        } else if let Some(n) = cond.strip_prefix('R').and_then(|n| n.parse::<u32>().ok()) {
            self.group_refs.push((n, open));
            (CondKind::RecursionGroup, n)
        } else if let Ok(n) = cond.parse::<u32>() {
            if n == 0 {
                return Err(self.error(ErrorKind::Backref, open));
            }
            self.group_refs.push((n, open));
            (CondKind::Group, n)
        } else {
            let name = cond
                .strip_prefix('<')
                .and_then(|n| n.strip_suffix('>'))
                .or_else(|| cond.strip_prefix('\'').and_then(|n| n.strip_suffix('\'')))
                .unwrap_or(cond);
            if !is_group_name(name) {
                return Err(self.error(ErrorKind::PerlExtension, open));
            }
            self.name_refs.push((name.to_owned(), open));
            (CondKind::Named, hash_name(name))
        };
        self.open_conditional(kind, value, open)
    }
}
