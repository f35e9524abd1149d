//! POSIX basic syntax: `\( \) \{ \}`, context-dependent `* ^ $`.

use rebound_bytecode::{INFINITE, Node};

use super::{Atom, PResult, Parser};
use crate::error::ErrorKind;

impl Parser<'_> {
    pub(super) fn parse_basic(&mut self) -> PResult<()> {
        let at = self.pos;
        let Some(c) = self.bump() else {
            return Ok(());
        };
        match c {
            '\\' => match self.peek() {
                None => Err(self.error(ErrorKind::Escape, at)),
                Some('(') => {
                    self.pos += 1;
                    self.open_plain_group(at)
                }
                Some(')') => {
                    self.pos += 1;
                    self.close_group(at)
                }
                Some('{') => {
                    self.pos += 1;
                    self.parse_basic_brace(at)
                }
                Some('}') => Err(self.error(ErrorKind::Brace, at)),
                Some(_) => {
                    self.pos = at;
                    self.parse_escape()
                }
            },
            // Literal where there is nothing to repeat.
            '*' if self.last_atom == Atom::None => {
                self.push_literal('*');
                Ok(())
            }
            '*' => self.parse_repeat(at, 0, INFINITE),
            '^' if self.at_branch_start() => {
                let single_line = self.modes.single_line;
                self.append_assertion(&Node::StartLine { single_line });
                Ok(())
            }
            '$' if self.rest().is_empty() || self.rest().starts_with("\\)") => {
                let single_line = self.modes.single_line;
                self.append_assertion(&Node::EndLine { single_line });
                Ok(())
            }
            '.' => {
                let mode = self.modes.wild;
                self.append_atom(&Node::Wild { mode });
                Ok(())
            }
            '[' => {
                self.pos = at;
                self.parse_set()
            }
            _ => {
                self.push_literal(c);
                Ok(())
            }
        }
    }

    fn at_branch_start(&self) -> bool {
        self.pending.is_empty()
            && self
                .frames
                .last()
                .is_some_and(|f| f.branch_start == self.emit.len())
    }
}
