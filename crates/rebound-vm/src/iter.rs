//! Global matching and token splitting.

use std::collections::VecDeque;

use rebound_bytecode::{MatchFlags, Program};

use crate::engine::{FuelLimits, RuntimeError, VM};
use crate::results::{MatchResults, SubMatch};

/// Successive non-overlapping matches over one text.
///
/// After an empty match the next search may not accept another empty match
/// at the same position, so iteration always makes progress. Iteration
/// stops after a match that reaches the end of the text, after a partial
/// match, and after the first error.
pub struct Matches<'p, 't> {
    program: &'p Program,
    text: &'t str,
    flags: MatchFlags,
    limits: FuelLimits,
    next_start: usize,
    last_empty: bool,
    first: bool,
    done: bool,
}

impl<'p, 't> Matches<'p, 't> {
    pub fn new(program: &'p Program, text: &'t str, flags: MatchFlags, limits: FuelLimits) -> Self {
        Self {
            program,
            text,
            flags,
            limits,
            next_start: 0,
            last_empty: false,
            first: true,
            done: false,
        }
    }

    pub fn text(&self) -> &'t str {
        self.text
    }
}

impl<'p, 't> Iterator for Matches<'p, 't> {
    type Item = Result<MatchResults<'p, 't>, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut flags = self.flags;
        if !self.first {
            flags |= MatchFlags::PREV_AVAIL;
            if self.last_empty || self.program.is_posix() || flags.contains(MatchFlags::POSIX) {
                flags |= MatchFlags::NOT_INITIAL_NULL;
            }
        }
        self.first = false;

        let found = VM::builder(self.program, self.text)
            .flags(flags)
            .limits(self.limits)
            .build()
            .search(self.next_start);
        match found {
            Ok(Some(m)) => {
                self.last_empty = m.start() == m.end();
                self.next_start = m.end();
                self.done = m.is_partial() || m.end() == self.text.len();
                Some(Ok(m))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Sub-match selector meaning "the text between matches".
pub const BETWEEN: i32 = -1;

/// Selected groups of every match, and optionally the gaps between them.
///
/// For each match the groups listed in `subs` are produced in order, with
/// [`BETWEEN`] standing for the text since the previous match. Unless `subs`
/// is a single group, the text after the last match is produced once at the
/// end if it is not empty.
pub struct Tokens<'p, 't> {
    matches: Matches<'p, 't>,
    subs: Vec<i32>,
    queue: VecDeque<SubMatch<'t>>,
    last_end: usize,
    finished: bool,
}

impl<'p, 't> Tokens<'p, 't> {
    pub fn new(matches: Matches<'p, 't>, subs: Vec<i32>) -> Self {
        Self {
            matches,
            subs,
            queue: VecDeque::new(),
            last_end: 0,
            finished: false,
        }
    }

    /// Tokens between matches: `split`.
    pub fn split(matches: Matches<'p, 't>) -> Self {
        Self::new(matches, vec![BETWEEN])
    }
}

impl<'t> Iterator for Tokens<'_, 't> {
    type Item = Result<SubMatch<'t>, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(Ok(token));
            }
            if self.finished {
                return None;
            }
            let text = self.matches.text();
            match self.matches.next() {
                Some(Ok(m)) => {
                    for &sub in &self.subs {
                        let token = if sub == BETWEEN {
                            SubMatch::new(text, self.last_end, m.start().max(self.last_end))
                        } else {
                            m.get(sub as isize)
                                .unwrap_or_else(|| SubMatch::unmatched(text))
                        };
                        self.queue.push_back(token);
                    }
                    self.last_end = m.end();
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    let sole_group = matches!(self.subs[..], [sub] if sub >= 0);
                    if !sole_group && self.last_end < text.len() {
                        self.queue
                            .push_back(SubMatch::new(text, self.last_end, text.len()));
                    }
                }
            }
        }
    }
}
